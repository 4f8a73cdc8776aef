use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Command-line arguments for the `crisp` binary.
#[derive(Debug, Parser)]
#[command(name = "crisp", version)]
#[command(about = "A small Lisp interpreter", long_about = None)]
pub struct Args {
    /// Start the interactive REPL (the default when nothing else is given)
    #[arg(short, long)]
    pub interactive: bool,

    /// Evaluate a program passed on the command line
    #[arg(short = 'c', long = "command-line", value_name = "PROG")]
    pub command_line: Option<String>,

    /// Evaluate a program read from a file
    #[arg(short, long, value_name = "PATH")]
    pub filename: Option<PathBuf>,

    /// Read settings from this TOML file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Maximum lambda call depth
    #[arg(long, value_name = "N")]
    pub max_call_depth: Option<usize>,

    /// Log defines and calls at debug level
    #[arg(long)]
    pub trace: bool,

    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// What the binary should do with its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    CommandLine(String),
    File(PathBuf),
}

impl Args {
    /// `-i` wins, then `-c`, then `-f`; with none of them we start the REPL.
    pub fn mode(&self) -> Mode {
        if self.interactive {
            return Mode::Interactive;
        }
        if let Some(program) = &self.command_line {
            return Mode::CommandLine(program.clone());
        }
        if let Some(path) = &self.filename {
            return Mode::File(path.clone());
        }
        Mode::Interactive
    }
}
