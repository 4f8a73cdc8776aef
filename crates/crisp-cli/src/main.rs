//! `crisp`: run Crisp programs or start a REPL.

mod args;
mod config;
mod logging;
mod repl;
mod run;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use crisp::{Interpreter, VERSION};
use tracing::info;

use crate::args::{Args, Mode};
use crate::config::Config;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn try_main(args: Args) -> Result<()> {
    let mut config = Config::load(args.config.as_deref())?;
    config.apply_args(&args);

    let mut crisp = Interpreter::with_context(config.eval_context());
    let mode = args.mode();
    info!(?mode, version = VERSION, "starting");

    match mode {
        Mode::Interactive => repl::run(&mut crisp, &config),
        Mode::CommandLine(program) => {
            run::run_source(&mut crisp, &program, &mut std::io::stdout().lock())
        }
        Mode::File(path) => run::run_file(&mut crisp, &path, &mut std::io::stdout().lock()),
    }
}
