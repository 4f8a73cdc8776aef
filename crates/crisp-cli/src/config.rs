//! Settings file support.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crisp::context::DEFAULT_MAX_CALL_DEPTH;
use crisp::EvalContext;
use serde::Deserialize;
use tracing::debug;

use crate::args::Args;

pub const DEFAULT_PROMPT: &str = "crisp => ";
pub const DEFAULT_HISTORY_SIZE: usize = 1000;

/// Settings read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub max_call_depth: usize,
    pub trace: bool,
    pub prompt: String,
    pub history_file: Option<PathBuf>,
    pub history_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            trace: false,
            prompt: DEFAULT_PROMPT.to_string(),
            history_file: None,
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

impl Config {
    /// Load settings from `explicit`, or from the per-user config file when
    /// one exists. An explicit path that cannot be read is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.is_file() => path,
                _ => {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Command-line flags take precedence over the file.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(depth) = args.max_call_depth {
            self.max_call_depth = depth;
        }
        if args.trace {
            self.trace = true;
        }
    }

    pub fn eval_context(&self) -> EvalContext {
        EvalContext::with_max_call_depth(self.max_call_depth).with_trace(self.trace)
    }

    /// Where REPL history lives: the configured file, else the user data dir.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("crisp").join("history.txt")))
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("crisp").join("config.toml"))
}
