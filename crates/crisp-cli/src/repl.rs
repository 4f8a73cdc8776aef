//! Interactive read-eval-print loop.

use std::path::Path;

use anyhow::{Context, Result};
use crisp::Interpreter;
use rustyline::error::ReadlineError;
use rustyline::{Config as EditorConfig, DefaultEditor};
use tracing::{debug, warn};

use crate::config::Config;

/// What the loop does after one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to show (blank line or a void result)
    Silent,
    /// A value or an error message to print
    Print(String),
    /// `(quit)` or `(exit)`
    Quit,
}

/// Evaluate one REPL line against the session.
///
/// A line may hold several forms; the value of the last one is shown.
pub fn handle_line(crisp: &mut Interpreter, line: &str) -> Outcome {
    let line = line.trim();
    if line.is_empty() {
        return Outcome::Silent;
    }
    if matches!(line, "(quit)" | "(exit)") {
        return Outcome::Quit;
    }

    match crisp.eval_program(line) {
        Ok(value) => Interpreter::format_value(&value)
            .map(Outcome::Print)
            .unwrap_or(Outcome::Silent),
        Err(e) => Outcome::Print(Interpreter::format_error(&e)),
    }
}

pub fn run(crisp: &mut Interpreter, config: &Config) -> Result<()> {
    let editor_config = EditorConfig::builder()
        .max_history_size(config.history_size)
        .context("Invalid history size")?
        .auto_add_history(false)
        .build();
    let mut editor =
        DefaultEditor::with_config(editor_config).context("Failed to start line editor")?;

    let history = config.history_path();
    if let Some(path) = &history {
        if let Err(e) = editor.load_history(path) {
            debug!(path = %path.display(), error = %e, "no history loaded");
        }
    }

    loop {
        match editor.readline(&config.prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = editor.add_history_entry(line.as_str()) {
                        debug!(error = %e, "history entry dropped");
                    }
                }
                match handle_line(crisp, &line) {
                    Outcome::Silent => {}
                    Outcome::Print(text) => println!("{}", text),
                    Outcome::Quit => break,
                }
            }
            // Ctrl-C abandons the current line
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        }
    }

    if let Some(path) = &history {
        save_history(&mut editor, path);
    }
    Ok(())
}

fn save_history(editor: &mut DefaultEditor, path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!(path = %parent.display(), error = %e, "cannot create history directory");
            return;
        }
    }
    if let Err(e) = editor.save_history(path) {
        warn!(path = %path.display(), error = %e, "failed to save history");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut crisp = Interpreter::new();
        assert_eq!(handle_line(&mut crisp, ""), Outcome::Silent);
        assert_eq!(handle_line(&mut crisp, "   \t"), Outcome::Silent);
    }

    #[test]
    fn test_quit_and_exit() {
        let mut crisp = Interpreter::new();
        assert_eq!(handle_line(&mut crisp, "(quit)"), Outcome::Quit);
        assert_eq!(handle_line(&mut crisp, "  (exit) "), Outcome::Quit);
    }

    #[test]
    fn test_values_and_void() {
        let mut crisp = Interpreter::new();
        assert_eq!(handle_line(&mut crisp, "(define n 5)"), Outcome::Silent);
        assert_eq!(
            handle_line(&mut crisp, "(* n n)"),
            Outcome::Print("25".to_string())
        );
    }

    #[test]
    fn test_several_forms_on_one_line() {
        let mut crisp = Interpreter::new();
        assert_eq!(
            handle_line(&mut crisp, "(define x 1) (+ x 1)"),
            Outcome::Print("2".to_string())
        );
        assert_eq!(handle_line(&mut crisp, "(define y 2) (define z 3)"), Outcome::Silent);
        assert_eq!(handle_line(&mut crisp, "z"), Outcome::Print("3".to_string()));
    }

    #[test]
    fn test_error_keeps_session() {
        let mut crisp = Interpreter::new();
        handle_line(&mut crisp, "(define n 5)");
        assert_eq!(
            handle_line(&mut crisp, "(/ n 0)"),
            Outcome::Print("error: division by zero".to_string())
        );
        assert_eq!(handle_line(&mut crisp, "n"), Outcome::Print("5".to_string()));
    }
}
