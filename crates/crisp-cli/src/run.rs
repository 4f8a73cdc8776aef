//! Non-interactive modes: `-c` and `-f`.

use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Result};
use crisp::{Interpreter, Value};

/// Evaluate `source` as a program and print its value unless it is void.
pub fn run_source(crisp: &mut Interpreter, source: &str, out: &mut impl Write) -> Result<()> {
    report(crisp.eval_program(source), out)
}

/// Evaluate the program in `path`; unreadable files fail like bad programs.
pub fn run_file(crisp: &mut Interpreter, path: &Path, out: &mut impl Write) -> Result<()> {
    report(crisp.eval_file(path), out)
}

fn report(result: crisp::Result<Value>, out: &mut impl Write) -> Result<()> {
    let value = result.map_err(|e| anyhow!(Interpreter::format_error(&e)))?;
    if let Some(text) = Interpreter::format_value(&value) {
        writeln!(out, "{}", text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> (Result<()>, String) {
        let mut buf = Vec::new();
        let result = f(&mut buf);
        (result, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_run_source_prints_value() {
        let mut crisp = Interpreter::new();
        let (result, out) = output(|buf| run_source(&mut crisp, "(* 6 7)", buf));
        result.unwrap();
        assert_eq!(out, "42\n");
    }

    #[test]
    fn test_run_source_void_prints_nothing() {
        let mut crisp = Interpreter::new();
        let (result, out) = output(|buf| run_source(&mut crisp, "(define x 1)", buf));
        result.unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_run_source_error() {
        let mut crisp = Interpreter::new();
        let (result, out) = output(|buf| run_source(&mut crisp, "(+ 1 missing)", buf));
        assert_eq!(result.unwrap_err().to_string(), "error: Unbound symbol: missing");
        assert_eq!(out, "");
    }

    #[test]
    fn test_run_source_deep_recursion_is_an_error() {
        let mut crisp = Interpreter::new();
        let program = "(define down (lambda (n) (if (= n 0) 0 (down (- n 1))))) (down 100000)";
        let (result, _) = output(|buf| run_source(&mut crisp, program, buf));
        assert!(result
            .unwrap_err()
            .to_string()
            .starts_with("error: stack overflow"));
    }

    #[test]
    fn test_run_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog.crisp");
        std::fs::write(
            &path,
            "; squares\n(define sq (lambda (x) (* x x)))\n(sq 12)\n",
        )
        .unwrap();

        let mut crisp = Interpreter::new();
        let (result, out) = output(|buf| run_file(&mut crisp, &path, buf));
        result.unwrap();
        assert_eq!(out, "144\n");
    }

    #[test]
    fn test_run_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut crisp = Interpreter::new();
        let (result, _) = output(|buf| run_file(&mut crisp, &dir.path().join("gone.crisp"), buf));
        assert!(result
            .unwrap_err()
            .to_string()
            .starts_with("error: cannot read"));
    }
}
