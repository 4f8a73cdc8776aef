//! # Crisp
//!
//! A small Lisp dialect and its tree-walking interpreter.
//!
//! Source text is tokenized, parsed into [`Value`] forms (code and data
//! share one representation), and evaluated against an [`Environment`].
//!
//! ## Architecture
//!
//! - **Lexer**: source text to tokens with line/column locations
//! - **Parser**: tokens to nested `Value::List` forms
//! - **Evaluator**: special forms, infix operators and calls
//! - **Environment**: flat binding stack with frame boundaries
//! - **Interpreter**: a session wrapping all of the above
//!
//! ```
//! use crisp::{Interpreter, Value};
//!
//! let mut crisp = Interpreter::new();
//! let result = crisp
//!     .eval_program(
//!         "(define fact (lambda (n) (if (< n 2) 1 (* n (fact (- n 1))))))
//!          (fact 10)",
//!     )
//!     .unwrap();
//! assert_eq!(result, Value::Integer(3628800));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod environment;
pub mod error;
pub mod eval;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod value;

// Re-export main types
pub use context::{EvalContext, DEFAULT_MAX_CALL_DEPTH};
pub use environment::{Binding, BindingMode, Environment, ScopeGuard};
pub use error::{CrispError, EnvironmentError, EvalError, ParseError, Result, SourceLocation};
pub use eval::{eval_form, evaluate, evaluate_program, Evaluate};
pub use interpreter::{Interpreter, EVAL_STACK_SIZE};
pub use parser::{parse, parse_program, MAX_NESTING_DEPTH};
pub use value::{BuiltinFn, BuiltinFnPtr, LambdaValue, Value};

/// Crisp version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
