//! Error types for Crisp parsing and evaluation

use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// Main error type for Crisp operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CrispError {
    /// Source text could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A parsed form failed to evaluate
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Reading a source file, or starting the evaluation thread, failed
    #[error("{message}")]
    Io {
        /// What failed, including the underlying OS error
        message: String,
    },
}

impl CrispError {
    /// Wrap an I/O failure with a short description of what was attempted.
    pub fn io(context: impl fmt::Display, error: std::io::Error) -> Self {
        CrispError::Io {
            message: format!("{}: {}", context, error),
        }
    }
}

/// Result type alias for Crisp operations
pub type Result<T> = std::result::Result<T, CrispError>;

// ═══════════════════════════════════════════════════════════════════════
// Parse Errors
// ═══════════════════════════════════════════════════════════════════════

/// Source code location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,

    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Error that occurred while tokenizing or parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable error message
    pub message: String,

    /// Optional source location
    pub location: Option<SourceLocation>,
}

impl ParseError {
    /// Create a new parse error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Add location information to the error.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error: {}", self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

// ═══════════════════════════════════════════════════════════════════════
// Environment Errors
// ═══════════════════════════════════════════════════════════════════════

/// Errors raised by the binding store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    /// Lookup or assignment of a name with no binding
    #[error("Unbound symbol: {name}")]
    UndefinedVariable {
        /// The missing name
        name: String,
    },

    /// Assignment to a binding that cannot change
    #[error("cannot assign to immutable binding `{name}`")]
    ImmutableBinding {
        /// The binding's name
        name: String,
    },

    /// Call depth exceeded the configured maximum
    #[error("stack overflow: call depth {depth} exceeds maximum {max}")]
    StackOverflow {
        /// Depth at the time of the failed call
        depth: usize,
        /// Configured maximum
        max: usize,
    },
}

// ═══════════════════════════════════════════════════════════════════════
// Evaluation Errors
// ═══════════════════════════════════════════════════════════════════════

/// Errors raised while evaluating a form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Symbol with no binding
    #[error("Unbound symbol: {name}")]
    UndefinedVariable {
        /// The missing name
        name: String,
    },

    /// Operand or value of the wrong type
    #[error("Type error: {message}")]
    TypeError {
        /// Description of the mismatch
        message: String,
    },

    /// Wrong number of arguments to a callable
    #[error("`{name}` expects {expected} argument{}, got {got}", plural(.expected))]
    ArityMismatch {
        /// Expected argument count
        expected: usize,
        /// Supplied argument count
        got: usize,
        /// Callable name
        name: String,
    },

    /// A special form with the wrong shape
    #[error("{message}")]
    InvalidForm {
        /// Name of the special form or operator
        form: String,
        /// Description of the problem
        message: String,
    },

    /// Checked integer arithmetic overflowed
    #[error("integer overflow")]
    IntegerOverflow,

    /// Division or remainder by zero
    #[error("division by zero")]
    DivisionByZero,

    /// A builtin returned an error
    #[error("{name}: {message}")]
    BuiltinError {
        /// Builtin name
        name: String,
        /// Error message from the builtin
        message: String,
    },

    /// Assignment to an immutable binding
    #[error("cannot assign to immutable binding `{name}`")]
    ImmutableBinding {
        /// The binding's name
        name: String,
    },

    /// Call depth exceeded
    #[error("stack overflow: call depth {depth} exceeds maximum {max}")]
    StackOverflow {
        /// Depth at the time of the failed call
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// Evaluation was interrupted through the context flag
    #[error("evaluation interrupted")]
    Interrupted,
}

impl EvalError {
    /// Shorthand for a `TypeError`.
    pub fn type_error(message: impl Into<String>) -> Self {
        EvalError::TypeError {
            message: message.into(),
        }
    }

    /// Shorthand for an `InvalidForm`.
    pub fn invalid_form(form: impl Into<String>, message: impl Into<String>) -> Self {
        EvalError::InvalidForm {
            form: form.into(),
            message: message.into(),
        }
    }
}

impl From<EnvironmentError> for EvalError {
    fn from(err: EnvironmentError) -> Self {
        match err {
            EnvironmentError::UndefinedVariable { name } => EvalError::UndefinedVariable { name },
            EnvironmentError::ImmutableBinding { name } => EvalError::ImmutableBinding { name },
            EnvironmentError::StackOverflow { depth, max } => {
                EvalError::StackOverflow { depth, max }
            }
        }
    }
}

fn plural(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}

/// Human-readable type name of a value, as used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Void => "void",
        Value::Integer(_) => "integer",
        Value::Float(_) => "float",
        Value::Bool(_) => "bool",
        Value::String(_) => "string",
        Value::Symbol(_) => "symbol",
        Value::List(_) => "list",
        Value::Lambda(_) => "lambda",
        Value::Builtin(_) => "builtin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_error_display_with_location() {
        let err = ParseError::new("unexpected `)`").with_location(SourceLocation::new(2, 7));
        assert_eq!(err.to_string(), "Parse error: unexpected `)` at 2:7");
    }

    #[test]
    fn test_io_error_keeps_context() {
        let err = CrispError::io(
            "cannot read prog.crisp",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.to_string(), "cannot read prog.crisp: not found");
    }

    #[test]
    fn test_parse_error_display_without_location() {
        assert_eq!(ParseError::new("boom").to_string(), "Parse error: boom");
    }

    #[test]
    fn test_arity_message_pluralizes() {
        let one = EvalError::ArityMismatch {
            expected: 1,
            got: 2,
            name: "f".to_string(),
        };
        let two = EvalError::ArityMismatch {
            expected: 2,
            got: 0,
            name: "g".to_string(),
        };
        assert_eq!(one.to_string(), "`f` expects 1 argument, got 2");
        assert_eq!(two.to_string(), "`g` expects 2 arguments, got 0");
    }

    #[test]
    fn test_environment_error_converts() {
        let err: EvalError = EnvironmentError::StackOverflow { depth: 3, max: 3 }.into();
        assert_eq!(err, EvalError::StackOverflow { depth: 3, max: 3 });
    }

    #[test]
    fn test_crisp_error_is_transparent() {
        let err: CrispError = EvalError::DivisionByZero.into();
        assert_eq!(err.to_string(), "division by zero");
    }
}
