//! Callable value types: lambdas and builtins

use std::sync::Arc;

use super::Value;

/// Type alias for builtin function pointers to reduce complexity
pub type BuiltinFnPtr = Arc<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

/// A user-defined function created by a `lambda` form.
///
/// The body is kept as unevaluated forms and interpreted on each call.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaValue {
    /// Parameter names
    pub params: Vec<String>,

    /// Body forms, evaluated in order; the last one is the result
    pub body: Arc<Vec<Value>>,

    /// Bindings captured from enclosing local scopes (name -> value).
    /// Globals are not captured; they resolve at call time.
    pub captures: Arc<Vec<(String, Value)>>,
}

impl LambdaValue {
    /// Create a lambda with no captured bindings.
    pub fn new(params: Vec<String>, body: Vec<Value>) -> Self {
        Self {
            params,
            body: Arc::new(body),
            captures: Arc::new(Vec::new()),
        }
    }

    /// Attach captured bindings.
    pub fn with_captures(mut self, captures: Vec<(String, Value)>) -> Self {
        self.captures = Arc::new(captures);
        self
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A built-in native function.
///
/// These are Rust functions exposed to the interpreter.
#[derive(Clone)]
pub struct BuiltinFn {
    /// Function name (for display/debugging)
    pub name: String,

    /// Arity (-1 for variadic)
    pub arity: i32,

    /// The actual function pointer
    pub func: BuiltinFnPtr,
}

impl BuiltinFn {
    /// Create a builtin from a name, arity and native function.
    pub fn new<F>(name: impl Into<String>, arity: i32, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(func),
        }
    }

    /// Whether the builtin accepts any number of arguments.
    pub fn is_variadic(&self) -> bool {
        self.arity < 0
    }
}

impl std::fmt::Debug for BuiltinFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BuiltinFn({})", self.name)
    }
}
