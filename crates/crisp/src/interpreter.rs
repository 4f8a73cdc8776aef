//! Interpreter session: an environment, a context, and printing rules

use std::path::Path;
use std::thread;

use tracing::{debug, info};

use crate::error::{CrispError, Result};
use crate::eval::{evaluate, evaluate_program};
use crate::{Environment, EvalContext, Value};

/// Native stack reserved for each evaluation.
///
/// Every Lisp call nests a dozen or so Rust frames, so this has to cover
/// `max_call_depth` calls in unoptimized builds too. The memory is only
/// reserved; pages are touched as the stack actually grows.
pub const EVAL_STACK_SIZE: usize = 256 * 1024 * 1024;

/// A Crisp session.
///
/// Owns the global environment (prelude loaded) so definitions persist
/// across calls, which is what the REPL relies on.
///
/// # Example
///
/// ```
/// use crisp::{Interpreter, Value};
///
/// let mut crisp = Interpreter::new();
/// crisp.eval_str("(define square (lambda (x) (* x x)))").unwrap();
/// assert_eq!(crisp.eval_str("(square 7)").unwrap(), Value::Integer(49));
/// ```
#[derive(Debug, Clone)]
pub struct Interpreter {
    env: Environment,
    ctx: EvalContext,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create a session with default settings.
    pub fn new() -> Self {
        Self::with_context(EvalContext::default())
    }

    /// Create a session using `ctx` for limits, tracing and interruption.
    pub fn with_context(ctx: EvalContext) -> Self {
        let mut env = Environment::with_max_call_depth(ctx.max_call_depth);
        env.load_prelude();
        debug!(
            bindings = env.len(),
            max_call_depth = ctx.max_call_depth,
            "interpreter ready"
        );
        Self { env, ctx }
    }

    /// Evaluate exactly one form.
    pub fn eval_str(&mut self, program: &str) -> Result<Value> {
        self.on_eval_stack(|env, ctx| evaluate(program, env, ctx))
    }

    /// Evaluate every top-level form; the last value is the result.
    pub fn eval_program(&mut self, source: &str) -> Result<Value> {
        self.on_eval_stack(|env, ctx| evaluate_program(source, env, ctx))
    }

    /// Read a source file and evaluate it as a program.
    pub fn eval_file(&mut self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| CrispError::io(format!("cannot read {}", path.display()), e))?;
        info!(path = %path.display(), bytes = source.len(), "evaluating file");
        self.eval_program(&source)
    }

    /// Run `eval` on a scoped thread with an `EVAL_STACK_SIZE` stack, so
    /// deep recursion ends in `StackOverflow` rather than a native abort.
    fn on_eval_stack<F>(&mut self, eval: F) -> Result<Value>
    where
        F: FnOnce(&mut Environment, &EvalContext) -> Result<Value> + Send,
    {
        let Self { env, ctx } = self;
        let ctx: &EvalContext = ctx;
        thread::scope(|scope| {
            let handle = thread::Builder::new()
                .name("crisp-eval".to_string())
                .stack_size(EVAL_STACK_SIZE)
                .spawn_scoped(scope, move || eval(env, ctx))
                .map_err(|e| CrispError::io("cannot start evaluation thread", e))?;

            handle
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
        })
    }

    /// The global environment.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Mutable access to the global environment.
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// The evaluation context.
    pub fn context(&self) -> &EvalContext {
        &self.ctx
    }

    /// Drop all user definitions and reload the prelude.
    pub fn reset(&mut self) {
        self.env.clear();
        self.env.load_prelude();
        self.ctx.reset_interrupt();
    }

    /// How a result is shown to the user: nothing for `Void`.
    pub fn format_value(value: &Value) -> Option<String> {
        match value {
            Value::Void => None,
            other => Some(other.to_string()),
        }
    }

    /// How an error is shown to the user.
    pub fn format_error(error: &CrispError) -> String {
        format!("error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_definitions_persist_between_calls() {
        let mut crisp = Interpreter::new();
        assert_eq!(crisp.eval_str("(define x 40)").unwrap(), Value::Void);
        assert_eq!(crisp.eval_str("(+ x 2)").unwrap(), Value::Integer(42));
    }

    #[test]
    fn test_reset_drops_user_definitions() {
        let mut crisp = Interpreter::new();
        crisp.eval_str("(define x 1)").unwrap();
        crisp.reset();
        assert!(crisp.eval_str("x").is_err());
        assert!(crisp.environment().contains("car"));
    }

    #[test]
    fn test_format_value_hides_void() {
        assert_eq!(Interpreter::format_value(&Value::Void), None);
        assert_eq!(
            Interpreter::format_value(&Value::string("hi")),
            Some("hi".to_string())
        );
    }

    #[test]
    fn test_format_error() {
        let mut crisp = Interpreter::new();
        let err = crisp.eval_str("nope").unwrap_err();
        assert_eq!(Interpreter::format_error(&err), "error: Unbound symbol: nope");
    }

    #[test]
    fn test_context_depth_applies_to_environment() {
        let crisp = Interpreter::with_context(EvalContext::with_max_call_depth(7));
        assert_eq!(crisp.environment().max_call_depth(), 7);
    }
}
