//! Form evaluation

pub mod binary;
pub mod call;
pub mod special;

use tracing::trace;

use crate::error::CrispError;
use crate::parser::{parse, parse_program};
use crate::{Environment, EvalContext, EvalError, Value};

pub use binary::BinaryOp;
pub use call::call_value;
pub use special::SpecialForm;

/// Trait for evaluating forms to values.
///
/// This is the core abstraction for the tree-walking interpreter.
pub trait Evaluate {
    /// Evaluate this form in the given environment.
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError>;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Form Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Value {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        // Check for interruption before each form
        if ctx.is_interrupted() {
            return Err(EvalError::Interrupted);
        }

        match self {
            Value::Symbol(name) => eval_symbol(name, env),
            Value::List(items) => eval_list(items, env, ctx),

            // Everything else is self-evaluating
            Value::Void
            | Value::Integer(_)
            | Value::Float(_)
            | Value::Bool(_)
            | Value::String(_)
            | Value::Lambda(_)
            | Value::Builtin(_) => Ok(self.clone()),
        }
    }
}

fn eval_symbol(name: &str, env: &Environment) -> Result<Value, EvalError> {
    env.get(name)
        .cloned()
        .ok_or_else(|| EvalError::UndefinedVariable {
            name: name.to_string(),
        })
}

fn eval_list(
    items: &[Value],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let Some((head, rest)) = items.split_first() else {
        return Ok(Value::nil());
    };

    if let Value::Symbol(name) = head {
        if let Some(op) = BinaryOp::from_symbol(name) {
            return binary::eval_infix(op, rest, env, ctx);
        }
        if let Some(form) = SpecialForm::from_symbol(name) {
            return special::eval_special(form, rest, env, ctx);
        }
        return call::eval_named_call(name, rest, env, ctx);
    }

    // A computed head is either a callable or the first item of a sequence
    let head_value = head.eval(env, ctx)?;
    if head_value.is_callable() {
        let args = eval_args(rest, env, ctx)?;
        return call_value(head_value, args, env, ctx);
    }

    let mut results = Vec::with_capacity(items.len());
    if !head_value.is_void() {
        results.push(head_value);
    }
    for item in rest {
        let value = item.eval(env, ctx)?;
        if !value.is_void() {
            results.push(value);
        }
    }
    Ok(Value::list(results))
}

/// Evaluate arguments left to right.
pub(crate) fn eval_args(
    args: &[Value],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Vec<Value>, EvalError> {
    args.iter().map(|arg| arg.eval(env, ctx)).collect()
}

/// Evaluate forms in order, returning the last value (`Void` if none).
pub(crate) fn eval_body(
    forms: &[Value],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let mut last_value = Value::Void;
    for form in forms {
        last_value = form.eval(env, ctx)?;
    }
    Ok(last_value)
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate an already-parsed form (convenience wrapper).
pub fn eval_form(
    form: &Value,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    form.eval(env, ctx)
}

/// Parse exactly one form from `program` and evaluate it.
///
/// Runs on the caller's stack. [`Interpreter`](crate::Interpreter) runs
/// evaluation on a thread sized for the full call-depth limit.
pub fn evaluate(
    program: &str,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, CrispError> {
    let form = parse(program)?;
    Ok(form.eval(env, ctx)?)
}

/// Evaluate every top-level form of `source`; the last value is the result.
pub fn evaluate_program(
    source: &str,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, CrispError> {
    let forms = parse_program(source)?;
    trace!(forms = forms.len(), "evaluating program");
    Ok(eval_body(&forms, env, ctx)?)
}
