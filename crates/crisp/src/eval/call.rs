//! Function call evaluation

use tracing::debug;

use crate::error::type_name;
use crate::{BuiltinFn, Environment, EvalContext, EvalError, LambdaValue, Value};

use super::{eval_args, eval_body};

/// Evaluate `(name args...)` where `name` is not an operator or special form.
pub fn eval_named_call(
    name: &str,
    args: &[Value],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let func = env
        .get(name)
        .cloned()
        .ok_or_else(|| EvalError::UndefinedVariable {
            name: name.to_string(),
        })?;

    if !func.is_callable() {
        return Err(EvalError::type_error(format!(
            "Not a lambda: {} is a {}",
            name,
            type_name(&func)
        )));
    }

    let args = eval_args(args, env, ctx)?;
    call_named(&func, name, args, env, ctx)
}

/// Call a Value as a function.
///
/// # Errors
///
/// Returns `TypeError` if the value is not callable.
/// Returns `ArityMismatch` if the argument count doesn't match.
pub fn call_value(
    func: Value,
    args: Vec<Value>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    call_named(&func, "<lambda>", args, env, ctx)
}

fn call_named(
    func: &Value,
    name: &str,
    args: Vec<Value>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    match func {
        Value::Lambda(lambda) => call_lambda(lambda, name, args, env, ctx),
        Value::Builtin(builtin) => call_builtin(builtin, args, ctx),
        other => Err(EvalError::type_error(format!(
            "expected function, found {}",
            type_name(other)
        ))),
    }
}

/// Call a user-defined lambda.
fn call_lambda(
    lambda: &LambdaValue,
    name: &str,
    args: Vec<Value>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    // Check arity
    if args.len() != lambda.arity() {
        return Err(EvalError::ArityMismatch {
            expected: lambda.arity(),
            got: args.len(),
            name: name.to_string(),
        });
    }

    // Both the context and the environment may cap recursion
    if env.call_depth() >= ctx.max_call_depth {
        return Err(EvalError::StackOverflow {
            depth: env.call_depth(),
            max: ctx.max_call_depth,
        });
    }
    env.enter_call()?;

    if ctx.trace {
        debug!(name, args = ?args, depth = env.call_depth(), "call");
    }

    // New scope: captures first, then parameters
    env.push_frame();
    for (capture, value) in lambda.captures.iter() {
        env.define(capture.clone(), value.clone());
    }
    for (param, arg) in lambda.params.iter().zip(args) {
        env.define(param.clone(), arg);
    }

    let result = eval_body(&lambda.body, env, ctx);

    // Clean up (even on error)
    env.pop_frame();
    env.exit_call();

    if ctx.trace {
        debug!(name, result = ?result, "return");
    }
    result
}

/// Call a built-in function.
fn call_builtin(
    func: &BuiltinFn,
    args: Vec<Value>,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    // Check arity (if not variadic)
    if !func.is_variadic() && args.len() != func.arity as usize {
        return Err(EvalError::ArityMismatch {
            expected: func.arity as usize,
            got: args.len(),
            name: func.name.clone(),
        });
    }

    if ctx.trace {
        debug!(name = %func.name, args = ?args, "builtin call");
    }

    (func.func)(&args).map_err(|message| EvalError::BuiltinError {
        name: func.name.clone(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn add_lambda() -> Value {
        let body = vec![Value::list(vec![
            Value::symbol("+"),
            Value::symbol("a"),
            Value::symbol("b"),
        ])];
        Value::lambda(LambdaValue::new(
            vec!["a".to_string(), "b".to_string()],
            body,
        ))
    }

    #[test]
    fn test_call_lambda_binds_parameters() {
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        let result = call_value(
            add_lambda(),
            vec![Value::Integer(2), Value::Integer(40)],
            &mut env,
            &ctx,
        );
        assert_eq!(result.unwrap(), Value::Integer(42));
        // Parameters do not leak into the caller's scope
        assert!(!env.contains("a"));
        assert_eq!(env.call_depth(), 0);
    }

    #[test]
    fn test_call_lambda_arity_mismatch() {
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        let err = call_value(add_lambda(), vec![Value::Integer(1)], &mut env, &ctx).unwrap_err();
        assert_eq!(
            err,
            EvalError::ArityMismatch {
                expected: 2,
                got: 1,
                name: "<lambda>".to_string(),
            }
        );
    }

    #[test]
    fn test_call_builtin_wraps_errors() {
        let failing = Value::Builtin(BuiltinFn::new("boom", 0, |_| Err("kaput".to_string())));
        let mut env = Environment::new();
        let err = call_value(failing, vec![], &mut env, &EvalContext::default()).unwrap_err();
        assert_eq!(err.to_string(), "boom: kaput");
    }

    #[test]
    fn test_call_non_callable() {
        let mut env = Environment::new();
        let err = call_value(Value::Integer(3), vec![], &mut env, &EvalContext::default())
            .unwrap_err();
        assert!(matches!(err, EvalError::TypeError { .. }));
    }

    #[test]
    fn test_frame_popped_after_error() {
        let body = vec![Value::symbol("missing")];
        let lambda = Value::lambda(LambdaValue::new(vec!["x".to_string()], body));
        let mut env = Environment::new();
        let result = call_value(
            lambda,
            vec![Value::Integer(1)],
            &mut env,
            &EvalContext::default(),
        );
        assert!(result.is_err());
        assert_eq!(env.depth(), 1);
        assert_eq!(env.call_depth(), 0);
    }
}
