//! Special forms: operands are not evaluated up front

use std::collections::HashSet;

use tracing::debug;

use crate::error::type_name;
use crate::{Environment, EvalContext, EvalError, LambdaValue, Value};

use super::{eval_body, Evaluate};

/// Forms the evaluator handles before any function lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    /// `(define sym expr)`
    Define,
    /// `(if cond then else)`
    If,
    /// `(lambda (params...) body...)`
    Lambda,
    /// `(quote form)`
    Quote,
    /// `(begin forms...)`
    Begin,
    /// `(set! sym expr)`
    Set,
    /// `(and exprs...)`
    And,
    /// `(or exprs...)`
    Or,
    /// `(let ((name expr)...) body...)`
    Let,
}

impl SpecialForm {
    /// Map a head symbol to its special form.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let form = match symbol {
            "define" => SpecialForm::Define,
            "if" => SpecialForm::If,
            "lambda" => SpecialForm::Lambda,
            "quote" => SpecialForm::Quote,
            "begin" => SpecialForm::Begin,
            "set!" => SpecialForm::Set,
            "and" => SpecialForm::And,
            "or" => SpecialForm::Or,
            "let" => SpecialForm::Let,
            _ => return None,
        };
        Some(form)
    }

    /// The form's head symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            SpecialForm::Define => "define",
            SpecialForm::If => "if",
            SpecialForm::Lambda => "lambda",
            SpecialForm::Quote => "quote",
            SpecialForm::Begin => "begin",
            SpecialForm::Set => "set!",
            SpecialForm::And => "and",
            SpecialForm::Or => "or",
            SpecialForm::Let => "let",
        }
    }
}

/// Evaluate a special form; `args` excludes the head symbol.
pub fn eval_special(
    form: SpecialForm,
    args: &[Value],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    match form {
        SpecialForm::Define => eval_define(args, env, ctx),
        SpecialForm::If => eval_if(args, env, ctx),
        SpecialForm::Lambda => eval_lambda(args, env),
        SpecialForm::Quote => eval_quote(args),
        SpecialForm::Begin => eval_body(args, env, ctx),
        SpecialForm::Set => eval_set(args, env, ctx),
        SpecialForm::And => eval_logical(form, args, false, env, ctx),
        SpecialForm::Or => eval_logical(form, args, true, env, ctx),
        SpecialForm::Let => eval_let(args, env, ctx),
    }
}

fn eval_define(
    args: &[Value],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let [target, expr] = args else {
        return Err(EvalError::invalid_form(
            "define",
            "Invalid number of arguments for define",
        ));
    };
    let Value::Symbol(name) = target else {
        return Err(EvalError::invalid_form(
            "define",
            format!("Invalid define: expected a symbol, got {}", type_name(target)),
        ));
    };

    let value = expr.eval(env, ctx)?;
    if ctx.trace {
        debug!(name = %name, value = ?value, "define");
    }
    env.define(name.to_string(), value);
    Ok(Value::Void)
}

fn eval_if(args: &[Value], env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
    let [cond, then_branch, else_branch] = args else {
        return Err(EvalError::invalid_form(
            "if",
            "Invalid number of arguments for if statement",
        ));
    };

    match cond.eval(env, ctx)? {
        Value::Bool(true) => then_branch.eval(env, ctx),
        Value::Bool(false) => else_branch.eval(env, ctx),
        other => Err(EvalError::type_error(format!(
            "Condition must be a boolean, got {}",
            type_name(&other)
        ))),
    }
}

fn eval_lambda(args: &[Value], env: &Environment) -> Result<Value, EvalError> {
    let Some((Value::List(param_forms), body)) = args.split_first() else {
        return Err(EvalError::invalid_form(
            "lambda",
            "Invalid lambda: expected a parameter list",
        ));
    };
    if body.is_empty() {
        return Err(EvalError::invalid_form("lambda", "Invalid lambda: missing body"));
    }

    let params = param_forms
        .iter()
        .map(|param| match param {
            Value::Symbol(s) => Ok(s.to_string()),
            other => Err(EvalError::invalid_form(
                "lambda",
                format!("Invalid lambda parameter: {}", other),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let captures = capture_locals(body, &params, env);
    Ok(Value::lambda(
        LambdaValue::new(params, body.to_vec()).with_captures(captures),
    ))
}

/// Snapshot the non-global bindings a lambda body refers to.
///
/// Globals are left out so that later top-level definitions, including
/// the lambda's own name, resolve when the lambda is called.
fn capture_locals(body: &[Value], params: &[String], env: &Environment) -> Vec<(String, Value)> {
    if env.is_global_scope() {
        return Vec::new();
    }

    let mut seen: HashSet<&str> = params.iter().map(String::as_str).collect();
    let mut captures = Vec::new();
    let mut stack: Vec<&Value> = body.iter().collect();

    while let Some(form) = stack.pop() {
        match form {
            Value::Symbol(name) => {
                if seen.insert(name) {
                    if let Some(value) = env.get_local(name) {
                        captures.push((name.to_string(), value.clone()));
                    }
                }
            }
            Value::List(items) => stack.extend(items.iter()),
            _ => {}
        }
    }

    captures
}

fn eval_quote(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [form] => Ok(form.clone()),
        _ => Err(EvalError::invalid_form(
            "quote",
            "Invalid number of arguments for quote",
        )),
    }
}

fn eval_set(args: &[Value], env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
    let [Value::Symbol(name), expr] = args else {
        return Err(EvalError::invalid_form(
            "set!",
            "Invalid set!: expected (set! symbol expr)",
        ));
    };

    let value = expr.eval(env, ctx)?;
    env.assign(name, value)?;
    Ok(Value::Void)
}

/// `and` stops at the first `false`, `or` at the first `true`.
fn eval_logical(
    form: SpecialForm,
    args: &[Value],
    short_circuit_on: bool,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    for arg in args {
        match arg.eval(env, ctx)? {
            Value::Bool(b) if b == short_circuit_on => return Ok(Value::Bool(b)),
            Value::Bool(_) => {}
            other => {
                return Err(EvalError::type_error(format!(
                    "`{}` expects bool operands, got {}",
                    form.symbol(),
                    type_name(&other)
                )))
            }
        }
    }
    Ok(Value::Bool(!short_circuit_on))
}

fn eval_let(args: &[Value], env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
    let Some((Value::List(binding_forms), body)) = args.split_first() else {
        return Err(EvalError::invalid_form(
            "let",
            "Invalid let: expected a binding list",
        ));
    };

    // Initializers see the outer scope only
    let mut bindings = Vec::with_capacity(binding_forms.len());
    for binding in binding_forms.iter() {
        let Some([Value::Symbol(name), init]) = binding.as_list() else {
            return Err(EvalError::invalid_form(
                "let",
                format!("Invalid let binding: {}", binding),
            ));
        };
        bindings.push((name.to_string(), init.eval(env, ctx)?));
    }

    let mut scope = env.scope_guard();
    for (name, value) in bindings {
        scope.define(name, value);
    }
    eval_body(body, &mut scope, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_symbol_round_trip() {
        for form in [
            SpecialForm::Define,
            SpecialForm::If,
            SpecialForm::Lambda,
            SpecialForm::Quote,
            SpecialForm::Begin,
            SpecialForm::Set,
            SpecialForm::And,
            SpecialForm::Or,
            SpecialForm::Let,
        ] {
            assert_eq!(SpecialForm::from_symbol(form.symbol()), Some(form));
        }
    }

    #[test]
    fn test_capture_skips_globals_and_params() {
        let mut env = Environment::new();
        env.define("global", Value::Integer(1));
        env.push_frame();
        env.define("local", Value::Integer(2));
        env.define("x", Value::Integer(3));

        let body = vec![Value::list(vec![
            Value::symbol("+"),
            Value::symbol("global"),
            Value::list(vec![Value::symbol("local"), Value::symbol("x")]),
        ])];
        let captures = capture_locals(&body, &["x".to_string()], &env);

        assert_eq!(captures, vec![("local".to_string(), Value::Integer(2))]);
    }

    #[test]
    fn test_capture_at_global_scope_is_empty() {
        let mut env = Environment::new();
        env.define("y", Value::Integer(1));
        assert!(capture_locals(&[Value::symbol("y")], &[], &env).is_empty());
    }
}
