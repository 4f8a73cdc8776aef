//! Standard prelude with built-in functions

use super::Environment;
use crate::error::type_name;
use crate::value::{BuiltinFn, Value};

impl Environment {
    /// Create an environment with standard built-in functions.
    pub fn with_prelude() -> Self {
        let mut env = Self::new();
        env.load_prelude();
        env
    }

    /// Load the standard prelude into this environment.
    pub fn load_prelude(&mut self) {
        // Printing
        self.define_builtin(BuiltinFn::new("print", -1, builtin_print));
        self.define_builtin(BuiltinFn::new("println", -1, builtin_println));

        // Type inspection
        self.define_builtin(BuiltinFn::new("type-of", 1, builtin_type_of));

        // Lists
        self.define_builtin(BuiltinFn::new("list", -1, builtin_list));
        self.define_builtin(BuiltinFn::new("car", 1, builtin_car));
        self.define_builtin(BuiltinFn::new("cdr", 1, builtin_cdr));
        self.define_builtin(BuiltinFn::new("cons", 2, builtin_cons));
        self.define_builtin(BuiltinFn::new("length", 1, builtin_length));
        self.define_builtin(BuiltinFn::new("null?", 1, builtin_is_null));

        // Logic
        self.define_builtin(BuiltinFn::new("not", 1, builtin_not));

        // Assertions and failure
        self.define_builtin(BuiltinFn::new("assert", 1, builtin_assert));
        self.define_builtin(BuiltinFn::new("assert-eq", 2, builtin_assert_eq));
        self.define_builtin(BuiltinFn::new("error", -1, builtin_error));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Function Implementations
// ═══════════════════════════════════════════════════════════════════════

fn join_display(args: &[Value]) -> String {
    args.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn builtin_print(args: &[Value]) -> Result<Value, String> {
    print!("{}", join_display(args));
    Ok(Value::Void)
}

fn builtin_println(args: &[Value]) -> Result<Value, String> {
    println!("{}", join_display(args));
    Ok(Value::Void)
}

fn builtin_type_of(args: &[Value]) -> Result<Value, String> {
    Ok(Value::string(type_name(&args[0])))
}

fn builtin_list(args: &[Value]) -> Result<Value, String> {
    Ok(Value::list(args.to_vec()))
}

fn expect_list<'a>(value: &'a Value, what: &str) -> Result<&'a [Value], String> {
    value
        .as_list()
        .ok_or_else(|| format!("{} expects a list, got {}", what, type_name(value)))
}

fn builtin_car(args: &[Value]) -> Result<Value, String> {
    expect_list(&args[0], "car")?
        .first()
        .cloned()
        .ok_or_else(|| "car of empty list".to_string())
}

fn builtin_cdr(args: &[Value]) -> Result<Value, String> {
    match expect_list(&args[0], "cdr")? {
        [] => Err("cdr of empty list".to_string()),
        [_, rest @ ..] => Ok(Value::list(rest.to_vec())),
    }
}

fn builtin_cons(args: &[Value]) -> Result<Value, String> {
    let tail = expect_list(&args[1], "cons")?;
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(args[0].clone());
    items.extend_from_slice(tail);
    Ok(Value::list(items))
}

fn builtin_length(args: &[Value]) -> Result<Value, String> {
    let len = match &args[0] {
        Value::String(s) => s.chars().count(),
        other => expect_list(other, "length")?.len(),
    };
    i64::try_from(len)
        .map(Value::Integer)
        .map_err(|_| "length does not fit in an integer".to_string())
}

fn builtin_is_null(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Bool(args[0].is_nil()))
}

fn builtin_not(args: &[Value]) -> Result<Value, String> {
    match &args[0] {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Err(format!("not expects bool, got {}", type_name(other))),
    }
}

fn builtin_assert(args: &[Value]) -> Result<Value, String> {
    match &args[0] {
        Value::Bool(true) => Ok(Value::Void),
        Value::Bool(false) => Err("assertion failed".to_string()),
        other => Err(format!("assert expects bool, got {}", type_name(other))),
    }
}

fn builtin_assert_eq(args: &[Value]) -> Result<Value, String> {
    if args[0] == args[1] {
        Ok(Value::Void)
    } else {
        Err(format!("assertion failed: {:?} != {:?}", args[0], args[1]))
    }
}

fn builtin_error(args: &[Value]) -> Result<Value, String> {
    if args.is_empty() {
        Err("explicit error".to_string())
    } else {
        Err(join_display(args))
    }
}
