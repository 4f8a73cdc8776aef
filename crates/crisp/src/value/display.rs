//! Display and Debug implementations for Value

use std::fmt;

use super::*;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Integer(n) => write!(f, "{}", n),
            // `{:?}` keeps the trailing `.0` on whole floats
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Bool(b) => write!(f, "{}", b),

            Value::String(s) => write!(f, "{:?}", s.as_str()),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::List(items) => write_list(f, items),

            Value::Lambda(lambda) => {
                write!(f, "(lambda (")?;
                for (i, param) in lambda.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ")")?;
                for form in lambda.body.iter() {
                    write!(f, " {:?}", form)?;
                }
                write!(f, ")")
            }
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s.as_str()), // No quotes for Display
            _ => fmt::Debug::fmt(self, f),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{:?}", item)?;
    }
    write!(f, ")")
}
