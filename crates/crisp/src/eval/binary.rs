//! Infix operator evaluation: `(op left right)`

use crate::error::type_name;
use crate::{Environment, EvalContext, EvalError, Value};

use super::Evaluate;

/// The two-operand operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `=`
    Eq,
    /// `!=`
    Ne,
}

impl BinaryOp {
    /// Map an operator symbol to its operation.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Rem,
            "<" => BinaryOp::Lt,
            ">" => BinaryOp::Gt,
            "<=" => BinaryOp::Le,
            ">=" => BinaryOp::Ge,
            "=" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            _ => return None,
        };
        Some(op)
    }

    /// The operator's source symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
        }
    }
}

/// Evaluate both operands, then apply `op`.
pub fn eval_infix(
    op: BinaryOp,
    operands: &[Value],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let [left, right] = operands else {
        return Err(EvalError::invalid_form(
            op.symbol(),
            "Invalid number of arguments for infix operator",
        ));
    };

    let left = left.eval(env, ctx)?;
    let right = right.eval(env, ctx)?;
    apply(op, &left, &right)
}

/// Apply an operator to two evaluated operands.
pub fn apply(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Eq => eval_eq(left, right).map(Value::Bool),
        BinaryOp::Ne => eval_eq(left, right).map(|eq| Value::Bool(!eq)),

        // String concatenation
        BinaryOp::Add => match (left, right) {
            (Value::String(a), Value::String(b)) => {
                Ok(Value::string(format!("{}{}", a.as_str(), b.as_str())))
            }
            _ => eval_arithmetic(op, numeric_pair(op, left, right)?),
        },

        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            eval_arithmetic(op, numeric_pair(op, left, right)?)
        }

        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => {
            eval_comparison(op, numeric_pair(op, left, right)?)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Numeric Promotion
// ═══════════════════════════════════════════════════════════════════════

/// Operands after promotion: both integers, or both floats.
enum Numeric {
    Int(i64, i64),
    Float(f64, f64),
}

fn numeric_pair(op: BinaryOp, left: &Value, right: &Value) -> Result<Numeric, EvalError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Numeric::Int(*a, *b)),
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            match (left.as_f64(), right.as_f64()) {
                (Some(a), Some(b)) => Ok(Numeric::Float(a, b)),
                _ => Err(operand_error(op, left, right)),
            }
        }
        _ => Err(operand_error(op, left, right)),
    }
}

fn operand_error(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    EvalError::type_error(format!(
        "`{}` expects numeric operands, got {} and {}",
        op.symbol(),
        type_name(left),
        type_name(right)
    ))
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic Operations
// ═══════════════════════════════════════════════════════════════════════

fn eval_arithmetic(op: BinaryOp, operands: Numeric) -> Result<Value, EvalError> {
    match operands {
        Numeric::Int(a, b) => {
            let result = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Sub => a.checked_sub(b),
                BinaryOp::Mul => a.checked_mul(b),
                BinaryOp::Div | BinaryOp::Rem if b == 0 => return Err(EvalError::DivisionByZero),
                BinaryOp::Div => a.checked_div(b),
                BinaryOp::Rem => a.checked_rem(b),
                _ => unreachable!("not an arithmetic operator: {:?}", op),
            };
            result.map(Value::Integer).ok_or(EvalError::IntegerOverflow)
        }
        Numeric::Float(a, b) => {
            let result = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div | BinaryOp::Rem if b == 0.0 => return Err(EvalError::DivisionByZero),
                BinaryOp::Div => a / b,
                BinaryOp::Rem => a % b,
                _ => unreachable!("not an arithmetic operator: {:?}", op),
            };
            Ok(Value::Float(result))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Comparison Operations
// ═══════════════════════════════════════════════════════════════════════

fn eval_comparison(op: BinaryOp, operands: Numeric) -> Result<Value, EvalError> {
    let ordering = match operands {
        Numeric::Int(a, b) => Some(a.cmp(&b)),
        Numeric::Float(a, b) => a.partial_cmp(&b),
    };

    // NaN compares false against everything
    let Some(ordering) = ordering else {
        return Ok(Value::Bool(false));
    };

    let result = match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::Le => ordering.is_le(),
        BinaryOp::Ge => ordering.is_ge(),
        _ => unreachable!("not a comparison operator: {:?}", op),
    };
    Ok(Value::Bool(result))
}

/// `=` compares numbers after promotion and everything else structurally.
fn eval_eq(left: &Value, right: &Value) -> Result<bool, EvalError> {
    match (left, right) {
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            match numeric_pair(BinaryOp::Eq, left, right)? {
                Numeric::Int(a, b) => Ok(a == b),
                Numeric::Float(a, b) => Ok(a == b),
            }
        }
        (Value::Bool(_), Value::Bool(_))
        | (Value::String(_), Value::String(_))
        | (Value::Symbol(_), Value::Symbol(_))
        | (Value::List(_), Value::List(_))
        | (Value::Void, Value::Void) => Ok(left == right),
        _ => Err(EvalError::type_error(format!(
            "cannot compare {} with {}",
            type_name(left),
            type_name(right)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int(n: i64) -> Value {
        Value::Integer(n)
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(apply(BinaryOp::Add, &int(2), &int(3)).unwrap(), int(5));
        assert_eq!(apply(BinaryOp::Sub, &int(2), &int(3)).unwrap(), int(-1));
        assert_eq!(apply(BinaryOp::Mul, &int(4), &int(3)).unwrap(), int(12));
        assert_eq!(apply(BinaryOp::Div, &int(7), &int(2)).unwrap(), int(3));
        assert_eq!(apply(BinaryOp::Rem, &int(7), &int(2)).unwrap(), int(1));
    }

    #[test]
    fn test_mixed_operands_promote_to_float() {
        assert_eq!(
            apply(BinaryOp::Div, &int(7), &Value::Float(2.0)).unwrap(),
            Value::Float(3.5)
        );
        assert_eq!(
            apply(BinaryOp::Lt, &Value::Float(1.5), &int(2)).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_overflow_and_division_by_zero() {
        assert_eq!(
            apply(BinaryOp::Add, &int(i64::MAX), &int(1)),
            Err(EvalError::IntegerOverflow)
        );
        assert_eq!(
            apply(BinaryOp::Div, &int(i64::MIN), &int(-1)),
            Err(EvalError::IntegerOverflow)
        );
        assert_eq!(
            apply(BinaryOp::Div, &int(1), &int(0)),
            Err(EvalError::DivisionByZero)
        );
        assert_eq!(
            apply(BinaryOp::Rem, &Value::Float(1.0), &Value::Float(0.0)),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn test_equality_rules() {
        assert_eq!(
            apply(BinaryOp::Eq, &int(1), &Value::Float(1.0)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            apply(BinaryOp::Ne, &Value::string("a"), &Value::string("b")).unwrap(),
            Value::Bool(true)
        );
        assert!(apply(BinaryOp::Eq, &int(1), &Value::string("1")).is_err());
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            apply(BinaryOp::Add, &Value::string("foo"), &Value::string("bar")).unwrap(),
            Value::string("foobar")
        );
    }

    #[test]
    fn test_non_numeric_operand_message() {
        let err = apply(BinaryOp::Mul, &Value::Bool(true), &int(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type error: `*` expects numeric operands, got bool and integer"
        );
    }

    #[test]
    fn test_symbol_round_trip() {
        for sym in ["+", "-", "*", "/", "%", "<", ">", "<=", ">=", "=", "!="] {
            assert_eq!(BinaryOp::from_symbol(sym).map(|op| op.symbol()), Some(sym));
        }
        assert_eq!(BinaryOp::from_symbol("define"), None);
    }
}
