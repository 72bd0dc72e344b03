//! Binary operator semantics.
//!
//! Coercion rules are intentionally strict and are implemented exactly once:
//! the interpreter, the stack VM and the register VM all evaluate operators
//! through [`binary`], which is what guarantees that the backends agree on
//! results and on error classifications.
//!
//! The rules:
//!
//! - `+` : number+number adds; string+string concatenates; anything else is
//!   a type error.
//! - `-`, `/` : numbers only; `/` by zero is a math error.
//! - `*` : number*number multiplies; string * non-negative integer (either
//!   order) repeats the string.
//! - `< > <= >=` : natural order for numbers, lexicographic for strings,
//!   type error for mismatched operands.
//! - `== !=` : structural equality for any pair; mismatched types compare
//!   unequal rather than failing.
//!
//! Errors leave the location empty; the backend that knows the failing
//! construct attaches it with [`jusu_util::JusuError::or_loc`].

use jusu_par::BinOp;
use jusu_util::{JusuError, Loc, Result};

use crate::value::Value;

/// Applies a binary operator to two evaluated operands.
pub fn binary(op: BinOp, left: &Value, right: &Value) -> Result<Value> {
    match op {
        BinOp::Add => add(left, right),
        BinOp::Sub => sub(left, right),
        BinOp::Mul => mul(left, right),
        BinOp::Div => div(left, right),
        BinOp::Eq => Ok(Value::Bool(left == right)),
        BinOp::Ne => Ok(Value::Bool(left != right)),
        BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => ordered(op, left, right),
    }
}

fn add(left: &Value, right: &Value) -> Result<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::Str(a), Value::Str(b)) => {
            let mut out = String::with_capacity(a.len() + b.len());
            out.push_str(a);
            out.push_str(b);
            Ok(Value::Str(out))
        }
        _ => Err(type_error("+", left, right)),
    }
}

fn sub(left: &Value, right: &Value) -> Result<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
        _ => Err(type_error("-", left, right)),
    }
}

fn mul(left: &Value, right: &Value) -> Result<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
        (Value::Str(s), Value::Number(n)) | (Value::Number(n), Value::Str(s)) => {
            match repeat_count(*n) {
                Some(count) => Ok(Value::Str(s.repeat(count))),
                None => Err(type_error("*", left, right)),
            }
        }
        _ => Err(type_error("*", left, right)),
    }
}

fn div(left: &Value, right: &Value) -> Result<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            if *b == 0.0 {
                return Err(JusuError::zero_division("Division by zero", Loc::NONE));
            }
            Ok(Value::Number(a / b))
        }
        _ => Err(type_error("/", left, right)),
    }
}

fn ordered(op: BinOp, left: &Value, right: &Value) -> Result<Value> {
    let result = match (left, right) {
        (Value::Number(a), Value::Number(b)) => compare(op, a.partial_cmp(b)),
        (Value::Str(a), Value::Str(b)) => compare(op, a.partial_cmp(b)),
        _ => {
            return Err(JusuError::type_error(
                format!(
                    "Cannot compare types {} and {}",
                    left.type_name(),
                    right.type_name()
                ),
                Loc::NONE,
            ));
        }
    };
    Ok(Value::Bool(result))
}

fn compare(op: BinOp, ordering: Option<std::cmp::Ordering>) -> bool {
    use std::cmp::Ordering::*;
    // partial_cmp is None only for NaN operands, which compare false under
    // every ordered operator.
    match ordering {
        Some(ord) => match op {
            BinOp::Lt => ord == Less,
            BinOp::Gt => ord == Greater,
            BinOp::Le => ord != Greater,
            BinOp::Ge => ord != Less,
            _ => unreachable!("ordered() is only called for ordered operators"),
        },
        None => false,
    }
}

/// A string repeat count must be a non-negative integer.
fn repeat_count(n: f64) -> Option<usize> {
    if n >= 0.0 && n.fract() == 0.0 && n <= usize::MAX as f64 {
        Some(n as usize)
    } else {
        None
    }
}

fn type_error(symbol: &str, left: &Value, right: &Value) -> JusuError {
    JusuError::type_error(
        format!(
            "Cannot apply '{}' to types {} and {}",
            symbol,
            left.type_name(),
            right.type_name()
        ),
        Loc::NONE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn s(text: &str) -> Value {
        Value::Str(text.to_string())
    }

    #[test]
    fn numeric_arithmetic() {
        assert_eq!(binary(BinOp::Add, &num(20.0), &num(5.0)).unwrap(), num(25.0));
        assert_eq!(binary(BinOp::Sub, &num(9.0), &num(3.0)).unwrap(), num(6.0));
        assert_eq!(binary(BinOp::Mul, &num(2.5), &num(4.0)).unwrap(), num(10.0));
        assert_eq!(binary(BinOp::Div, &num(7.0), &num(2.0)).unwrap(), num(3.5));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(binary(BinOp::Add, &s("Hello "), &s("Alice")).unwrap(), s("Hello Alice"));
    }

    #[test]
    fn add_mixed_types_is_type_error() {
        let err = binary(BinOp::Add, &num(1.0), &s("x")).unwrap_err();
        assert_eq!(err.classification(), "Type Error");
        assert!(err.to_string().contains("number"));
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn string_repetition() {
        assert_eq!(binary(BinOp::Mul, &s("ab"), &num(3.0)).unwrap(), s("ababab"));
        assert_eq!(binary(BinOp::Mul, &num(2.0), &s("x")).unwrap(), s("xx"));
        assert_eq!(binary(BinOp::Mul, &s("x"), &num(0.0)).unwrap(), s(""));
    }

    #[test]
    fn fractional_or_negative_repeat_is_type_error() {
        assert_eq!(
            binary(BinOp::Mul, &s("x"), &num(1.5)).unwrap_err().classification(),
            "Type Error"
        );
        assert_eq!(
            binary(BinOp::Mul, &s("x"), &num(-1.0)).unwrap_err().classification(),
            "Type Error"
        );
    }

    #[test]
    fn division_by_zero_is_math_error() {
        let err = binary(BinOp::Div, &num(1.0), &num(0.0)).unwrap_err();
        assert_eq!(err.classification(), "Math Error");
    }

    #[test]
    fn subtraction_requires_numbers() {
        let err = binary(BinOp::Sub, &s("a"), &s("b")).unwrap_err();
        assert_eq!(err.classification(), "Type Error");
    }

    #[test]
    fn ordered_comparisons() {
        assert_eq!(binary(BinOp::Lt, &num(1.0), &num(2.0)).unwrap(), Value::Bool(true));
        assert_eq!(binary(BinOp::Ge, &num(2.0), &num(2.0)).unwrap(), Value::Bool(true));
        assert_eq!(binary(BinOp::Lt, &s("apple"), &s("banana")).unwrap(), Value::Bool(true));
    }

    #[test]
    fn ordered_comparison_across_types_is_type_error() {
        let err = binary(BinOp::Lt, &num(1.0), &s("2")).unwrap_err();
        assert_eq!(err.classification(), "Type Error");
    }

    #[test]
    fn equality_across_types_is_false_not_error() {
        assert_eq!(binary(BinOp::Eq, &num(1.0), &s("1")).unwrap(), Value::Bool(false));
        assert_eq!(binary(BinOp::Ne, &num(1.0), &s("1")).unwrap(), Value::Bool(true));
    }

    #[test]
    fn nan_ordered_comparisons_are_false() {
        let nan = num(f64::NAN);
        assert_eq!(binary(BinOp::Lt, &nan, &num(1.0)).unwrap(), Value::Bool(false));
        assert_eq!(binary(BinOp::Ge, &nan, &num(1.0)).unwrap(), Value::Bool(false));
    }
}
