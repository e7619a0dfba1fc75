// File: src/interpreter/value.rs
//
// Runtime value types for the Hiss interpreter, plus the arithmetic and
// comparison promotion rules.
//
// The value set is closed: integer, float, boolean, string. There is no
// null; an unset variable is an error at lookup, never a value.

use crate::ast::{ArithOp, CmpOp};
use crate::errors::{HissError, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
        }
    }

    /// Numeric view used by comparisons. Booleans coerce to 0/1 here so
    /// that `(1 < 2) < 0` compares a boolean-as-number against zero;
    /// strings have no numeric view.
    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Str(_) => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Bool(b) => Some(if *b { 1 } else { 0 }),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

fn type_error(op: impl fmt::Display, lhs: &Value, rhs: &Value) -> HissError {
    HissError::Type {
        op: op.to_string(),
        operands: format!("{} and {}", lhs.type_name(), rhs.type_name()),
    }
}

/// Applies a binary arithmetic operator with numeric promotion.
///
/// int op int stays int (`/` and `%` truncate toward zero, zero divisor
/// is an error); a float on either side promotes both to float; string +
/// string concatenates; every other mix is a type error. Booleans never
/// participate in arithmetic.
pub fn arith(op: ArithOp, lhs: &Value, rhs: &Value) -> Result<Value> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => {
            let v = match op {
                ArithOp::Add => a.wrapping_add(*b),
                ArithOp::Sub => a.wrapping_sub(*b),
                ArithOp::Mul => a.wrapping_mul(*b),
                ArithOp::Div => {
                    if *b == 0 {
                        return Err(HissError::DivisionByZero);
                    }
                    a.wrapping_div(*b)
                }
                ArithOp::Mod => {
                    if *b == 0 {
                        return Err(HissError::DivisionByZero);
                    }
                    a.wrapping_rem(*b)
                }
            };
            Ok(Value::Int(v))
        }
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            // Mixed numeric: promote to float. Float division by zero
            // follows IEEE 754 rather than raising.
            let a = lhs.as_f64().unwrap_or_default();
            let b = rhs.as_f64().unwrap_or_default();
            let v = match op {
                ArithOp::Add => a + b,
                ArithOp::Sub => a - b,
                ArithOp::Mul => a * b,
                ArithOp::Div => a / b,
                ArithOp::Mod => a % b,
            };
            Ok(Value::Float(v))
        }
        (Value::Str(a), Value::Str(b)) if op == ArithOp::Add => {
            Ok(Value::Str(format!("{}{}", a, b)))
        }
        _ => Err(type_error(op, lhs, rhs)),
    }
}

/// Unary minus. Defined for numbers only.
pub fn negate(operand: &Value) -> Result<Value> {
    match operand {
        Value::Int(v) => Ok(Value::Int(v.wrapping_neg())),
        Value::Float(v) => Ok(Value::Float(-v)),
        _ => Err(HissError::Type {
            op: "unary -".to_string(),
            operands: operand.type_name().to_string(),
        }),
    }
}

/// Applies a comparison operator and yields a Bool.
///
/// Strings compare lexicographically against strings; numbers (and
/// booleans, as 0/1) compare numerically, entirely in i64 when no float
/// is involved. A string against anything else is a type error.
pub fn compare(op: CmpOp, lhs: &Value, rhs: &Value) -> Result<Value> {
    let result = match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => apply_ord(op, a.as_str(), b.as_str()),
        _ => match (lhs.as_i64(), rhs.as_i64()) {
            (Some(a), Some(b)) => apply_ord(op, &a, &b),
            _ => match (lhs.as_f64(), rhs.as_f64()) {
                (Some(a), Some(b)) => apply_ord(op, &a, &b),
                _ => return Err(type_error(op, lhs, rhs)),
            },
        },
    };
    Ok(Value::Bool(result))
}

fn apply_ord<T: PartialOrd + ?Sized>(op: CmpOp, a: &T, b: &T) -> bool {
    match op {
        CmpOp::Lt => a < b,
        CmpOp::Le => a <= b,
        CmpOp::Gt => a > b,
        CmpOp::Ge => a >= b,
        CmpOp::Eq => a == b,
        CmpOp::Ne => a != b,
    }
}
