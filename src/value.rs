use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::ExprError;

/// A primitive value carried by an expression node.
///
/// Arithmetic between two `Int`s stays `Int` (wrapping two's-complement);
/// any `Float` operand promotes the operation to `Float`, and division
/// always promotes. Equality across the numeric variants compares
/// numerically after promotion.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Signed integer.
    Int(i64),
    /// Double-precision float.
    Float(f64),
    /// Boolean, rendered as `True` / `False`.
    Bool(bool),
    /// String, rendered quoted.
    Str(String),
    /// The absent value, rendered as `Null`.
    Null,
}

impl Value {
    /// Short variant name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::Null => "null",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn add(&self, rhs: &Value) -> Result<Value, ExprError> {
        self.arith(rhs, "+", i64::wrapping_add, |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Value) -> Result<Value, ExprError> {
        self.arith(rhs, "-", i64::wrapping_sub, |a, b| a - b)
    }

    pub fn mul(&self, rhs: &Value) -> Result<Value, ExprError> {
        self.arith(rhs, "×", i64::wrapping_mul, |a, b| a * b)
    }

    /// Division promotes both operands to `Float` first; the result is
    /// always `Float`.
    pub fn div(&self, rhs: &Value) -> Result<Value, ExprError> {
        let (a, b) = match (self.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(self.type_err("/", rhs)),
        };
        if b == 0.0 {
            return Err(ExprError::DivisionByZero);
        }
        Ok(Value::Float(a / b))
    }

    fn arith(
        &self,
        rhs: &Value,
        sym: &str,
        int_op: fn(i64, i64) -> i64,
        float_op: fn(f64, f64) -> f64,
    ) -> Result<Value, ExprError> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(int_op(*a, *b))),
            _ => match (self.as_f64(), rhs.as_f64()) {
                (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
                _ => Err(self.type_err(sym, rhs)),
            },
        }
    }

    pub fn lt(&self, rhs: &Value) -> Result<bool, ExprError> {
        Ok(self.ordering(rhs, "<")? == Ordering::Less)
    }

    pub fn le(&self, rhs: &Value) -> Result<bool, ExprError> {
        Ok(self.ordering(rhs, "≤")? != Ordering::Greater)
    }

    pub fn gt(&self, rhs: &Value) -> Result<bool, ExprError> {
        Ok(self.ordering(rhs, ">")? == Ordering::Greater)
    }

    pub fn ge(&self, rhs: &Value) -> Result<bool, ExprError> {
        Ok(self.ordering(rhs, "≥")? != Ordering::Less)
    }

    /// Ordering is defined for numeric pairs (after promotion, with two
    /// `Int`s compared exactly) and for string pairs (lexicographic).
    fn ordering(&self, rhs: &Value, sym: &str) -> Result<Ordering, ExprError> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            _ => match (self.as_f64(), rhs.as_f64()) {
                (Some(a), Some(b)) => a
                    .partial_cmp(&b)
                    .ok_or_else(|| ExprError::Type(format!("cannot order {} against {}", a, b))),
                _ => Err(self.type_err(sym, rhs)),
            },
        }
    }

    fn type_err(&self, sym: &str, rhs: &Value) -> ExprError {
        ExprError::Type(format!(
            "cannot apply {} to {} and {}",
            sym,
            self.type_name(),
            rhs.type_name()
        ))
    }
}

/// Numeric variants compare after promotion; identical variants compare
/// directly; everything else is unequal. Cross-variant equality is never
/// an error, which is what lets `is_not_null` be a plain `Neq` against
/// `Null`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            // Keep Float distinguishable from Int in justifications.
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Null => write!(f, "Null"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}
