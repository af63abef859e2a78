//! Field arithmetic
//!
//! The left operand (the field's current value) selects the result type;
//! the right operand is coerced to it.
//!
//! # Operand rules
//!
//! - Integral left, integral right: computed in i64 with wrapping semantics,
//!   then narrowed to the left width (narrowing wraps).
//! - Integral left, float right: computed in f64, then truncated toward zero
//!   into the left type. `7 / 2.0` on an int field yields `3`.
//! - Float left: computed in f64 and stored back at the left width.
//! - Null left: `add` stores the right operand, the other operations do nothing.
//! - String left: `add` appends the right operand's text, the other
//!   operations do nothing.
//! - Bool or object left: every operation does nothing.
//! - Numeric left, non-numeric right: [`VarError::IncompatibleOperand`].
//!
//! Integer division by zero is [`VarError::DivisionByZero`]; float division
//! by zero follows IEEE 754.

use crate::error::VarError;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithOp {
    pub fn name(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Subtract => "subtract",
            ArithOp::Multiply => "multiply",
            ArithOp::Divide => "divide",
        }
    }
}

/// Combine `left` with `right`
///
/// Returns `Ok(None)` when the operation leaves the value unchanged.
pub fn apply(op: ArithOp, left: &Value, right: &Value) -> Result<Option<Value>, VarError> {
    match left {
        Value::Null => Ok(match op {
            ArithOp::Add => Some(right.clone()),
            _ => None,
        }),
        Value::String(s) => Ok(match op {
            ArithOp::Add => Some(Value::String(format!("{}{}", s, right))),
            _ => None,
        }),
        Value::Bool(_) | Value::Object(_) => Ok(None),
        _ => numeric(op, left, right).map(Some),
    }
}

/// Exclusive or on int and long fields
///
/// Every other left type is left unchanged.
pub fn bitwise_xor(left: &Value, right: &Value) -> Result<Option<Value>, VarError> {
    let incompatible = || VarError::IncompatibleOperand {
        op: "bitwise_xor",
        left: left.kind(),
        right: right.kind(),
    };
    match *left {
        Value::Int(l) => right
            .as_i64()
            .map(|r| Some(Value::Int(l ^ r as i32)))
            .ok_or_else(incompatible),
        Value::Long(l) => right
            .as_i64()
            .map(|r| Some(Value::Long(l ^ r)))
            .ok_or_else(incompatible),
        _ => Ok(None),
    }
}

enum Num {
    Integral(i64),
    Real(f64),
}

fn numeric(op: ArithOp, left: &Value, right: &Value) -> Result<Value, VarError> {
    let incompatible = || VarError::IncompatibleOperand {
        op: op.name(),
        left: left.kind(),
        right: right.kind(),
    };
    let r = right.as_f64().ok_or_else(incompatible)?;
    let ri = right.as_i64();

    let result = match *left {
        Value::Byte(l) => match integral(op, l as i64, ri, r)? {
            Num::Integral(v) => Value::Byte(v as i8),
            Num::Real(v) => Value::Byte(v as i8),
        },
        Value::Short(l) => match integral(op, l as i64, ri, r)? {
            Num::Integral(v) => Value::Short(v as i16),
            Num::Real(v) => Value::Short(v as i16),
        },
        Value::Int(l) => match integral(op, l as i64, ri, r)? {
            Num::Integral(v) => Value::Int(v as i32),
            Num::Real(v) => Value::Int(v as i32),
        },
        Value::Long(l) => match integral(op, l, ri, r)? {
            Num::Integral(v) => Value::Long(v),
            Num::Real(v) => Value::Long(v as i64),
        },
        Value::Float(l) => Value::Float(real(op, l as f64, r) as f32),
        Value::Double(l) => Value::Double(real(op, l, r)),
        _ => return Err(incompatible()),
    };
    Ok(result)
}

// `ri` is the right operand when it is integral, `rf` the same operand as f64.
fn integral(op: ArithOp, l: i64, ri: Option<i64>, rf: f64) -> Result<Num, VarError> {
    let Some(r) = ri else {
        return Ok(Num::Real(real(op, l as f64, rf)));
    };
    let v = match op {
        ArithOp::Add => l.wrapping_add(r),
        ArithOp::Subtract => l.wrapping_sub(r),
        ArithOp::Multiply => l.wrapping_mul(r),
        ArithOp::Divide => {
            if r == 0 {
                return Err(VarError::DivisionByZero);
            }
            l.wrapping_div(r)
        }
    };
    Ok(Num::Integral(v))
}

fn real(op: ArithOp, l: f64, r: f64) -> f64 {
    match op {
        ArithOp::Add => l + r,
        ArithOp::Subtract => l - r,
        ArithOp::Multiply => l * r,
        ArithOp::Divide => l / r,
    }
}
