//! Coercion table between stored values and pinned field variants
//!
//! A typed field may hold a value of a different runtime type than the one
//! it is pinned to: a promotion carries the old payload across, and `set`
//! stores whatever it is given. Reads go through [`Variant::coerce`], which
//! converts the stored value to the pinned type.
//!
//! # Conversion rules
//!
//! - Numeric to numeric uses `as` casts: integers wrap when narrowed, floats
//!   truncate toward zero and saturate at the target's bounds.
//! - Strings convert to numbers or booleans when they spell a literal of
//!   that type (see [`crate::literal`]).
//! - Any non-null value converts to a string through its `Display` form.
//! - Numbers convert to booleans as `value != 0`.
//!
//! Values that cannot be represented (e.g. `"abc"` read as an int) yield
//! `None`; typed getters then fall back to the variant's zero value.

use crate::literal;
use crate::value::Value;
use std::fmt;

/// Type a field is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    /// Plain box: reads return the stored value unchanged
    #[default]
    Untyped,
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    /// Long holding epoch milliseconds
    Time,
    Float,
    Double,
    String,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::Untyped => "untyped",
            Variant::Boolean => "boolean",
            Variant::Byte => "byte",
            Variant::Short => "short",
            Variant::Int => "int",
            Variant::Long => "long",
            Variant::Time => "time",
            Variant::Float => "float",
            Variant::Double => "double",
            Variant::String => "string",
        }
    }

    /// True when a field pinned to `self` serves a request for `requested`
    ///
    /// A time field is a long field with extra helpers, so it also answers
    /// long requests.
    pub fn satisfies(self, requested: Variant) -> bool {
        self == requested || (self == Variant::Time && requested == Variant::Long)
    }

    /// Zero value a typed read falls back to
    pub fn zero(self) -> Value {
        match self {
            Variant::Untyped => Value::Null,
            Variant::Boolean => Value::Bool(false),
            Variant::Byte => Value::Byte(0),
            Variant::Short => Value::Short(0),
            Variant::Int => Value::Int(0),
            Variant::Long | Variant::Time => Value::Long(0),
            Variant::Float => Value::Float(0.0),
            Variant::Double => Value::Double(0.0),
            Variant::String => Value::String(String::new()),
        }
    }

    /// Variant a value is stored under when put by runtime type
    ///
    /// Byte and short values are routed to the long variant; null and opaque
    /// objects stay untyped.
    pub fn for_value(value: &Value) -> Variant {
        match value {
            Value::Bool(_) => Variant::Boolean,
            Value::Byte(_) | Value::Short(_) | Value::Long(_) => Variant::Long,
            Value::Int(_) => Variant::Int,
            Value::Float(_) => Variant::Float,
            Value::Double(_) => Variant::Double,
            Value::String(_) => Variant::String,
            Value::Null | Value::Object(_) => Variant::Untyped,
        }
    }

    /// Convert a stored value to this variant's type
    ///
    /// Untyped fields return the value as-is. Null stays null.
    pub fn coerce(self, value: &Value) -> Option<Value> {
        if value.is_null() {
            return Some(Value::Null);
        }
        match self {
            Variant::Untyped => Some(value.clone()),
            Variant::Boolean => to_bool(value).map(Value::Bool),
            Variant::Byte => to_i8(value).map(Value::Byte),
            Variant::Short => to_i16(value).map(Value::Short),
            Variant::Int => to_i32(value).map(Value::Int),
            Variant::Long | Variant::Time => to_i64(value).map(Value::Long),
            Variant::Float => to_f32(value).map(Value::Float),
            Variant::Double => to_f64(value).map(Value::Double),
            Variant::String => to_string(value).map(Value::String),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => literal::parse_boolean(s),
        Value::Null | Value::Object(_) => None,
        _ => value.as_f64().map(|v| v != 0.0),
    }
}

macro_rules! integral_coercion {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            pub fn $name(value: &Value) -> Option<$ty> {
                match value {
                    Value::Float(v) => Some(*v as $ty),
                    Value::Double(v) => Some(*v as $ty),
                    Value::String(s) => parse_integral(s).map(|v| v as $ty),
                    _ => value.as_i64().map(|v| v as $ty),
                }
            }
        )*
    };
}

integral_coercion!(
    to_i8 => i8,
    to_i16 => i16,
    to_i32 => i32,
    to_i64 => i64,
);

pub fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => literal::parse_double(s),
        _ => value.as_f64(),
    }
}

pub fn to_f32(value: &Value) -> Option<f32> {
    match value {
        Value::Float(v) => Some(*v),
        Value::String(s) => literal::parse_float(s),
        _ => value.as_f64().map(|v| v as f32),
    }
}

pub fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// "42" and "42.9" both read as 42 when an integer is wanted.
fn parse_integral(text: &str) -> Option<i64> {
    literal::parse_long(text)
        .or_else(|| literal::parse_double(text).map(|v| v as i64))
}
