//! Dynamic values held by a field
//!
//! `Value` is the closed set of runtime types a field can carry. Numeric
//! payloads keep their exact width so that arithmetic and persistence can
//! honour the type a value was produced with.
//!
//! # Equality
//!
//! Two notions of equality exist:
//!
//! - `PartialEq` is structural: tag and payload must both match, so
//!   `Value::Int(5) != Value::Long(5)`.
//! - [`Value::equals`] is the value equality used by field predicates
//!   (`if_equals`, `set_if_equals`, ...): numbers of different widths compare
//!   by the number they denote.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Caller-defined payload stored as an opaque object
///
/// Opaque values are compared by identity and rendered with `Display` when
/// persisted. They never reload as their concrete type.
pub trait Opaque: fmt::Debug + fmt::Display + Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T> Opaque for T
where
    T: fmt::Debug + fmt::Display + Any + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Payload-free tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Object,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Byte => "byte",
            ValueKind::Short => "short",
            ValueKind::Int => "int",
            ValueKind::Long => "long",
            ValueKind::Float => "float",
            ValueKind::Double => "double",
            ValueKind::String => "string",
            ValueKind::Object => "object",
        }
    }

    pub fn is_numeric(self) -> bool {
        self.is_integral() || matches!(self, ValueKind::Float | ValueKind::Double)
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            ValueKind::Byte | ValueKind::Short | ValueKind::Int | ValueKind::Long
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamic value
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Object(Arc<dyn Opaque>),
}

impl Value {
    /// Wrap a caller-defined object
    pub fn object<T: Opaque>(object: T) -> Self {
        Value::Object(Arc::new(object))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Byte(_) => ValueKind::Byte,
            Value::Short(_) => ValueKind::Short,
            Value::Int(_) => ValueKind::Int,
            Value::Long(_) => ValueKind::Long,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integral payload widened to i64 (None for non-integral values)
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Any numeric payload widened to f64 (None for non-numeric values)
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow an opaque payload as its concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Object(obj) => obj.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Value equality used by field predicates
    ///
    /// Null never equals anything, not even another null. Numbers compare by
    /// magnitude across widths, so `Int(5)` equals `Long(5)` and `Double(5.0)`;
    /// use `==` for a tag-exact check. Everything else compares structurally.
    pub fn equals(&self, other: &Value) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        if let (Some(a), Some(b)) = (self.as_i64(), other.as_i64()) {
            return a == b;
        }
        if self.kind().is_numeric() && other.kind().is_numeric() {
            return match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            };
        }
        self == other
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Textual form, identical to what the codec persists
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write_float(f, *v as f64, format_args!("{:?}", v)),
            Value::Double(v) => write_float(f, *v, format_args!("{:?}", v)),
            Value::String(s) => f.write_str(s),
            Value::Object(obj) => write!(f, "{}", obj),
        }
    }
}

// Non-finite floats use the spelled-out names the literal classifier accepts.
fn write_float(f: &mut fmt::Formatter<'_>, v: f64, finite: fmt::Arguments<'_>) -> fmt::Result {
    if v.is_nan() {
        f.write_str("NaN")
    } else if v == f64::INFINITY {
        f.write_str("Infinity")
    } else if v == f64::NEG_INFINITY {
        f.write_str("-Infinity")
    } else {
        f.write_fmt(finite)
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from!(
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Exact extraction of a payload
///
/// No coercion happens here: `i64::from_value(&Value::Int(1))` is `None`.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_value!(
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
);

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}
