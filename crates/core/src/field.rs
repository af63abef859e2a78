//! A field: one dynamic value plus the variant it is pinned to
//!
//! Every mutator returns the field so calls can be chained:
//!
//! ```
//! use dynvar_core::Field;
//!
//! let mut field = Field::new();
//! field.set("Rust").add(" ")?.add("fields")?;
//! assert_eq!(field.get_string(), "Rust fields");
//! # Ok::<(), dynvar_core::VarError>(())
//! ```
//!
//! Untyped fields return their stored value unchanged from [`Field::get`].
//! Typed fields coerce on read (see [`crate::coerce`]), so a long field still
//! reads as a long after `set(5)` stored an int into it. Arithmetic on a typed
//! field starts from that coerced reading, so the long field also adds as a
//! long.

use crate::arithmetic::{self, ArithOp};
use crate::coerce::{self, Variant};
use crate::error::VarError;
use crate::time;
use crate::value::{FromValue, Value};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    value: Value,
    variant: Variant,
}

impl Field {
    /// Untyped field holding null
    pub fn new() -> Self {
        Self::default()
    }

    /// Untyped field holding `value`
    pub fn with_value(value: impl Into<Value>) -> Self {
        Field {
            value: value.into(),
            variant: Variant::Untyped,
        }
    }

    /// Field pinned to `variant`, holding `value` as given
    pub fn typed(variant: Variant, value: impl Into<Value>) -> Self {
        Field {
            value: value.into(),
            variant,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Stored payload, without coercion
    pub fn raw(&self) -> &Value {
        &self.value
    }

    pub fn into_raw(self) -> Value {
        self.value
    }

    pub fn set(&mut self, value: impl Into<Value>) -> &mut Self {
        self.value = value.into();
        self
    }

    /// Current value, coerced to the pinned variant
    ///
    /// A typed field whose payload cannot be represented in its type reads
    /// as the type's zero value.
    pub fn get(&self) -> Value {
        self.variant
            .coerce(&self.value)
            .unwrap_or_else(|| self.variant.zero())
    }

    /// Current value as `T`, if [`Field::get`] yields exactly that type
    pub fn get_as<T: FromValue>(&self) -> Option<T> {
        T::from_value(&self.get())
    }

    pub fn set_then_get(&mut self, value: impl Into<Value>) -> Value {
        self.set(value).get()
    }

    /// Set `value` when the current value equals `equals`, then read
    pub fn set_then_get_if_equals(
        &mut self,
        equals: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Value {
        self.set_if_equals(equals, value);
        self.get()
    }

    /// Set `value` unless the current value equals `equals`, then read
    pub fn set_then_get_if_not_equals(
        &mut self,
        equals: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Value {
        self.set_if_not_equals(equals, value);
        self.get()
    }

    /// Read, then set `value`; returns the value from before the write
    pub fn get_then_set(&mut self, value: impl Into<Value>) -> Value {
        let original = self.get();
        self.set(value);
        original
    }

    pub fn get_then_set_if_equals(
        &mut self,
        equals: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Value {
        let original = self.get();
        if original.equals(&equals.into()) {
            self.set(value);
        }
        original
    }

    pub fn get_then_set_if_not_equals(
        &mut self,
        equals: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Value {
        let original = self.get();
        if !original.equals(&equals.into()) {
            self.set(value);
        }
        original
    }

    /// True when the current value equals `equals` (never for null)
    ///
    /// Comparison uses [`Value::equals`], which ignores numeric width:
    /// `Value::Int(5)` matches `Value::Long(5)` even though the two are not
    /// `==`. Callers needing tag-exact comparison should compare
    /// [`Field::get`] with `==` instead.
    pub fn if_equals(&self, equals: impl Into<Value>) -> bool {
        self.get().equals(&equals.into())
    }

    /// True unless the current value equals `equals` (always for null)
    pub fn if_not_equals(&self, equals: impl Into<Value>) -> bool {
        !self.if_equals(equals)
    }

    /// Set `value` when the current value equals `equals`; reports whether it did
    pub fn set_if_equals(&mut self, equals: impl Into<Value>, value: impl Into<Value>) -> bool {
        if self.if_equals(equals) {
            self.set(value);
            return true;
        }
        false
    }

    /// Set `value` unless the current value equals `equals`; reports whether it did
    pub fn set_if_not_equals(
        &mut self,
        equals: impl Into<Value>,
        value: impl Into<Value>,
    ) -> bool {
        if self.if_not_equals(equals) {
            self.set(value);
            return true;
        }
        false
    }

    pub fn add(&mut self, value: impl Into<Value>) -> Result<&mut Self, VarError> {
        self.apply(ArithOp::Add, value.into())
    }

    pub fn subtract(&mut self, value: impl Into<Value>) -> Result<&mut Self, VarError> {
        self.apply(ArithOp::Subtract, value.into())
    }

    pub fn multiply(&mut self, value: impl Into<Value>) -> Result<&mut Self, VarError> {
        self.apply(ArithOp::Multiply, value.into())
    }

    pub fn divide(&mut self, value: impl Into<Value>) -> Result<&mut Self, VarError> {
        self.apply(ArithOp::Divide, value.into())
    }

    pub fn bitwise_xor(&mut self, value: impl Into<Value>) -> Result<&mut Self, VarError> {
        if let Some(result) = arithmetic::bitwise_xor(&self.operand(), &value.into())? {
            self.value = result;
        }
        Ok(self)
    }

    fn apply(&mut self, op: ArithOp, value: Value) -> Result<&mut Self, VarError> {
        if let Some(result) = arithmetic::apply(op, &self.operand(), &value)? {
            self.value = result;
        }
        Ok(self)
    }

    // Typed fields compute at their pinned width, whatever the payload's tag.
    fn operand(&self) -> Value {
        match self.variant {
            Variant::Untyped => self.value.clone(),
            _ => self.get(),
        }
    }

    /// Value equality against the current value
    pub fn equals(&self, other: impl Into<Value>) -> bool {
        self.if_equals(other)
    }

    /// True when the current value equals any of `candidates`
    pub fn equals_any<I, V>(&self, candidates: I) -> bool
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let current = self.get();
        candidates
            .into_iter()
            .any(|candidate| current.equals(&candidate.into()))
    }

    pub fn get_bool(&self) -> bool {
        coerce::to_bool(&self.value).unwrap_or(false)
    }

    pub fn get_byte(&self) -> i8 {
        coerce::to_i8(&self.value).unwrap_or(0)
    }

    pub fn get_short(&self) -> i16 {
        coerce::to_i16(&self.value).unwrap_or(0)
    }

    pub fn get_int(&self) -> i32 {
        coerce::to_i32(&self.value).unwrap_or(0)
    }

    pub fn get_long(&self) -> i64 {
        coerce::to_i64(&self.value).unwrap_or(0)
    }

    pub fn get_float(&self) -> f32 {
        coerce::to_f32(&self.value).unwrap_or(0.0)
    }

    pub fn get_double(&self) -> f64 {
        coerce::to_f64(&self.value).unwrap_or(0.0)
    }

    pub fn get_string(&self) -> String {
        coerce::to_string(&self.value).unwrap_or_default()
    }

    // Boolean fields

    /// Negate the stored boolean; returns the value before the flip
    pub fn get_then_flip(&mut self) -> bool {
        let current = self.get_bool();
        self.set(!current);
        current
    }

    /// Negate the stored boolean; returns the value after the flip
    pub fn flip_then_get(&mut self) -> bool {
        let flipped = !self.get_bool();
        self.set(flipped);
        flipped
    }

    // Time fields: the long reading is an epoch-millisecond stamp

    pub fn get_time(&self) -> i64 {
        self.get_long()
    }

    pub fn set_now(&mut self) -> &mut Self {
        self.set(time::now_millis())
    }

    /// Stamp the field `offset_ms` in the past
    pub fn set_now_offset(&mut self, offset_ms: i64) -> &mut Self {
        self.set(time::now_millis().wrapping_sub(offset_ms))
    }

    /// True when more than `threshold_ms` have elapsed since the stamp
    pub fn has_passed(&self, threshold_ms: i64) -> bool {
        time::has_elapsed(self.get_time(), threshold_ms)
    }

    /// Like [`Field::has_passed`], restamping the field to now when true
    pub fn has_passed_reset(&mut self, threshold_ms: i64) -> bool {
        let passed = self.has_passed(threshold_ms);
        if passed {
            self.set_now();
        }
        passed
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
