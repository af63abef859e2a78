//! Shared handle to a map slot
//!
//! A [`Var`] is what the map hands out: a reference-counted cell around a
//! [`Field`]. Every clone observes the same field, so a handle taken with
//! `map.get("hits")` sees later writes made through the map and vice versa.
//!
//! When a typed accessor promotes a slot to another variant, the map installs
//! a fresh cell. Handles taken before the promotion keep the old field and no
//! longer track the slot.
//!
//! `Var` is `!Send`: the map is a single-threaded structure and
//! callers that share it across threads must wrap it themselves.

use crate::coerce::Variant;
use crate::error::VarError;
use crate::field::Field;
use crate::value::{FromValue, Value};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct Var(Rc<RefCell<Field>>);

impl Var {
    pub fn new(field: Field) -> Self {
        Var(Rc::new(RefCell::new(field)))
    }

    /// Borrow the underlying field
    ///
    /// # Panics
    /// Panics if the field is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Field> {
        self.0.borrow()
    }

    /// Mutably borrow the underlying field
    ///
    /// # Panics
    /// Panics if the field is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Field> {
        self.0.borrow_mut()
    }

    /// True when both handles point at the same field
    pub fn ptr_eq(&self, other: &Var) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn variant(&self) -> Variant {
        self.borrow().variant()
    }

    /// Stored payload, without coercion
    pub fn raw(&self) -> Value {
        self.borrow().raw().clone()
    }

    pub fn set(&self, value: impl Into<Value>) -> &Self {
        self.borrow_mut().set(value);
        self
    }

    pub fn get(&self) -> Value {
        self.borrow().get()
    }

    pub fn get_as<T: FromValue>(&self) -> Option<T> {
        self.borrow().get_as()
    }

    pub fn set_then_get(&self, value: impl Into<Value>) -> Value {
        self.borrow_mut().set_then_get(value)
    }

    pub fn set_then_get_if_equals(&self, equals: impl Into<Value>, value: impl Into<Value>) -> Value {
        self.borrow_mut().set_then_get_if_equals(equals, value)
    }

    pub fn set_then_get_if_not_equals(
        &self,
        equals: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Value {
        self.borrow_mut().set_then_get_if_not_equals(equals, value)
    }

    pub fn get_then_set(&self, value: impl Into<Value>) -> Value {
        self.borrow_mut().get_then_set(value)
    }

    pub fn get_then_set_if_equals(&self, equals: impl Into<Value>, value: impl Into<Value>) -> Value {
        self.borrow_mut().get_then_set_if_equals(equals, value)
    }

    pub fn get_then_set_if_not_equals(
        &self,
        equals: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Value {
        self.borrow_mut().get_then_set_if_not_equals(equals, value)
    }

    pub fn if_equals(&self, equals: impl Into<Value>) -> bool {
        self.borrow().if_equals(equals)
    }

    pub fn if_not_equals(&self, equals: impl Into<Value>) -> bool {
        self.borrow().if_not_equals(equals)
    }

    pub fn set_if_equals(&self, equals: impl Into<Value>, value: impl Into<Value>) -> bool {
        self.borrow_mut().set_if_equals(equals, value)
    }

    pub fn set_if_not_equals(&self, equals: impl Into<Value>, value: impl Into<Value>) -> bool {
        self.borrow_mut().set_if_not_equals(equals, value)
    }

    pub fn add(&self, value: impl Into<Value>) -> Result<&Self, VarError> {
        self.borrow_mut().add(value)?;
        Ok(self)
    }

    pub fn subtract(&self, value: impl Into<Value>) -> Result<&Self, VarError> {
        self.borrow_mut().subtract(value)?;
        Ok(self)
    }

    pub fn multiply(&self, value: impl Into<Value>) -> Result<&Self, VarError> {
        self.borrow_mut().multiply(value)?;
        Ok(self)
    }

    pub fn divide(&self, value: impl Into<Value>) -> Result<&Self, VarError> {
        self.borrow_mut().divide(value)?;
        Ok(self)
    }

    pub fn bitwise_xor(&self, value: impl Into<Value>) -> Result<&Self, VarError> {
        self.borrow_mut().bitwise_xor(value)?;
        Ok(self)
    }

    pub fn equals(&self, other: impl Into<Value>) -> bool {
        self.borrow().equals(other)
    }

    pub fn equals_any<I, V>(&self, candidates: I) -> bool
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.borrow().equals_any(candidates)
    }

    pub fn get_bool(&self) -> bool {
        self.borrow().get_bool()
    }

    pub fn get_byte(&self) -> i8 {
        self.borrow().get_byte()
    }

    pub fn get_short(&self) -> i16 {
        self.borrow().get_short()
    }

    pub fn get_int(&self) -> i32 {
        self.borrow().get_int()
    }

    pub fn get_long(&self) -> i64 {
        self.borrow().get_long()
    }

    pub fn get_float(&self) -> f32 {
        self.borrow().get_float()
    }

    pub fn get_double(&self) -> f64 {
        self.borrow().get_double()
    }

    pub fn get_string(&self) -> String {
        self.borrow().get_string()
    }

    pub fn get_then_flip(&self) -> bool {
        self.borrow_mut().get_then_flip()
    }

    pub fn flip_then_get(&self) -> bool {
        self.borrow_mut().flip_then_get()
    }

    pub fn get_time(&self) -> i64 {
        self.borrow().get_time()
    }

    pub fn set_now(&self) -> &Self {
        self.borrow_mut().set_now();
        self
    }

    pub fn set_now_offset(&self, offset_ms: i64) -> &Self {
        self.borrow_mut().set_now_offset(offset_ms);
        self
    }

    pub fn has_passed(&self, threshold_ms: i64) -> bool {
        self.borrow().has_passed(threshold_ms)
    }

    pub fn has_passed_reset(&self, threshold_ms: i64) -> bool {
        self.borrow_mut().has_passed_reset(threshold_ms)
    }

    /// [`Var::has_passed`] with the threshold read from another time field
    pub fn has_passed_var(&self, threshold: &Var) -> bool {
        let threshold_ms = threshold.get_time();
        self.has_passed(threshold_ms)
    }

    /// [`Var::has_passed_reset`] with the threshold read from another time field
    pub fn has_passed_reset_var(&self, threshold: &Var) -> bool {
        let threshold_ms = threshold.get_time();
        self.has_passed_reset(threshold_ms)
    }
}

impl From<Field> for Var {
    fn from(field: Field) -> Self {
        Var::new(field)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.borrow())
    }
}
