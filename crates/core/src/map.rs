//! Insertion-ordered map of named fields
//!
//! # Auto-vivification
//!
//! Every accessor except [`VarMap::remove`] and [`VarMap::get_value`]
//! creates the slot when it is missing, so lookups never fail:
//!
//! ```
//! use dynvar_core::VarMap;
//!
//! let mut vars = VarMap::new();
//! vars.get_var_int("hits").add(1)?;
//! assert_eq!(vars.get_int("hits"), 1);
//! # Ok::<(), dynvar_core::VarError>(())
//! ```
//!
//! # Promotion
//!
//! A slot moves through these states:
//!
//! ```text
//! absent -> untyped field -> typed field (variant V) -> typed field (variant V')
//! ```
//!
//! Typed accessors (`get_var_long`, `get_double`, ...) replace a slot whose
//! variant differs with a new field of the requested variant that carries the
//! old payload across. The new field's coercing read then reports the
//! payload in the requested type. A time field counts as a long field: long
//! accessors and `put` of a long value reuse it. A carried-over null is replaced by the
//! accessor's default. Only `remove` returns a slot to absent.

use crate::coerce::Variant;
use crate::field::Field;
use crate::time;
use crate::value::Value;
use crate::var::Var;
use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct VarMap {
    fields: IndexMap<String, Var>,
}

macro_rules! typed_accessors {
    ($(
        $variant:ident: $ty:ty = $default:expr =>
            $get_var:ident, $get_var_or:ident, $get:ident, $get_or:ident, $read:ident;
    )*) => {
        $(
            pub fn $get_var(&mut self, key: &str) -> Var {
                self.$get_var_or(key, $default)
            }

            pub fn $get_var_or(&mut self, key: &str, default: $ty) -> Var {
                self.get_var(key, Variant::$variant, default)
            }

            pub fn $get(&mut self, key: &str) -> $ty {
                self.$get_var(key).$read()
            }

            pub fn $get_or(&mut self, key: &str, default: $ty) -> $ty {
                self.$get_var_or(key, default).$read()
            }
        )*
    };
}

impl VarMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field for `key`, creating an untyped null field when absent
    pub fn get(&mut self, key: &str) -> Var {
        self.get_or(key, Value::Null)
    }

    /// Field for `key`, creating an untyped field seeded with `default` when absent
    ///
    /// An existing field is returned as-is, whatever its variant.
    pub fn get_or(&mut self, key: &str, default: impl Into<Value>) -> Var {
        if let Some(var) = self.fields.get(key) {
            return var.clone();
        }
        let var = Var::new(Field::with_value(default));
        self.fields.insert(key.to_string(), var.clone());
        var
    }

    /// Current value for `key` without creating the slot
    pub fn get_value(&self, key: &str) -> Option<Value> {
        self.fields.get(key).map(Var::get)
    }

    /// Field for `key` pinned to `variant`, promoting the slot when needed
    ///
    /// Requesting [`Variant::Untyped`] behaves like [`VarMap::get_or`].
    pub fn get_var(&mut self, key: &str, variant: Variant, default: impl Into<Value>) -> Var {
        if variant == Variant::Untyped {
            return self.get_or(key, default);
        }
        let carried = match self.fields.get(key) {
            Some(var) if var.variant().satisfies(variant) => return var.clone(),
            Some(var) => var.raw(),
            None => Value::Null,
        };
        let value = if carried.is_null() {
            default.into()
        } else {
            carried
        };
        let var = Var::new(Field::typed(variant, value));
        self.fields.insert(key.to_string(), var.clone());
        var
    }

    typed_accessors! {
        Boolean: bool = false => get_var_bool, get_var_bool_or, get_bool, get_bool_or, get_bool;
        Byte: i8 = 0 => get_var_byte, get_var_byte_or, get_byte, get_byte_or, get_byte;
        Short: i16 = 0 => get_var_short, get_var_short_or, get_short, get_short_or, get_short;
        Int: i32 = 0 => get_var_int, get_var_int_or, get_int, get_int_or, get_int;
        Long: i64 = 0 => get_var_long, get_var_long_or, get_long, get_long_or, get_long;
        Float: f32 = 0.0 => get_var_float, get_var_float_or, get_float, get_float_or, get_float;
        Double: f64 = 0.0 => get_var_double, get_var_double_or, get_double, get_double_or, get_double;
    }

    /// Time field for `key`; a new slot is stamped with the current time
    pub fn get_var_time(&mut self, key: &str) -> Var {
        self.get_var_time_or(key, time::now_millis())
    }

    pub fn get_var_time_or(&mut self, key: &str, default: i64) -> Var {
        self.get_var(key, Variant::Time, default)
    }

    pub fn get_time(&mut self, key: &str) -> i64 {
        self.get_var_time(key).get_time()
    }

    pub fn get_time_or(&mut self, key: &str, default: i64) -> i64 {
        self.get_var_time_or(key, default).get_time()
    }

    pub fn get_var_string(&mut self, key: &str) -> Var {
        self.get_var_string_or(key, "")
    }

    pub fn get_var_string_or(&mut self, key: &str, default: &str) -> Var {
        self.get_var(key, Variant::String, default)
    }

    pub fn get_string(&mut self, key: &str) -> String {
        self.get_var_string(key).get_string()
    }

    pub fn get_string_or(&mut self, key: &str, default: &str) -> String {
        self.get_var_string_or(key, default).get_string()
    }

    /// Store `value` under the variant its runtime type maps to
    ///
    /// bool, int, long, float, double and string values go to their own
    /// variants; byte and short values go to the long variant; null and
    /// opaque objects are stored in an untyped field.
    pub fn put(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        let variant = Variant::for_value(&value);
        self.get_var(key, variant, variant.zero()).set(value);
        self
    }

    /// Same as [`VarMap::put`]
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.put(key, value)
    }

    /// Negate the boolean under `key`; returns the new value
    pub fn flip_boolean(&mut self, key: &str) -> bool {
        self.flip_boolean_or(key, false)
    }

    pub fn flip_boolean_or(&mut self, key: &str, default: bool) -> bool {
        self.get_var_bool_or(key, default).flip_then_get()
    }

    /// Remove and return the field for `key`
    pub fn remove(&mut self, key: &str) -> Option<Var> {
        self.fields.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Same as [`VarMap::len`]
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Same as [`VarMap::len`]
    pub fn length(&self) -> usize {
        self.len()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Var)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Visit every key and its field in insertion order
    pub fn for_each<F>(&self, mut visit: F) -> &Self
    where
        F: FnMut(&str, &Var),
    {
        for (key, var) in &self.fields {
            visit(key, var);
        }
        self
    }

    pub(crate) fn get_direct(&self, key: &str) -> Option<&Var> {
        self.fields.get(key)
    }

    pub(crate) fn put_direct(&mut self, key: String, var: Var) -> Option<Var> {
        self.fields.insert(key, var)
    }

    pub(crate) fn fields(&self) -> &IndexMap<String, Var> {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut IndexMap<String, Var> {
        &mut self.fields
    }
}

/// Maps are equal when they hold the same keys in the same order, with fields
/// of the same variant holding structurally equal payloads.
impl PartialEq for VarMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .fields
                .iter()
                .zip(other.fields.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && *va.borrow() == *vb.borrow())
    }
}

impl<'a> IntoIterator for &'a VarMap {
    type Item = (&'a String, &'a Var);
    type IntoIter = indexmap::map::Iter<'a, String, Var>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_vivification() {
        let mut vars = VarMap::new();
        let var = vars.get("missing");
        assert!(var.get().is_null());
        assert!(vars.contains_key("missing"));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn test_get_or_seeds_only_new_slots() {
        let mut vars = VarMap::new();
        assert_eq!(vars.get_or("k", 1).get(), Value::Int(1));
        assert_eq!(vars.get_or("k", 2).get(), Value::Int(1));
    }

    #[test]
    fn test_handles_observe_live_updates() {
        let mut vars = VarMap::new();
        let handle = vars.get("k");
        vars.get("k").set("live");
        assert_eq!(handle.get_string(), "live");
    }

    #[test]
    fn test_promotion_preserves_value() {
        let mut vars = VarMap::new();
        vars.put("k", 5);
        assert_eq!(vars.get_var_long("k").get(), Value::Long(5));
        assert_eq!(vars.get_var_long("k").variant(), Variant::Long);
    }

    #[test]
    fn test_repromotion_between_variants() {
        let mut vars = VarMap::new();
        vars.get_var_double("k").set(2.75);
        assert_eq!(vars.get_int("k"), 2);
        assert_eq!(vars.get_var("k", Variant::Int, 0).variant(), Variant::Int);
        assert_eq!(vars.get_double("k"), 2.75);
        assert_eq!(vars.get_string("k"), "2.75");
    }

    #[test]
    fn test_matching_variant_keeps_the_same_field() {
        let mut vars = VarMap::new();
        let a = vars.get_var_int("k");
        let b = vars.get_var_int("k");
        assert!(a.ptr_eq(&b));

        let c = vars.get_var_long("k");
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn test_long_access_keeps_time_field() {
        let mut vars = VarMap::new();
        let stamp = vars.get_var_time_or("t", 1_000);

        let long = vars.get_var_long("t");
        assert!(long.ptr_eq(&stamp));
        assert_eq!(vars.get_long("t"), 1_000);

        vars.put("t", 42i64);
        assert_eq!(vars.get("t").variant(), Variant::Time);
        assert_eq!(stamp.get_time(), 42);

        vars.put("t", 7);
        assert_eq!(vars.get("t").variant(), Variant::Int);
        assert!(!vars.get("t").ptr_eq(&stamp));
    }

    #[test]
    fn test_untyped_accessor_does_not_demote() {
        let mut vars = VarMap::new();
        vars.get_var_int("k");
        assert_eq!(vars.get("k").variant(), Variant::Int);
    }

    #[test]
    fn test_defaults() {
        let mut vars = VarMap::new();
        assert_eq!(vars.get_int_or("a", 10), 10);
        assert_eq!(vars.get_var_int_or("a", 20).add(1).unwrap().get_int(), 11);
        assert_eq!(vars.get_string_or("s", "value"), "value");
        assert!(!vars.get_bool("b"));
        assert_eq!(vars.get_float("f"), 0.0);
    }

    #[test]
    fn test_null_carry_takes_default() {
        let mut vars = VarMap::new();
        vars.get("k");
        assert_eq!(vars.get_int_or("k", 7), 7);
    }

    #[test]
    fn test_put_infers_variant() {
        let mut vars = VarMap::new();
        vars.put("b", true)
            .put("i", 1)
            .put("l", 1i64)
            .put("f", 1.0f32)
            .put("d", 1.0)
            .put("s", "x")
            .put("by", 1i8)
            .put("sh", 1i16)
            .put("n", Value::Null);

        let variant = |vars: &mut VarMap, key: &str| vars.get(key).variant();
        assert_eq!(variant(&mut vars, "b"), Variant::Boolean);
        assert_eq!(variant(&mut vars, "i"), Variant::Int);
        assert_eq!(variant(&mut vars, "l"), Variant::Long);
        assert_eq!(variant(&mut vars, "f"), Variant::Float);
        assert_eq!(variant(&mut vars, "d"), Variant::Double);
        assert_eq!(variant(&mut vars, "s"), Variant::String);
        assert_eq!(variant(&mut vars, "by"), Variant::Long);
        assert_eq!(variant(&mut vars, "sh"), Variant::Long);
        assert_eq!(variant(&mut vars, "n"), Variant::Untyped);
    }

    #[test]
    fn test_remove_does_not_vivify() {
        let mut vars = VarMap::new();
        assert!(vars.remove("k").is_none());
        assert!(vars.is_empty());

        vars.put("k", 1);
        let removed = vars.remove("k").unwrap();
        assert_eq!(removed.get(), Value::Int(1));
        assert!(!vars.contains_key("k"));
        assert_eq!(vars.get_value("k"), None);
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let mut vars = VarMap::new();
        vars.put("c", 1).put("a", 2).put("b", 3);
        vars.get_var_long("a");
        vars.remove("c");
        vars.put("c", 4);
        assert_eq!(vars.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(vars.size(), 3);
        assert_eq!(vars.length(), 3);
    }

    #[test]
    fn test_flip_boolean() {
        let mut vars = VarMap::new();
        assert!(vars.flip_boolean("on"));
        assert!(!vars.flip_boolean("on"));
        assert!(!vars.flip_boolean_or("other", true));
    }

    #[test]
    fn test_time_accessor() {
        let mut vars = VarMap::new();
        let before = time::now_millis();
        let stamp = vars.get_time("t");
        assert!(stamp >= before);
        assert_eq!(vars.get_time_or("t", 0), stamp);
        assert_eq!(vars.get_var_time_or("u", 5).get(), Value::Long(5));
    }

    #[test]
    fn test_for_each_and_clear() {
        let mut vars = VarMap::new();
        vars.put("a", 1).put("b", 2);
        let mut seen = Vec::new();
        vars.for_each(|key, var| seen.push(format!("{}={}", key, var)));
        assert_eq!(seen, vec!["a=1", "b=2"]);

        vars.clear();
        assert!(vars.is_empty());
    }

    #[test]
    fn test_map_equality() {
        let mut a = VarMap::new();
        let mut b = VarMap::new();
        a.put("x", 1).put("y", "s");
        b.put("x", 1).put("y", "s");
        assert_eq!(a, b);

        b.put("x", 1i64);
        assert_ne!(a, b);
    }
}
