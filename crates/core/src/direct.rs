//! Direct slot access
//!
//! Bypasses auto-vivification and type inference. Meant for tooling that
//! needs to inspect or install fields exactly as they are (migrations,
//! debuggers, bulk importers). Regular callers should use [`VarMap`].

use crate::map::VarMap;
use crate::var::Var;
use indexmap::IndexMap;

/// Field stored under `key`, without creating it
pub fn get_direct(map: &VarMap, key: &str) -> Option<Var> {
    map.get_direct(key).cloned()
}

/// Install `var` under `key` as-is, returning the field it replaced
///
/// A new key is appended; an existing key keeps its position.
pub fn put_direct(map: &mut VarMap, key: impl Into<String>, var: Var) -> Option<Var> {
    map.put_direct(key.into(), var)
}

/// The underlying ordered slot table
pub fn fields(map: &VarMap) -> &IndexMap<String, Var> {
    map.fields()
}

pub fn fields_mut(map: &mut VarMap) -> &mut IndexMap<String, Var> {
    map.fields_mut()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::Variant;
    use crate::field::Field;
    use crate::value::Value;

    #[test]
    fn test_get_direct_does_not_vivify() {
        let map = VarMap::new();
        assert!(get_direct(&map, "k").is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_put_direct_skips_inference() {
        let mut map = VarMap::new();
        let var = Var::new(Field::typed(Variant::Short, 3i16));
        assert!(put_direct(&mut map, "k", var.clone()).is_none());

        let stored = get_direct(&map, "k").unwrap();
        assert!(stored.ptr_eq(&var));
        assert_eq!(stored.get(), Value::Short(3));

        let replaced = put_direct(&mut map, "k", Var::default()).unwrap();
        assert!(replaced.ptr_eq(&var));
    }

    #[test]
    fn test_fields_table() {
        let mut map = VarMap::new();
        map.put("a", 1);
        assert_eq!(fields(&map).len(), 1);
        fields_mut(&mut map).shift_remove("a");
        assert!(map.is_empty());
    }
}
