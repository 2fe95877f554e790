//! Nested key lookup over decoded JSON.

use serde_json::Value;

/// Find the first value stored under `key` in a tree of JSON objects.
///
/// The current object's own keys are checked before any child is visited, so
/// a top-level match always wins. Otherwise every object value, and every
/// object element of every array value, is searched depth-first in document
/// order. A `null` is treated as absent: at the current level it ends the
/// search, below it the search moves on to the next child.
pub fn find_field<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    let map = data.as_object()?;

    if let Some(value) = map.get(key) {
        return (!value.is_null()).then_some(value);
    }

    for value in map.values() {
        let found = match value {
            Value::Object(_) => find_field(value, key),
            Value::Array(items) => items
                .iter()
                .filter(|item| item.is_object())
                .find_map(|item| find_field(item, key)),
            _ => None,
        };
        if found.is_some() {
            return found;
        }
    }

    None
}
