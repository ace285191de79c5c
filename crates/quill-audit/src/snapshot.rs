//! Canonical snapshots of entity field values.
//!
//! A snapshot is the JSON object text of one side of a change, minus the
//! fields the entity's policy ignores. Key order follows the field map's own
//! order (declaration order), so two snapshots of identical values serialize
//! identically.

use quill_core::FieldValues;
use std::collections::HashSet;

/// Serialize one side of a change to its canonical snapshot text.
///
/// An absent value-set (no original side for a Create, no current side for a
/// Delete) yields `Ok(None)`. Ignored fields never appear in the output, for
/// any action, even when they changed.
pub fn serialize_snapshot(
    values: Option<&FieldValues>,
    ignored_fields: &HashSet<String>,
) -> Result<Option<String>, serde_json::Error> {
    let Some(values) = values else {
        return Ok(None);
    };

    let mut filtered = FieldValues::new();
    for (field, value) in values {
        if ignored_fields.contains(field) {
            continue;
        }
        filtered.insert(field.clone(), value.clone());
    }

    let text = serde_json::to_string(&serde_json::Value::Object(filtered))?;
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(pairs: &[(&str, serde_json::Value)]) -> FieldValues {
        let mut map = FieldValues::new();
        for (name, value) in pairs {
            map.insert(name.to_string(), value.clone());
        }
        map
    }

    fn ignored(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn absent_values_snapshot_to_none() {
        assert_eq!(serialize_snapshot(None, &ignored(&[])).unwrap(), None);
    }

    #[test]
    fn fields_keep_their_order() {
        let map = values(&[
            ("id", json!(1)),
            ("name", json!("Test Product")),
            ("price", json!(10.99)),
        ]);

        let snapshot = serialize_snapshot(Some(&map), &ignored(&[])).unwrap().unwrap();
        assert_eq!(
            snapshot,
            "{\"id\":1,\"name\":\"Test Product\",\"price\":10.99}"
        );
    }

    #[test]
    fn ignored_fields_are_excluded() {
        let map = values(&[
            ("id", json!(1)),
            ("name", json!("Test Product")),
            ("price", json!(10.99)),
        ]);

        let snapshot = serialize_snapshot(Some(&map), &ignored(&["price"]))
            .unwrap()
            .unwrap();
        assert!(!snapshot.contains("price"));
        assert!(!snapshot.contains("10.99"));
        assert!(snapshot.contains("Test Product"));
    }

    #[test]
    fn identical_values_serialize_identically() {
        let map = values(&[("id", json!(1)), ("name", json!("Same"))]);
        let none: HashSet<String> = HashSet::new();

        let first = serialize_snapshot(Some(&map), &none).unwrap().unwrap();
        let second = serialize_snapshot(Some(&map.clone()), &none).unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn every_field_ignored_leaves_an_empty_object() {
        let map = values(&[("secret", json!("s3cr3t"))]);
        let snapshot = serialize_snapshot(Some(&map), &ignored(&["secret"]))
            .unwrap()
            .unwrap();
        assert_eq!(snapshot, "{}");
    }
}
