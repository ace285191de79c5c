//! Identity resolution from declared key fields.
//!
//! Composite keys are comma-joined raw values in declared field order. The
//! joined form is ambiguous when a key value itself contains a comma; that is
//! a documented limitation of the record format, kept as-is.

use quill_core::{FieldValues, TrackedChange};

/// Resolve the identity string for a tracked change.
///
/// Each key field is read from the current values when present, falling back
/// to the original values (deletes usually carry no current side). Zero
/// declared fields resolve to `None`; a single field resolves to its
/// null-safe string form; several fields are comma-joined with null
/// components rendered empty.
pub fn resolve_entity_id(change: &TrackedChange, key_fields: &[String]) -> Option<String> {
    join_components(key_fields, |field| {
        change
            .current
            .as_ref()
            .and_then(|values| values.get(field))
            .or_else(|| change.original.as_ref().and_then(|values| values.get(field)))
            .and_then(render_key_value)
    })
}

/// Resolve an identity string from a single field map.
///
/// Same rendering and joining rules as [`resolve_entity_id`], for callers
/// that hold only one side of a change (e.g., a store addressing rows).
pub fn resolve_key(values: &FieldValues, key_fields: &[String]) -> Option<String> {
    join_components(key_fields, |field| {
        values.get(field).and_then(render_key_value)
    })
}

fn join_components<'a>(
    key_fields: &'a [String],
    component: impl Fn(&'a str) -> Option<String>,
) -> Option<String> {
    match key_fields {
        [] => None,
        [field] => component(field),
        fields => {
            let joined: Vec<String> = fields
                .iter()
                .map(|field| component(field).unwrap_or_default())
                .collect();
            Some(joined.join(","))
        }
    }
}

fn render_key_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
