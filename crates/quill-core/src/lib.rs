//! # quill-core
//!
//! Record schema and configuration types shared across the Quill crates.
//!
//! This crate defines:
//! - [`AuditEntry`] / [`AuditAction`]: the persisted audit record schema
//! - [`TrackedChange`] / [`EntityState`]: the pre-commit view of a tracked
//!   entity as supplied by a unit-of-work change tracker
//! - [`FieldValues`] / [`to_field_values`]: ordered field maps produced from
//!   any `Serialize` entity
//! - [`config`]: per-entity audit policies, loadable from YAML
//!
//! ## Record Invariants
//!
//! | Action | `old_value` | `new_value` |
//! |--------|-------------|-------------|
//! | Create | `None`      | `Some`      |
//! | Update | `Some`      | `Some`      |
//! | Delete | `Some`      | `None`      |
//!
//! Entries are constructed once per detected change inside a commit batch and
//! are immutable afterwards; retention is an external concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Configuration types shared across all Quill crates
pub mod config;

pub use config::{AuditConfig, ConfigError, EntityPolicy};

/// The category of change recorded by an audit entry.
///
/// Serialized as `"Create"` / `"Update"` / `"Delete"`, which is also the
/// on-record form in [`AuditEntry::action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// Entity was inserted.
    Create,
    /// Entity was modified.
    Update,
    /// Entity was removed.
    Delete,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "Create"),
            Self::Update => write!(f, "Update"),
            Self::Delete => write!(f, "Delete"),
        }
    }
}

/// A persisted audit record describing one entity change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Record identifier, assigned by the audit store at commit time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Name of the entity type that changed.
    pub entity_name: String,

    /// Canonical snapshot of the entity before the change
    /// (`None` for Create).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,

    /// Canonical snapshot of the entity after the change
    /// (`None` for Delete).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,

    /// The action performed on the entity.
    pub action: AuditAction,

    /// When the entry was built.
    pub created_at: DateTime<Utc>,

    /// Identity of the changed entity; `None` when the type declares no key
    /// fields, comma-joined when it declares several.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

/// Lifecycle state of a tracked entity, as reported by the change tracker.
///
/// Only `Added`, `Modified`, and `Deleted` map to an audit action; the other
/// states are skipped by the eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityState {
    Added,
    Modified,
    Deleted,
    Unchanged,
    Detached,
}

/// Ordered field name → value map for one entity state.
///
/// Key order follows the declaration order of the entity's fields
/// (`serde_json` is built with `preserve_order`).
pub type FieldValues = serde_json::Map<String, serde_json::Value>;

/// The pre-commit view of one tracked entity.
///
/// Owned by the change tracker and read-only to the audit core. `current` is
/// absent for deleted entities, `original` for newly added ones.
#[derive(Debug, Clone)]
pub struct TrackedChange {
    /// Name of the tracked entity type.
    pub entity_name: String,

    /// Lifecycle state at the time the commit was requested.
    pub state: EntityState,

    /// Field values as they will be persisted.
    pub current: Option<FieldValues>,

    /// Field values as they were last loaded or committed.
    pub original: Option<FieldValues>,
}

impl TrackedChange {
    /// A newly added entity: current values only.
    pub fn added(entity_name: impl Into<String>, current: FieldValues) -> Self {
        Self {
            entity_name: entity_name.into(),
            state: EntityState::Added,
            current: Some(current),
            original: None,
        }
    }

    /// A modified entity: original and current values.
    pub fn modified(
        entity_name: impl Into<String>,
        original: FieldValues,
        current: FieldValues,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            state: EntityState::Modified,
            current: Some(current),
            original: Some(original),
        }
    }

    /// A deleted entity: original values only.
    pub fn deleted(entity_name: impl Into<String>, original: FieldValues) -> Self {
        Self {
            entity_name: entity_name.into(),
            state: EntityState::Deleted,
            current: None,
            original: Some(original),
        }
    }
}

/// Implemented by domain types that enter a tracked session.
///
/// `NAME` is the stable type identifier used for policy lookup and for the
/// `entity_name` of produced records. Opting a type into auditing happens in
/// the registry, not here.
pub trait Entity: Serialize {
    const NAME: &'static str;
}

/// Convert an entity into its ordered field map.
///
/// Fails when the entity does not serialize to a JSON object (taxonomy-wise
/// this is a caller error surfaced through the commit path, never swallowed).
pub fn to_field_values<T: Serialize>(entity: &T) -> Result<FieldValues, serde_json::Error> {
    use serde::ser::Error;

    match serde_json::to_value(entity)? {
        serde_json::Value::Object(fields) => Ok(fields),
        other => Err(serde_json::Error::custom(format!(
            "entity must serialize to an object, got {}",
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
