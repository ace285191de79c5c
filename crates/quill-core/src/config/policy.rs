//! Per-entity audit policy.

use crate::AuditAction;
use serde::{Deserialize, Serialize};

/// Audit policy for one entity type.
///
/// Listing a type under `entities` opts it into auditing unless `auditable`
/// is set to `false`; an absent policy means the type is never audited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPolicy {
    /// Whether changes to this type produce audit entries.
    #[serde(default = "default_auditable")]
    pub auditable: bool,

    /// Restrict auditing to exactly one action kind. Changes resolving to a
    /// different action are silently skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_action: Option<AuditAction>,

    /// Fields excluded from snapshots. The fields themselves are still
    /// persisted normally.
    #[serde(default)]
    pub ignored_fields: Vec<String>,

    /// Key fields, in declared order, used to resolve `entity_id`.
    #[serde(default)]
    pub key_fields: Vec<String>,
}

impl Default for EntityPolicy {
    fn default() -> Self {
        Self {
            auditable: default_auditable(),
            only_action: None,
            ignored_fields: Vec::new(),
            key_fields: Vec::new(),
        }
    }
}

impl EntityPolicy {
    /// An auditable policy with no key fields, no ignored fields, and no
    /// action restriction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key field (declared order is join order for composite keys).
    pub fn key_field(mut self, field: impl Into<String>) -> Self {
        self.key_fields.push(field.into());
        self
    }

    /// Exclude a field from snapshots.
    pub fn ignore_field(mut self, field: impl Into<String>) -> Self {
        self.ignored_fields.push(field.into());
        self
    }

    /// Restrict auditing to a single action kind.
    pub fn only(mut self, action: AuditAction) -> Self {
        self.only_action = Some(action);
        self
    }

    /// Keep the type registered (e.g., for key resolution) but produce no
    /// audit entries for it.
    pub fn not_auditable(mut self) -> Self {
        self.auditable = false;
        self
    }
}

fn default_auditable() -> bool {
    true
}
