//! Audit entry builder.
//!
//! Turns the pre-commit set of tracked changes into the ordered sequence of
//! audit entries for one commit batch.

use crate::eligibility::eligible_action;
use crate::error::AuditError;
use crate::key::resolve_entity_id;
use crate::registry::AuditRegistry;
use crate::snapshot::serialize_snapshot;
use chrono::Utc;
use quill_core::{AuditAction, AuditConfig, AuditEntry, TrackedChange};
use std::sync::Arc;

/// Builds audit entries for commit batches.
///
/// Owns a shared handle to the resolved registry; metadata lookups that find
/// nothing (no policy, no key fields, no ignore list) degrade gracefully so
/// auditing stays best-effort and never blocks the primary write path.
#[derive(Debug, Clone)]
pub struct Auditor {
    enabled: bool,
    registry: Arc<AuditRegistry>,
}

impl Auditor {
    /// Create an auditor over a resolved registry.
    pub fn new(registry: Arc<AuditRegistry>) -> Self {
        Self {
            enabled: true,
            registry,
        }
    }

    /// Create an auditor from configuration, resolving the registry once.
    pub fn from_config(config: &AuditConfig) -> Self {
        Self {
            enabled: config.enabled,
            registry: Arc::new(AuditRegistry::from_config(config)),
        }
    }

    /// Create a disabled (no-op) auditor.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            registry: Arc::new(AuditRegistry::default()),
        }
    }

    /// Whether the auditor produces entries at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The resolved registry this auditor consults.
    pub fn registry(&self) -> &AuditRegistry {
        &self.registry
    }

    /// Build one audit entry per eligible change, in the order the changes
    /// were supplied.
    ///
    /// `created_at` is stamped once per invocation, so every entry of one
    /// batch carries the same timestamp. Ineligible changes produce nothing;
    /// a snapshot that fails to serialize is an error surfaced to the caller
    /// of the commit.
    pub fn build_entries(
        &self,
        changes: &[TrackedChange],
    ) -> Result<Vec<AuditEntry>, AuditError> {
        if !self.enabled {
            return Ok(Vec::new());
        }

        let created_at = Utc::now();
        let mut entries = Vec::new();

        for change in changes {
            let Some(descriptor) = self.registry.descriptor(&change.entity_name) else {
                continue;
            };
            let Some(action) = eligible_action(descriptor, change.state) else {
                continue;
            };

            let snapshot = |values: Option<&quill_core::FieldValues>| {
                serialize_snapshot(values, descriptor.ignored_fields()).map_err(|source| {
                    AuditError::Snapshot {
                        entity: change.entity_name.clone(),
                        source,
                    }
                })
            };

            let old_value = match action {
                AuditAction::Update | AuditAction::Delete => snapshot(change.original.as_ref())?,
                AuditAction::Create => None,
            };
            let new_value = match action {
                AuditAction::Create | AuditAction::Update => snapshot(change.current.as_ref())?,
                AuditAction::Delete => None,
            };

            entries.push(AuditEntry {
                id: None,
                entity_name: change.entity_name.clone(),
                old_value,
                new_value,
                action,
                created_at,
                entity_id: resolve_entity_id(change, descriptor.key_fields()),
            });
        }

        Ok(entries)
    }
}
