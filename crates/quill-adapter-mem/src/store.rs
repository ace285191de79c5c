//! The in-memory store: committed rows plus the persisted audit log.

use quill_core::{AuditEntry, FieldValues};
use std::collections::HashMap;

/// Committed state shared by the rows and the audit log of one store.
///
/// Rows are keyed by `(entity name, entity id)`. Audit entries receive their
/// record `id` here, at commit time, from a monotonic sequence.
#[derive(Debug)]
pub struct MemStore {
    rows: HashMap<(String, String), FieldValues>,
    audit_log: Vec<AuditEntry>,
    next_audit_id: u64,
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStore {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
            audit_log: Vec::new(),
            next_audit_id: 1,
        }
    }

    /// The persisted audit log, in commit order.
    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit_log
    }

    /// A committed row, if present.
    pub fn row(&self, entity_name: &str, key: &str) -> Option<&FieldValues> {
        self.rows
            .get(&(entity_name.to_string(), key.to_string()))
    }

    /// Number of committed rows across all entity types.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn row_keys(&self) -> std::collections::HashSet<(String, String)> {
        self.rows.keys().cloned().collect()
    }

    pub(crate) fn put_row(&mut self, entity_name: String, key: String, values: FieldValues) {
        self.rows.insert((entity_name, key), values);
    }

    pub(crate) fn remove_row(&mut self, entity_name: &str, key: &str) {
        self.rows
            .remove(&(entity_name.to_string(), key.to_string()));
    }

    /// Persist audit entries, assigning each its record id.
    pub(crate) fn append_audit(&mut self, entries: Vec<AuditEntry>) -> u64 {
        let appended = entries.len() as u64;
        for mut entry in entries {
            entry.id = Some(self.next_audit_id);
            self.next_audit_id += 1;
            self.audit_log.push(entry);
        }
        appended
    }
}
