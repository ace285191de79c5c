//! The in-memory unit of work: a change tracker over a [`MemStore`].
//!
//! Tracking calls (`insert`/`update`/`remove`) record changes in call order;
//! original values are snapshotted from the committed rows at tracking time,
//! so the pre-commit view the audit hook reads is stable. Commit validates
//! the whole batch before touching the store: either every row and every
//! staged audit entry lands, or none do.

use crate::error::MemStoreError;
use crate::store::MemStore;
use async_trait::async_trait;
use quill_audit::{AuditRegistry, UnitOfWork, resolve_entity_id, resolve_key};
use quill_core::{AuditEntry, Entity, EntityState, FieldValues, TrackedChange, to_field_values};
use std::sync::Arc;

/// One unit of work over an in-memory store.
///
/// Rows are addressed through the same registry the auditor consults, so an
/// entity must declare key fields to be storable here; the audit core itself
/// never requires one.
pub struct MemSession {
    registry: Arc<AuditRegistry>,
    store: MemStore,
    tracked: Vec<TrackedChange>,
    staged_audit: Vec<AuditEntry>,
}

impl MemSession {
    /// A session over a fresh, empty store.
    pub fn new(registry: Arc<AuditRegistry>) -> Self {
        Self {
            registry,
            store: MemStore::new(),
            tracked: Vec::new(),
            staged_audit: Vec::new(),
        }
    }

    /// The committed store behind this session.
    pub fn store(&self) -> &MemStore {
        &self.store
    }

    /// The persisted audit log, in commit order.
    pub fn audit_log(&self) -> &[AuditEntry] {
        self.store.audit_log()
    }

    /// Track an entity for insertion.
    pub fn insert<T: Entity>(&mut self, entity: &T) -> Result<(), MemStoreError> {
        let current = to_field_values(entity)?;
        self.tracked.push(TrackedChange::added(T::NAME, current));
        Ok(())
    }

    /// Track an entity for update against its committed row.
    pub fn update<T: Entity>(&mut self, entity: &T) -> Result<(), MemStoreError> {
        let current = to_field_values(entity)?;
        let key = self.row_key(T::NAME, &current)?;
        let original = self
            .store
            .row(T::NAME, &key)
            .cloned()
            .ok_or_else(|| MemStoreError::RowNotFound {
                entity: T::NAME.to_string(),
                key,
            })?;
        self.tracked
            .push(TrackedChange::modified(T::NAME, original, current));
        Ok(())
    }

    /// Track an entity for removal of its committed row.
    pub fn remove<T: Entity>(&mut self, entity: &T) -> Result<(), MemStoreError> {
        let values = to_field_values(entity)?;
        let key = self.row_key(T::NAME, &values)?;
        let original = self
            .store
            .row(T::NAME, &key)
            .cloned()
            .ok_or_else(|| MemStoreError::RowNotFound {
                entity: T::NAME.to_string(),
                key,
            })?;
        self.tracked
            .push(TrackedChange::deleted(T::NAME, original));
        Ok(())
    }

    fn key_fields(&self, entity_name: &str) -> Result<&[String], MemStoreError> {
        let key_fields = self
            .registry
            .descriptor(entity_name)
            .map(|descriptor| descriptor.key_fields())
            .unwrap_or(&[]);
        if key_fields.is_empty() {
            return Err(MemStoreError::MissingKey {
                entity: entity_name.to_string(),
            });
        }
        Ok(key_fields)
    }

    fn row_key(&self, entity_name: &str, values: &FieldValues) -> Result<String, MemStoreError> {
        let key_fields = self.key_fields(entity_name)?;
        resolve_key(values, key_fields).ok_or_else(|| MemStoreError::UnresolvedKey {
            entity: entity_name.to_string(),
        })
    }

    fn change_key(&self, change: &TrackedChange) -> Result<String, MemStoreError> {
        let key_fields = self.key_fields(&change.entity_name)?;
        resolve_entity_id(change, key_fields).ok_or_else(|| MemStoreError::UnresolvedKey {
            entity: change.entity_name.clone(),
        })
    }

    /// Validate the tracked batch against the committed rows, then apply it
    /// together with the staged audit entries.
    fn apply_tracked(&mut self, staged: Vec<AuditEntry>) -> Result<u64, MemStoreError> {
        let mut live = self.store.row_keys();
        let mut planned: Vec<(EntityState, String, String, Option<FieldValues>)> = Vec::new();

        for change in &self.tracked {
            let key = self.change_key(change)?;
            let slot = (change.entity_name.clone(), key.clone());
            match change.state {
                EntityState::Added => {
                    if !live.insert(slot) {
                        return Err(MemStoreError::DuplicateKey {
                            entity: change.entity_name.clone(),
                            key,
                        });
                    }
                }
                EntityState::Modified => {
                    if !live.contains(&slot) {
                        return Err(MemStoreError::RowNotFound {
                            entity: change.entity_name.clone(),
                            key,
                        });
                    }
                }
                EntityState::Deleted => {
                    if !live.remove(&slot) {
                        return Err(MemStoreError::RowNotFound {
                            entity: change.entity_name.clone(),
                            key,
                        });
                    }
                }
                EntityState::Unchanged | EntityState::Detached => continue,
            }
            planned.push((
                change.state,
                change.entity_name.clone(),
                key,
                change.current.clone(),
            ));
        }

        let rows_written = planned.len() as u64;
        for (state, entity_name, key, current) in planned {
            match state {
                EntityState::Added | EntityState::Modified => {
                    self.store
                        .put_row(entity_name, key, current.unwrap_or_default());
                }
                EntityState::Deleted => self.store.remove_row(&entity_name, &key),
                EntityState::Unchanged | EntityState::Detached => {}
            }
        }

        let audit_written = self.store.append_audit(staged);
        self.tracked.clear();
        Ok(rows_written + audit_written)
    }
}

#[async_trait]
impl UnitOfWork for MemSession {
    fn pending_changes(&self) -> Vec<TrackedChange> {
        self.tracked.clone()
    }

    fn stage_audit(&mut self, entries: Vec<AuditEntry>) {
        self.staged_audit.extend(entries);
    }

    /// Commit the batch all-or-nothing.
    ///
    /// Staged audit entries belong to this attempt only: on failure they are
    /// discarded along with the row writes, while the tracked changes stay
    /// pending so a later save rebuilds them.
    async fn commit(&mut self) -> anyhow::Result<u64> {
        let staged = std::mem::take(&mut self.staged_audit);
        tracing::debug!(
            rows = self.tracked.len(),
            audit = staged.len(),
            "committing in-memory batch"
        );
        let written = self.apply_tracked(staged)?;
        Ok(written)
    }
}
