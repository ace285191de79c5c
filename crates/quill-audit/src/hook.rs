//! Commit interception.
//!
//! [`Audited`] wraps a concrete unit of work and intercepts its save path:
//! entries are built from the pre-commit change set (original values are
//! still retrievable at that point), staged into the same transactional
//! batch, and then the real commit runs. The hook adds no retry and no
//! transaction boundary of its own; if the delegated commit fails, the
//! staged entries are never persisted.

use crate::builder::Auditor;
use async_trait::async_trait;
use quill_core::{AuditEntry, TrackedChange};

/// The persistence seam the hook wraps.
///
/// Implementations own change tracking, the audit collection, and commit
/// atomicity. The tracked set is read-only to the audit core; the staged
/// audit collection belongs to the current unit of work only.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Pre-commit view of every tracked entity, in tracking order.
    ///
    /// Iteration order is an explicit contract: entries are produced in the
    /// order this returns.
    fn pending_changes(&self) -> Vec<TrackedChange>;

    /// Append audit entries to the transactional batch about to commit.
    fn stage_audit(&mut self, entries: Vec<AuditEntry>);

    /// Persist all pending changes and staged entries atomically.
    ///
    /// Returns the number of records written. On failure nothing may be
    /// persisted, staged audit entries included.
    async fn commit(&mut self) -> anyhow::Result<u64>;
}

/// A unit of work with change auditing wired into its save path.
pub struct Audited<U> {
    auditor: Auditor,
    inner: U,
}

impl<U: UnitOfWork> Audited<U> {
    /// Wrap a unit of work with an auditor.
    pub fn new(auditor: Auditor, inner: U) -> Self {
        Self { auditor, inner }
    }

    /// The wrapped unit of work.
    pub fn inner(&self) -> &U {
        &self.inner
    }

    /// Mutable access to the wrapped unit of work (for tracking calls).
    pub fn inner_mut(&mut self) -> &mut U {
        &mut self.inner
    }

    /// Unwrap, discarding the auditor.
    pub fn into_inner(self) -> U {
        self.inner
    }

    /// The auditor consulted on every save.
    pub fn auditor(&self) -> &Auditor {
        &self.auditor
    }

    /// Build audit entries for every eligible pending change, stage them,
    /// then delegate to the wrapped commit.
    ///
    /// Runs strictly before the underlying commit touches tracked-state
    /// bookkeeping. Build failures and commit failures both propagate
    /// unchanged; in either case no audit entry outlives the failed batch.
    pub async fn save_changes(&mut self) -> anyhow::Result<u64> {
        let changes = self.inner.pending_changes();
        let entries = self.auditor.build_entries(&changes)?;

        if !entries.is_empty() {
            tracing::debug!(
                staged = entries.len(),
                tracked = changes.len(),
                "staging audit entries before commit"
            );
            self.inner.stage_audit(entries);
        }

        self.inner.commit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::AuditRegistry;
    use quill_core::{EntityPolicy, FieldValues};
    use serde_json::json;
    use std::sync::Arc;

    struct StubUow {
        changes: Vec<TrackedChange>,
        staged: Vec<AuditEntry>,
        staged_before_commit: Option<usize>,
        fail_commit: bool,
        committed: bool,
    }

    impl StubUow {
        fn new(changes: Vec<TrackedChange>) -> Self {
            Self {
                changes,
                staged: Vec::new(),
                staged_before_commit: None,
                fail_commit: false,
                committed: false,
            }
        }
    }

    #[async_trait]
    impl UnitOfWork for StubUow {
        fn pending_changes(&self) -> Vec<TrackedChange> {
            self.changes.clone()
        }

        fn stage_audit(&mut self, entries: Vec<AuditEntry>) {
            self.staged.extend(entries);
        }

        async fn commit(&mut self) -> anyhow::Result<u64> {
            self.staged_before_commit = Some(self.staged.len());
            if self.fail_commit {
                anyhow::bail!("constraint violation");
            }
            self.committed = true;
            Ok(self.changes.len() as u64 + self.staged.len() as u64)
        }
    }

    fn product_change(name: &str) -> TrackedChange {
        let mut values = FieldValues::new();
        values.insert("id".to_string(), json!(1));
        values.insert("name".to_string(), json!(name));
        TrackedChange::added("Product", values)
    }

    fn auditor() -> Auditor {
        Auditor::new(Arc::new(
            AuditRegistry::builder()
                .entity("Product", EntityPolicy::new().key_field("id"))
                .build(),
        ))
    }

    #[tokio::test]
    async fn stages_entries_before_delegating() {
        let uow = StubUow::new(vec![product_change("Test Product")]);
        let mut audited = Audited::new(auditor(), uow);

        let written = audited.save_changes().await.unwrap();
        assert_eq!(written, 2);

        let inner = audited.inner();
        assert!(inner.committed);
        assert_eq!(inner.staged.len(), 1);
        // The staged entry was already in the batch when commit ran.
        assert_eq!(inner.staged_before_commit, Some(1));
    }

    #[tokio::test]
    async fn commit_failure_propagates_unchanged() {
        let mut uow = StubUow::new(vec![product_change("Test Product")]);
        uow.fail_commit = true;
        let mut audited = Audited::new(auditor(), uow);

        let err = audited.save_changes().await.unwrap_err();
        assert!(err.to_string().contains("constraint violation"));
        assert!(!audited.inner().committed);
    }

    #[tokio::test]
    async fn ineligible_batches_stage_nothing() {
        let mut values = FieldValues::new();
        values.insert("id".to_string(), json!(9));
        let uow = StubUow::new(vec![TrackedChange::added("Ghost", values)]);
        let mut audited = Audited::new(auditor(), uow);

        audited.save_changes().await.unwrap();
        assert!(audited.inner().staged.is_empty());
        assert_eq!(audited.inner().staged_before_commit, Some(0));
    }

    #[tokio::test]
    async fn disabled_auditor_commits_untouched() {
        let uow = StubUow::new(vec![product_change("Test Product")]);
        let mut audited = Audited::new(Auditor::disabled(), uow);

        let written = audited.save_changes().await.unwrap();
        assert_eq!(written, 1);
        assert!(audited.inner().staged.is_empty());
    }

    #[tokio::test]
    async fn into_inner_returns_the_wrapped_unit() {
        let uow = StubUow::new(Vec::new());
        let audited = Audited::new(auditor(), uow);
        let inner = audited.into_inner();
        assert!(inner.changes.is_empty());
    }
}
