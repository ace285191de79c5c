//! Error types for the audit crate.
//!
//! Eligibility misses and absent metadata are not errors; they degrade to
//! "no entry" and `None`/empty respectively. What does surface here must
//! reach the caller of the commit, since silently dropping a field would
//! corrupt the snapshot invariant.

use thiserror::Error;

/// Errors that can occur while building audit entries.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A tracked entity's field values could not be rendered to their
    /// canonical JSON form.
    #[error("failed to serialize snapshot of `{entity}`: {source}")]
    Snapshot {
        entity: String,
        #[source]
        source: serde_json::Error,
    },
}
