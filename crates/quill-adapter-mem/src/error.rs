//! Error types for the in-memory adapter.

use thiserror::Error;

/// Errors that can occur while tracking or committing against the in-memory
/// store.
#[derive(Debug, Error)]
pub enum MemStoreError {
    /// The entity type declares no key fields, so rows cannot be addressed.
    #[error("entity `{entity}` has no registered key fields")]
    MissingKey { entity: String },

    /// Key fields are declared but no key value could be resolved.
    #[error("could not resolve a key value for entity `{entity}`")]
    UnresolvedKey { entity: String },

    /// An insert collided with an existing row.
    #[error("duplicate key `{key}` for entity `{entity}`")]
    DuplicateKey { entity: String, key: String },

    /// An update or delete addressed a row that does not exist.
    #[error("no committed row `{key}` for entity `{entity}`")]
    RowNotFound { entity: String, key: String },

    /// The entity value did not produce a field map.
    #[error("invalid entity values: {0}")]
    InvalidEntity(#[from] serde_json::Error),
}
