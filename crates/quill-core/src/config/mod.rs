//! Configuration types for Quill change auditing.
//!
//! Audit eligibility is explicit configuration, not runtime introspection:
//! every entity type that participates is registered here by name, together
//! with its key fields, ignored fields, and optional action restriction.
//! Policies are resolved once at startup into the registry and never
//! re-derived per commit.
//!
//! # Configuration File
//!
//! ```yaml
//! enabled: true
//! entities:
//!   Product:
//!     key_fields: [id]
//!     ignored_fields: [price]
//!   User:
//!     key_fields: [id]
//!     only_action: Create
//! ```

pub mod policy;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub use policy::EntityPolicy;

/// Top-level audit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Whether change auditing is enabled. A disabled auditor builds no
    /// entries; commits proceed untouched.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Per-entity policies, keyed by entity name.
    #[serde(default)]
    pub entities: HashMap<String, EntityPolicy>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            entities: HashMap::new(),
        }
    }
}

impl AuditConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Register or replace the policy for an entity name.
    pub fn with_entity(mut self, name: impl Into<String>, policy: EntityPolicy) -> Self {
        self.entities.insert(name.into(), policy);
        self
    }

    /// Look up the policy for an entity name.
    pub fn policy(&self, name: &str) -> Option<&EntityPolicy> {
        self.entities.get(name)
    }
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn default_enabled() -> bool {
    true
}
