//! Per-type eligibility metadata.
//!
//! Eligibility is explicit registration, never runtime introspection: every
//! participating entity type is registered by name at startup, either from
//! [`AuditConfig`] or programmatically through the builder. Policies are
//! resolved into cached [`EntityDescriptor`]s exactly once; nothing is
//! re-derived per commit.

use quill_core::{AuditAction, AuditConfig, EntityPolicy};
use std::collections::{HashMap, HashSet};

/// Cached audit metadata for one entity type.
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    name: String,
    auditable: bool,
    only_action: Option<AuditAction>,
    ignored_fields: HashSet<String>,
    key_fields: Vec<String>,
}

impl EntityDescriptor {
    fn from_policy(name: &str, policy: &EntityPolicy) -> Self {
        Self {
            name: name.to_string(),
            auditable: policy.auditable,
            only_action: policy.only_action,
            ignored_fields: policy.ignored_fields.iter().cloned().collect(),
            key_fields: policy.key_fields.clone(),
        }
    }

    /// Entity type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether changes to this type produce audit entries.
    pub fn is_auditable(&self) -> bool {
        self.auditable
    }

    /// The single action this type is restricted to, if any.
    pub fn only_action(&self) -> Option<AuditAction> {
        self.only_action
    }

    /// Fields excluded from snapshots.
    pub fn ignored_fields(&self) -> &HashSet<String> {
        &self.ignored_fields
    }

    /// Key fields in declared order.
    pub fn key_fields(&self) -> &[String] {
        &self.key_fields
    }
}

/// Registry of entity types known to the auditor.
///
/// A type absent from the registry is simply not audited; absence is never an
/// error.
#[derive(Debug, Clone, Default)]
pub struct AuditRegistry {
    entities: HashMap<String, EntityDescriptor>,
}

impl AuditRegistry {
    /// Build a registry from configuration, resolving every policy once.
    pub fn from_config(config: &AuditConfig) -> Self {
        let entities = config
            .entities
            .iter()
            .map(|(name, policy)| (name.clone(), EntityDescriptor::from_policy(name, policy)))
            .collect();
        Self { entities }
    }

    /// Start a programmatic registration set.
    pub fn builder() -> AuditRegistryBuilder {
        AuditRegistryBuilder::default()
    }

    /// Look up the cached descriptor for an entity name.
    pub fn descriptor(&self, entity_name: &str) -> Option<&EntityDescriptor> {
        self.entities.get(entity_name)
    }

    /// Whether any policy is registered under this name.
    pub fn is_registered(&self, entity_name: &str) -> bool {
        self.entities.contains_key(entity_name)
    }

    /// Number of registered entity types.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the registry holds no policies at all.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Builder for registering entity policies at startup.
#[derive(Debug, Default)]
pub struct AuditRegistryBuilder {
    entities: HashMap<String, EntityPolicy>,
}

impl AuditRegistryBuilder {
    /// Register the policy for an entity name, replacing any previous one.
    pub fn entity(mut self, name: impl Into<String>, policy: EntityPolicy) -> Self {
        self.entities.insert(name.into(), policy);
        self
    }

    /// Resolve all registered policies into a registry.
    pub fn build(self) -> AuditRegistry {
        let entities = self
            .entities
            .iter()
            .map(|(name, policy)| (name.clone(), EntityDescriptor::from_policy(name, policy)))
            .collect();
        AuditRegistry { entities }
    }
}
