//! Eligibility: which tracked changes produce audit entries.
//!
//! A pure filter with no side effects. Absence of a policy, an
//! unrecognized lifecycle state, or a mismatched action restriction all mean
//! "not eligible" — never an error.

use crate::registry::EntityDescriptor;
use quill_core::{AuditAction, EntityState};

/// Map a tracked lifecycle state to the action it would record.
///
/// `Unchanged` and `Detached` entities are not auditable changes.
pub fn action_for_state(state: EntityState) -> Option<AuditAction> {
    match state {
        EntityState::Added => Some(AuditAction::Create),
        EntityState::Deleted => Some(AuditAction::Delete),
        EntityState::Modified => Some(AuditAction::Update),
        EntityState::Unchanged | EntityState::Detached => None,
    }
}

/// Resolve the action to audit for a descriptor and state, or `None` to skip.
///
/// A type restricted to a single action silently produces no record for any
/// other action.
pub fn eligible_action(descriptor: &EntityDescriptor, state: EntityState) -> Option<AuditAction> {
    if !descriptor.is_auditable() {
        return None;
    }
    let action = action_for_state(state)?;
    match descriptor.only_action() {
        Some(only) if only != action => None,
        _ => Some(action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::AuditRegistry;
    use quill_core::EntityPolicy;

    fn descriptor(policy: EntityPolicy) -> EntityDescriptor {
        AuditRegistry::builder()
            .entity("Product", policy)
            .build()
            .descriptor("Product")
            .unwrap()
            .clone()
    }

    #[test]
    fn states_map_to_actions() {
        assert_eq!(action_for_state(EntityState::Added), Some(AuditAction::Create));
        assert_eq!(action_for_state(EntityState::Modified), Some(AuditAction::Update));
        assert_eq!(action_for_state(EntityState::Deleted), Some(AuditAction::Delete));
        assert_eq!(action_for_state(EntityState::Unchanged), None);
        assert_eq!(action_for_state(EntityState::Detached), None);
    }

    #[test]
    fn unrestricted_types_audit_every_action() {
        let descriptor = descriptor(EntityPolicy::new());
        assert_eq!(
            eligible_action(&descriptor, EntityState::Added),
            Some(AuditAction::Create)
        );
        assert_eq!(
            eligible_action(&descriptor, EntityState::Modified),
            Some(AuditAction::Update)
        );
        assert_eq!(
            eligible_action(&descriptor, EntityState::Deleted),
            Some(AuditAction::Delete)
        );
    }

    #[test]
    fn restriction_filters_other_actions() {
        let descriptor = descriptor(EntityPolicy::new().only(AuditAction::Create));
        assert_eq!(
            eligible_action(&descriptor, EntityState::Added),
            Some(AuditAction::Create)
        );
        assert_eq!(eligible_action(&descriptor, EntityState::Modified), None);
        assert_eq!(eligible_action(&descriptor, EntityState::Deleted), None);
    }

    #[test]
    fn opted_out_types_are_skipped() {
        let descriptor = descriptor(EntityPolicy::new().not_auditable());
        assert_eq!(eligible_action(&descriptor, EntityState::Added), None);
    }

    #[test]
    fn non_change_states_are_skipped() {
        let descriptor = descriptor(EntityPolicy::new());
        assert_eq!(eligible_action(&descriptor, EntityState::Unchanged), None);
        assert_eq!(eligible_action(&descriptor, EntityState::Detached), None);
    }
}
