//! # quill-audit
//!
//! Change interception and diffing for unit-of-work persistence.
//!
//! This crate watches entity mutations flowing through a "save" operation and
//! stages one structured audit record per eligible change into the same
//! transactional batch, without requiring callers to instrument business
//! code.
//!
//! ## Components
//!
//! | Component | Responsibility |
//! |-----------|----------------|
//! | [`AuditRegistry`] | Per-type eligibility metadata, resolved once at startup |
//! | [`eligibility`]   | Type + state + restriction → action kind, or skip |
//! | [`key`]           | Identity string from declared key fields |
//! | [`snapshot`]      | Canonical field-map snapshots, minus ignored fields |
//! | [`Auditor`]       | One [`AuditEntry`](quill_core::AuditEntry) per eligible change in a batch |
//! | [`Audited`]       | Wraps a [`UnitOfWork`]: build → stage → delegate commit |
//!
//! ## Example
//!
//! ```rust,ignore
//! use quill_audit::{Audited, Auditor, AuditRegistry};
//! use quill_core::EntityPolicy;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(
//!     AuditRegistry::builder()
//!         .entity("Product", EntityPolicy::new().key_field("id").ignore_field("price"))
//!         .build(),
//! );
//!
//! // `session` is any UnitOfWork implementation, e.g. quill-adapter-mem's.
//! let mut session = Audited::new(Auditor::new(registry), session);
//! session.save_changes().await?;
//! ```
//!
//! Either all audit entries and all business mutations land together or none
//! do; atomicity is owned by the wrapped unit of work.

pub mod builder;
pub mod eligibility;
pub mod error;
pub mod hook;
pub mod key;
pub mod registry;
pub mod snapshot;

pub use builder::Auditor;
pub use eligibility::{action_for_state, eligible_action};
pub use error::AuditError;
pub use hook::{Audited, UnitOfWork};
pub use key::{resolve_entity_id, resolve_key};
pub use registry::{AuditRegistry, AuditRegistryBuilder, EntityDescriptor};
pub use snapshot::serialize_snapshot;
