//! # quill-adapter-mem
//!
//! In-memory unit-of-work adapter for Quill change auditing.
//!
//! [`MemSession`] is a small change tracker over an in-memory row store,
//! implementing the [`UnitOfWork`](quill_audit::UnitOfWork) seam the audit
//! hook wraps. It exists for embedding and tests: the same role an in-memory
//! database provider plays under a full ORM.
//!
//! ## Example
//!
//! ```rust,ignore
//! use quill_adapter_mem::MemSession;
//! use quill_audit::{Audited, Auditor, AuditRegistry};
//! use quill_core::EntityPolicy;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(
//!     AuditRegistry::builder()
//!         .entity("Product", EntityPolicy::new().key_field("id"))
//!         .build(),
//! );
//!
//! let mut session = Audited::new(Auditor::new(registry.clone()), MemSession::new(registry));
//! session.inner_mut().insert(&product)?;
//! session.save_changes().await?;
//! assert_eq!(session.inner().audit_log().len(), 1);
//! ```
//!
//! Commits are all-or-nothing: the batch is validated against the committed
//! rows first, and a failure persists neither business rows nor staged audit
//! entries.

pub mod error;
pub mod session;
pub mod store;

pub use error::MemStoreError;
pub use session::MemSession;
pub use store::MemStore;
