//! Core Kernel - Foundational types for the dental revenue-cycle system
//!
//! This crate provides the building blocks used across all domain modules:
//! - Money with precise decimal arithmetic (cent-level tolerance comparison)
//! - Strongly-typed identifiers
//! - The explicit tenant context threaded through every operation
//! - The shared error taxonomy
//! - The cross-cutting audit sink port

pub mod audit;
pub mod error;
pub mod identifiers;
pub mod money;
pub mod tenant;

pub use audit::{AuditEvent, AuditSink, NoopAuditSink, ResourceKind};
pub use error::CoreError;
pub use identifiers::{
    AppealId, AppointmentId, BatchId, ClaimId, DenialId, PatientId, PaymentId, PracticeId,
    TenantId,
};
pub use money::Money;
pub use tenant::TenantContext;
