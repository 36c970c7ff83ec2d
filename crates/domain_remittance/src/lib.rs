//! Remittance Domain
//!
//! Ingests payer remittance (ERA) batches, matches line items to outstanding
//! claims, posts payments for reconciled matches, and supports manual and
//! bulk exception resolution.

pub mod batch;
pub mod error;
pub mod payment;
pub mod ports;
pub mod reconciler;

pub use batch::{
    LineItemInput, MatchStatus, RemittanceBatch, RemittanceLineItem, Resolution,
};
pub use error::RemittanceError;
pub use payment::{PaymentMethod, PaymentRecord, PaymentStatus, PaymentType};
pub use reconciler::{
    BulkResolveItem, BulkResolveOutcome, IngestInput, IngestSummary, RemittanceReconciler,
};
