//! Collections Analytics Domain
//!
//! Read-only analytics over the claim, denial, and appeal corpus: A/R aging
//! buckets, a weighted collections worklist, and per-payer behavior
//! statistics. The aggregations are pure functions over in-memory slices;
//! `ReceivablesAnalytics` loads those slices through the claim-side ports and
//! performs no writes.

pub mod aging;
pub mod payer_behavior;
pub mod service;
pub mod worklist;

pub use aging::{AgingReport, BucketTotals, LedgerAging};
pub use payer_behavior::{PayerBehavior, PayerFlag};
pub use service::ReceivablesAnalytics;
pub use worklist::{PayerHistory, WorklistEntry, DEFAULT_WORKLIST_LIMIT};
