//! Claims Domain
//!
//! This crate implements the insurance-claim lifecycle from creation through
//! payer adjudication, including the pre-submission scrubbing validator and
//! the denial/appeal records consumed by collections analytics.
//!
//! # Claim Lifecycle
//!
//! ```text
//! draft -> scrubbing -> ready -> submitted -> accepted/rejected
//!             |                                    |
//!        scrub_failed                    paid / denied -> appealed
//! ```
//!
//! `scrub` may run from any status and `update_status` is an unguarded
//! manual-override path; only `submit` enforces a predecessor (`ready`).

pub mod appeal;
pub mod claim;
pub mod denial;
pub mod error;
pub mod lifecycle;
pub mod ports;
pub mod procedure;
pub mod scrub;

pub use appeal::{Appeal, AppealStatus};
pub use claim::{AdjudicationOutcome, AgeBucket, Claim, ClaimStatus, PreDeterminationStatus};
pub use denial::{Denial, DenialCategory, DenialStatus};
pub use error::ClaimError;
pub use lifecycle::{AgeSnapshot, ClaimLifecycleManager, CreateClaimInput, ScrubOutcome};
pub use procedure::Procedure;
pub use scrub::{
    FeeSchedule, PayerRule, PayerRuleSet, RuleType, ScheduledFee, ScrubIssue, ScrubReport,
    Severity,
};
