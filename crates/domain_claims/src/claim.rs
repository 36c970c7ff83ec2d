//! Claim aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AppointmentId, ClaimId, Money, PatientId, PracticeId, TenantId};

use crate::procedure::Procedure;
use crate::scrub::ScrubIssue;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Created, not yet validated
    Draft,
    /// Transient: validation in progress
    Scrubbing,
    /// Validation found at least one error
    ScrubFailed,
    /// Validation passed, eligible for submission
    Ready,
    /// Sent to the payer
    Submitted,
    /// Acknowledged by the payer
    Accepted,
    /// Rejected by the payer clearinghouse
    Rejected,
    /// Paid by the payer
    Paid,
    /// Denied by the payer
    Denied,
    /// Under appeal
    Appealed,
}

impl ClaimStatus {
    /// Statuses counted as open accounts receivable
    pub fn is_open_receivable(&self) -> bool {
        matches!(
            self,
            ClaimStatus::Submitted | ClaimStatus::Accepted | ClaimStatus::Denied | ClaimStatus::Appealed
        )
    }

    /// Statuses whose age is frozen
    pub fn is_terminal_for_aging(&self) -> bool {
        matches!(self, ClaimStatus::Paid | ClaimStatus::Denied)
    }
}

/// Target statuses reachable through the manual status-update path
///
/// `update_status` accepts any of these from any current status; the closed
/// enum bounds what a caller can request even though the move is unguarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjudicationOutcome {
    Accepted,
    Rejected,
    Paid,
    Denied,
    Appealed,
}

impl From<AdjudicationOutcome> for ClaimStatus {
    fn from(outcome: AdjudicationOutcome) -> Self {
        match outcome {
            AdjudicationOutcome::Accepted => ClaimStatus::Accepted,
            AdjudicationOutcome::Rejected => ClaimStatus::Rejected,
            AdjudicationOutcome::Paid => ClaimStatus::Paid,
            AdjudicationOutcome::Denied => ClaimStatus::Denied,
            AdjudicationOutcome::Appealed => ClaimStatus::Appealed,
        }
    }
}

/// Coarse days-outstanding bucket for A/R reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBucket {
    #[serde(rename = "0-30")]
    Days0To30,
    #[serde(rename = "31-60")]
    Days31To60,
    #[serde(rename = "61-90")]
    Days61To90,
    #[serde(rename = "91-120")]
    Days91To120,
    #[serde(rename = "120+")]
    Over120,
}

impl AgeBucket {
    /// Maps an age in days to its bucket
    pub fn from_days(days: i64) -> Self {
        match days {
            d if d <= 30 => AgeBucket::Days0To30,
            d if d <= 60 => AgeBucket::Days31To60,
            d if d <= 90 => AgeBucket::Days61To90,
            d if d <= 120 => AgeBucket::Days91To120,
            _ => AgeBucket::Over120,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBucket::Days0To30 => "0-30",
            AgeBucket::Days31To60 => "31-60",
            AgeBucket::Days61To90 => "61-90",
            AgeBucket::Days91To120 => "91-120",
            AgeBucket::Over120 => "120+",
        }
    }

    /// All buckets in ascending age order
    pub fn all() -> [AgeBucket; 5] {
        [
            AgeBucket::Days0To30,
            AgeBucket::Days31To60,
            AgeBucket::Days61To90,
            AgeBucket::Days91To120,
            AgeBucket::Over120,
        ]
    }
}

/// Status of a pre-determination (coverage preview) claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreDeterminationStatus {
    Pending,
    Approved,
    Denied,
}

/// An insurance claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Owning tenant
    pub tenant_id: TenantId,
    /// Billing practice
    pub practice_id: PracticeId,
    /// Patient; always set by the lifecycle manager, but claims imported
    /// through PMS sync may lack it, so scrubbing still guards
    pub patient_id: Option<PatientId>,
    /// Originating appointment, if any
    pub appointment_id: Option<AppointmentId>,
    /// External payer registry key
    pub payer_id: String,
    /// Payer display name
    pub payer_name: String,
    /// Human-facing claim number, matched against remittance line items
    pub claim_number: String,
    /// Status
    pub status: ClaimStatus,
    /// Billed procedures, in billed order
    pub procedures: Vec<Procedure>,
    /// Total billed amount
    pub total_charged: Money,
    /// Total paid by the payer, once known
    pub total_paid: Option<Money>,
    /// Contractual adjustments, once known
    pub adjustments: Option<Money>,
    /// Portion owed by the patient
    pub patient_portion: Money,
    /// Issues from the most recent scrub, in evaluation order
    pub scrub_issues: Option<Vec<ScrubIssue>>,
    /// Set only when a scrub passes
    pub scrub_passed_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub submitted_by: Option<String>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    /// Days since submission, advanced only while the claim is open
    pub age_in_days: Option<i64>,
    pub age_bucket: Option<AgeBucket>,
    /// True for coverage-preview claims, excluded from A/R analytics
    pub is_pre_determination: bool,
    pub pre_determination_status: Option<PreDeterminationStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Computes the current age in whole days from a submission timestamp
    pub fn age_days_since(submitted_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        (now - submitted_at).num_days()
    }

    /// Effective age in days for analytics: submission time if present,
    /// otherwise creation time
    pub fn effective_age_days(&self, now: DateTime<Utc>) -> i64 {
        Self::age_days_since(self.submitted_at.unwrap_or(self.created_at), now)
    }

    /// Total paid, zero when unknown
    pub fn paid_or_zero(&self) -> Money {
        self.total_paid.unwrap_or_else(Money::zero)
    }

    /// Adjustments, zero when unknown
    pub fn adjustments_or_zero(&self) -> Money {
        self.adjustments.unwrap_or_else(Money::zero)
    }

    /// Outstanding insurance balance, floored at zero
    pub fn insurance_balance(&self) -> Money {
        self.total_charged
            .saturating_sub(self.patient_portion + self.paid_or_zero() + self.adjustments_or_zero())
    }
}

/// Generates a claim number from the current epoch millis
pub fn generate_claim_number() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("CLM-{}", duration.as_millis() % 10_000_000_000)
}
