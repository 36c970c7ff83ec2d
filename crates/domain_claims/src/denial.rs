//! Denial records
//!
//! Written by the denial-management workflow; this core reads them as history
//! for worklist scoring and payer analytics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, DenialId, Money, TenantId};

/// Denial workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialStatus {
    New,
    Acknowledged,
    Appealing,
    Appealed,
    Won,
    Lost,
    Partial,
    WrittenOff,
}

/// Why the payer denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialCategory {
    Eligibility,
    MissingInformation,
    FrequencyLimitation,
    NonCoveredService,
    TimelyFiling,
    CoordinationOfBenefits,
    Other,
}

/// A payer's refusal, full or partial, to pay a claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Denial {
    pub id: DenialId,
    pub tenant_id: TenantId,
    pub claim_id: ClaimId,
    pub status: DenialStatus,
    pub category: DenialCategory,
    /// Denied amount
    pub amount: Money,
    /// Flagged for supervisor escalation
    pub escalated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
