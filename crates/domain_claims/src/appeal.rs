//! Appeal records
//!
//! Written by the appeals workflow; read here by payer-behavior analytics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AppealId, ClaimId, DenialId, TenantId};

/// Appeal workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppealStatus {
    Draft,
    Reviewed,
    Submitted,
    Won,
    Lost,
    Partial,
}

impl AppealStatus {
    /// Won or partially won
    pub fn is_win(&self) -> bool {
        matches!(self, AppealStatus::Won | AppealStatus::Partial)
    }
}

/// A formal request to reverse a denial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appeal {
    pub id: AppealId,
    pub tenant_id: TenantId,
    pub claim_id: ClaimId,
    /// The denial under appeal, when one was recorded
    pub denial_id: Option<DenialId>,
    pub status: AppealStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
