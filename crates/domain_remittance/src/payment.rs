//! Emitted payment records
//!
//! Payments are written to an external sink and never read back by the core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, Money, PaymentId, TenantId};

/// What the payment represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    InsurancePayment,
    PatientPayment,
    Refund,
}

/// How the payment arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Era,
    Check,
    Eft,
    Card,
}

/// Payment processing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Reversed,
}

/// A posted payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub tenant_id: TenantId,
    pub claim_id: ClaimId,
    pub amount: Money,
    pub payment_type: PaymentType,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub paid_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl PaymentRecord {
    /// A completed insurance payment posted from a remittance line item
    pub fn from_remittance(
        tenant_id: TenantId,
        claim_id: ClaimId,
        amount: Money,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: PaymentId::new_v7(),
            tenant_id,
            claim_id,
            amount,
            payment_type: PaymentType::InsurancePayment,
            method: PaymentMethod::Era,
            status: PaymentStatus::Completed,
            paid_at: Utc::now(),
            notes,
        }
    }
}
