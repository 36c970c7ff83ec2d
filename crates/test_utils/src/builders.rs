//! Test data builders

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{
    AppealId, ClaimId, DenialId, Money, PatientId, PracticeId, TenantId,
};
use domain_claims::{
    Appeal, AppealStatus, Claim, ClaimStatus, Denial, DenialCategory, DenialStatus, Procedure,
};
use domain_remittance::LineItemInput;

/// Builder for test claims
///
/// Defaults to a submitted, non-pre-determination claim with one D2140
/// procedure billed at $150.
pub struct ClaimBuilder {
    claim: Claim,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    pub fn new() -> Self {
        let now = Utc::now();
        let mut procedure = Procedure::new("D2140", Money::new(dec!(150)));
        procedure.tooth = Some("14".to_string());
        Self {
            claim: Claim {
                id: ClaimId::new_v7(),
                tenant_id: TenantId::new(),
                practice_id: PracticeId::new(),
                patient_id: Some(PatientId::new()),
                appointment_id: None,
                payer_id: "delta-dental".to_string(),
                payer_name: "Delta Dental".to_string(),
                claim_number: format!("CLM-{}", ClaimId::new_v7().as_uuid().simple()),
                status: ClaimStatus::Submitted,
                procedures: vec![procedure],
                total_charged: Money::new(dec!(150)),
                total_paid: None,
                adjustments: None,
                patient_portion: Money::zero(),
                scrub_issues: None,
                scrub_passed_at: None,
                submitted_at: Some(now),
                submitted_by: Some("tester".to_string()),
                accepted_at: None,
                paid_at: None,
                age_in_days: Some(0),
                age_bucket: None,
                is_pre_determination: false,
                pre_determination_status: None,
                created_at: now,
                updated_at: now,
            },
        }
    }

    pub fn tenant(mut self, tenant: TenantId) -> Self {
        self.claim.tenant_id = tenant;
        self
    }

    pub fn practice(mut self, practice: PracticeId) -> Self {
        self.claim.practice_id = practice;
        self
    }

    pub fn payer(mut self, payer_id: impl Into<String>, payer_name: impl Into<String>) -> Self {
        self.claim.payer_id = payer_id.into();
        self.claim.payer_name = payer_name.into();
        self
    }

    pub fn claim_number(mut self, number: impl Into<String>) -> Self {
        self.claim.claim_number = number.into();
        self
    }

    pub fn status(mut self, status: ClaimStatus) -> Self {
        self.claim.status = status;
        self
    }

    pub fn procedures(mut self, procedures: Vec<Procedure>) -> Self {
        self.claim.procedures = procedures;
        self
    }

    pub fn charged(mut self, amount: Decimal) -> Self {
        self.claim.total_charged = Money::new(amount);
        self
    }

    pub fn paid(mut self, amount: Decimal) -> Self {
        self.claim.total_paid = Some(Money::new(amount));
        self
    }

    pub fn adjustments(mut self, amount: Decimal) -> Self {
        self.claim.adjustments = Some(Money::new(amount));
        self
    }

    pub fn patient_portion(mut self, amount: Decimal) -> Self {
        self.claim.patient_portion = Money::new(amount);
        self
    }

    /// Backdates submission by the given number of days
    pub fn submitted_days_ago(mut self, days: i64) -> Self {
        self.claim.submitted_at = Some(Utc::now() - Duration::days(days));
        self
    }

    pub fn not_submitted(mut self) -> Self {
        self.claim.submitted_at = None;
        self.claim.submitted_by = None;
        self.claim.age_in_days = None;
        self
    }

    /// Stamps payment `days_after_submission` days after the submission time
    pub fn paid_days_after_submission(mut self, days: i64) -> Self {
        let submitted = self.claim.submitted_at.unwrap_or_else(Utc::now);
        self.claim.paid_at = Some(submitted + Duration::days(days));
        self
    }

    pub fn pre_determination(mut self) -> Self {
        self.claim.is_pre_determination = true;
        self
    }

    pub fn build(self) -> Claim {
        self.claim
    }
}

/// Builder for denial records
pub struct DenialBuilder {
    denial: Denial,
}

impl DenialBuilder {
    pub fn for_claim(claim: &Claim) -> Self {
        let now = Utc::now();
        Self {
            denial: Denial {
                id: DenialId::new_v7(),
                tenant_id: claim.tenant_id,
                claim_id: claim.id,
                status: DenialStatus::New,
                category: DenialCategory::MissingInformation,
                amount: claim.total_charged,
                escalated: false,
                created_at: now,
                updated_at: now,
            },
        }
    }

    pub fn status(mut self, status: DenialStatus) -> Self {
        self.denial.status = status;
        self
    }

    pub fn category(mut self, category: DenialCategory) -> Self {
        self.denial.category = category;
        self
    }

    pub fn escalated(mut self) -> Self {
        self.denial.escalated = true;
        self
    }

    pub fn build(self) -> Denial {
        self.denial
    }
}

/// Builder for appeal records
pub struct AppealBuilder {
    appeal: Appeal,
}

impl AppealBuilder {
    pub fn for_claim(claim: &Claim) -> Self {
        let now = Utc::now();
        Self {
            appeal: Appeal {
                id: AppealId::new_v7(),
                tenant_id: claim.tenant_id,
                claim_id: claim.id,
                denial_id: None,
                status: AppealStatus::Submitted,
                created_at: now,
                updated_at: now,
            },
        }
    }

    pub fn status(mut self, status: AppealStatus) -> Self {
        self.appeal.status = status;
        self
    }

    pub fn denial(mut self, denial: &Denial) -> Self {
        self.appeal.denial_id = Some(denial.id);
        self
    }

    pub fn build(self) -> Appeal {
        self.appeal
    }
}

/// Builder for remittance line-item inputs
pub struct LineItemBuilder {
    item: LineItemInput,
}

impl LineItemBuilder {
    pub fn new(claim_number: impl Into<String>) -> Self {
        Self {
            item: LineItemInput {
                claim_number: claim_number.into(),
                patient_name: None,
                charged_amount: Money::new(dec!(150)),
                paid_amount: Money::new(dec!(150)),
                adjustment_amount: None,
                remark_codes: None,
            },
        }
    }

    /// A line item whose amounts fully reconcile against the claim
    pub fn matching(claim: &Claim) -> Self {
        Self::new(claim.claim_number.clone())
            .charged(claim.total_charged.amount())
            .paid(claim.total_charged.amount())
    }

    pub fn charged(mut self, amount: Decimal) -> Self {
        self.item.charged_amount = Money::new(amount);
        self
    }

    pub fn paid(mut self, amount: Decimal) -> Self {
        self.item.paid_amount = Money::new(amount);
        self
    }

    pub fn adjustment(mut self, amount: Decimal) -> Self {
        self.item.adjustment_amount = Some(Money::new(amount));
        self
    }

    pub fn remarks(mut self, codes: Vec<&str>) -> Self {
        self.item.remark_codes = Some(codes.into_iter().map(String::from).collect());
        self
    }

    pub fn build(self) -> LineItemInput {
        self.item
    }
}
