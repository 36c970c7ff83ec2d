//! Claim lifecycle service
//!
//! Owns the claim status state machine. `submit` is the only guarded
//! transition (`ready` required); `scrub` runs from any status and
//! `update_status` is the unguarded manual-override path used by
//! back-office adjudication corrections.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument};

use core_kernel::{
    AppointmentId, AuditEvent, AuditSink, ClaimId, Money, PatientId, PracticeId, ResourceKind,
    TenantContext,
};

use crate::claim::{
    generate_claim_number, AdjudicationOutcome, AgeBucket, Claim, ClaimStatus,
};
use crate::error::ClaimError;
use crate::ports::{ClaimStore, DirectoryStore, FeeScheduleProvider, PayerRuleProvider};
use crate::procedure::Procedure;
use crate::scrub::{self, ScrubIssue};

/// Input for creating a claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClaimInput {
    pub practice_id: PracticeId,
    pub patient_id: PatientId,
    pub appointment_id: Option<AppointmentId>,
    pub payer_id: String,
    pub payer_name: String,
    pub procedures: Vec<Procedure>,
    pub total_charged: Money,
    pub patient_portion: Money,
    pub is_pre_determination: bool,
}

/// Result of a scrub run, returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrubOutcome {
    pub claim_id: ClaimId,
    pub status: ClaimStatus,
    pub issues: Vec<ScrubIssue>,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

/// Stored age fields after a recalculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeSnapshot {
    pub age_in_days: Option<i64>,
    pub age_bucket: Option<AgeBucket>,
}

/// Service owning the claim entity and its transitions
pub struct ClaimLifecycleManager {
    claims: Arc<dyn ClaimStore>,
    directory: Arc<dyn DirectoryStore>,
    payer_rules: Arc<dyn PayerRuleProvider>,
    fee_schedules: Arc<dyn FeeScheduleProvider>,
    audit: Arc<dyn AuditSink>,
}

impl ClaimLifecycleManager {
    pub fn new(
        claims: Arc<dyn ClaimStore>,
        directory: Arc<dyn DirectoryStore>,
        payer_rules: Arc<dyn PayerRuleProvider>,
        fee_schedules: Arc<dyn FeeScheduleProvider>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            claims,
            directory,
            payer_rules,
            fee_schedules,
            audit,
        }
    }

    /// Creates a draft claim after verifying that every referenced entity
    /// belongs to the caller's tenant
    #[instrument(skip(self, ctx, input), fields(tenant = %ctx.tenant_id))]
    pub async fn create(
        &self,
        ctx: &TenantContext,
        input: CreateClaimInput,
    ) -> Result<Claim, ClaimError> {
        let tenant = ctx.tenant_id;
        if !self.directory.practice_exists(tenant, input.practice_id).await? {
            return Err(ClaimError::not_found("practice"));
        }
        if !self.directory.patient_exists(tenant, input.patient_id).await? {
            return Err(ClaimError::not_found("patient"));
        }
        if let Some(appointment_id) = input.appointment_id {
            if !self.directory.appointment_exists(tenant, appointment_id).await? {
                return Err(ClaimError::not_found("appointment"));
            }
        }

        let now = Utc::now();
        let claim = Claim {
            id: ClaimId::new_v7(),
            tenant_id: tenant,
            practice_id: input.practice_id,
            patient_id: Some(input.patient_id),
            appointment_id: input.appointment_id,
            payer_id: input.payer_id,
            payer_name: input.payer_name,
            claim_number: generate_claim_number(),
            status: ClaimStatus::Draft,
            procedures: input.procedures,
            total_charged: input.total_charged,
            total_paid: None,
            adjustments: None,
            patient_portion: input.patient_portion,
            scrub_issues: None,
            scrub_passed_at: None,
            submitted_at: None,
            submitted_by: None,
            accepted_at: None,
            paid_at: None,
            age_in_days: None,
            age_bucket: None,
            is_pre_determination: input.is_pre_determination,
            pre_determination_status: input
                .is_pre_determination
                .then_some(crate::claim::PreDeterminationStatus::Pending),
            created_at: now,
            updated_at: now,
        };
        let id = self.claims.insert(claim.clone()).await?;
        info!(claim = %id, "claim created");
        self.audit
            .append(
                AuditEvent::new(ctx, "claim.create", ResourceKind::Claim)
                    .with_resource(id)
                    .phi(),
            )
            .await;
        Ok(claim)
    }

    /// Runs the scrubbing engine and persists the verdict
    ///
    /// No prior-status check: a draft, a previously failed claim, or even a
    /// submitted one may be re-scrubbed, refreshing its stored issues.
    #[instrument(skip(self, ctx), fields(tenant = %ctx.tenant_id, claim = %claim_id))]
    pub async fn scrub(
        &self,
        ctx: &TenantContext,
        claim_id: ClaimId,
    ) -> Result<ScrubOutcome, ClaimError> {
        let tenant = ctx.tenant_id;
        let mut claim = self
            .claims
            .get(tenant, claim_id)
            .await?
            .ok_or_else(|| ClaimError::not_found("claim"))?;

        claim.status = ClaimStatus::Scrubbing;
        claim.updated_at = Utc::now();
        self.claims.update(&claim).await?;

        let rules = self.payer_rules.lookup(tenant, &claim.payer_id).await?;
        let schedules = self.fee_schedules.lookup(tenant, claim.practice_id).await?;
        let report = scrub::evaluate(&claim, rules.as_ref(), &schedules);
        debug!(
            errors = report.error_count(),
            warnings = report.warning_count(),
            "scrub evaluated"
        );

        let verdict = report.verdict();
        claim.status = verdict;
        claim.scrub_issues = Some(report.issues.clone());
        if verdict == ClaimStatus::Ready {
            claim.scrub_passed_at = Some(Utc::now());
        }
        claim.updated_at = Utc::now();
        self.claims.update(&claim).await?;

        self.audit
            .append(
                AuditEvent::new(ctx, "claim.scrub", ResourceKind::Claim)
                    .with_resource(claim_id)
                    .with_details(json!({
                        "status": verdict,
                        "errors": report.error_count(),
                        "warnings": report.warning_count(),
                    })),
            )
            .await;

        Ok(ScrubOutcome {
            claim_id,
            status: verdict,
            errors: report.error_count(),
            warnings: report.warning_count(),
            infos: report.info_count(),
            issues: report.issues,
        })
    }

    /// Submits a `ready` claim to the payer
    #[instrument(skip(self, ctx), fields(tenant = %ctx.tenant_id, claim = %claim_id))]
    pub async fn submit(&self, ctx: &TenantContext, claim_id: ClaimId) -> Result<Claim, ClaimError> {
        let mut claim = self
            .claims
            .get(ctx.tenant_id, claim_id)
            .await?
            .ok_or_else(|| ClaimError::not_found("claim"))?;

        if claim.status != ClaimStatus::Ready {
            return Err(ClaimError::invalid_state(
                "submit",
                format!("{:?}", claim.status),
            ));
        }

        let now = Utc::now();
        claim.status = ClaimStatus::Submitted;
        claim.submitted_at = Some(now);
        claim.submitted_by = Some(ctx.actor.clone());
        claim.age_in_days = Some(0);
        claim.age_bucket = Some(AgeBucket::Days0To30);
        claim.updated_at = now;
        self.claims.update(&claim).await?;

        info!(claim = %claim_id, "claim submitted");
        self.audit
            .append(
                AuditEvent::new(ctx, "claim.submit", ResourceKind::Claim).with_resource(claim_id),
            )
            .await;
        Ok(claim)
    }

    /// Moves a claim to an adjudication outcome, unconditionally
    ///
    /// Manual-override path: no predecessor check, any outcome may be applied
    /// from any current status (a payer can reverse its own adjudication).
    #[instrument(skip(self, ctx), fields(tenant = %ctx.tenant_id, claim = %claim_id))]
    pub async fn update_status(
        &self,
        ctx: &TenantContext,
        claim_id: ClaimId,
        outcome: AdjudicationOutcome,
        paid_amount: Option<Money>,
        adjustments: Option<Money>,
    ) -> Result<Claim, ClaimError> {
        let mut claim = self
            .claims
            .get(ctx.tenant_id, claim_id)
            .await?
            .ok_or_else(|| ClaimError::not_found("claim"))?;

        let now = Utc::now();
        claim.status = outcome.into();
        match outcome {
            AdjudicationOutcome::Accepted => claim.accepted_at = Some(now),
            AdjudicationOutcome::Paid => claim.paid_at = Some(now),
            _ => {}
        }
        if let Some(paid) = paid_amount {
            claim.total_paid = Some(paid);
        }
        if let Some(adj) = adjustments {
            claim.adjustments = Some(adj);
        }
        claim.updated_at = now;
        self.claims.update(&claim).await?;

        self.audit
            .append(
                AuditEvent::new(ctx, "claim.update_status", ResourceKind::Claim)
                    .with_resource(claim_id)
                    .with_details(json!({ "status": claim.status })),
            )
            .await;
        Ok(claim)
    }

    /// Recomputes and persists the claim's age fields
    ///
    /// A no-op returning the stored values when the claim was never submitted
    /// or its age is frozen (paid/denied).
    #[instrument(skip(self, ctx), fields(tenant = %ctx.tenant_id, claim = %claim_id))]
    pub async fn recalculate_age(
        &self,
        ctx: &TenantContext,
        claim_id: ClaimId,
    ) -> Result<AgeSnapshot, ClaimError> {
        let mut claim = self
            .claims
            .get(ctx.tenant_id, claim_id)
            .await?
            .ok_or_else(|| ClaimError::not_found("claim"))?;

        let Some(submitted_at) = claim.submitted_at else {
            return Ok(AgeSnapshot {
                age_in_days: claim.age_in_days,
                age_bucket: claim.age_bucket,
            });
        };
        if claim.status.is_terminal_for_aging() {
            return Ok(AgeSnapshot {
                age_in_days: claim.age_in_days,
                age_bucket: claim.age_bucket,
            });
        }

        let days = Claim::age_days_since(submitted_at, Utc::now());
        let bucket = AgeBucket::from_days(days);
        claim.age_in_days = Some(days);
        claim.age_bucket = Some(bucket);
        claim.updated_at = Utc::now();
        self.claims.update(&claim).await?;

        Ok(AgeSnapshot {
            age_in_days: Some(days),
            age_bucket: Some(bucket),
        })
    }
}
