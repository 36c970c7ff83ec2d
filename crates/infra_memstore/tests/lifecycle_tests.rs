//! Claim lifecycle tests against the in-memory store

use std::sync::Arc;

use rust_decimal_macros::dec;

use core_kernel::{Money, PatientId, PracticeId, TenantContext, TenantId};
use domain_claims::ports::ClaimStore;
use domain_claims::{
    AdjudicationOutcome, AgeBucket, ClaimError, ClaimLifecycleManager, ClaimStatus,
    CreateClaimInput, Procedure,
};
use infra_memstore::{InMemoryStore, RecordingAuditSink};
use test_utils::ClaimBuilder;

struct Harness {
    store: Arc<InMemoryStore>,
    audit: Arc<RecordingAuditSink>,
    manager: ClaimLifecycleManager,
    ctx: TenantContext,
    practice: PracticeId,
    patient: PatientId,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let audit = Arc::new(RecordingAuditSink::new());
    let manager = ClaimLifecycleManager::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        audit.clone(),
    );
    let tenant = TenantId::new();
    let ctx = TenantContext::new(tenant, "dr-jones");
    let practice = PracticeId::new();
    let patient = PatientId::new();
    store.register_practice(tenant, practice);
    store.register_patient(tenant, patient);
    Harness {
        store,
        audit,
        manager,
        ctx,
        practice,
        patient,
    }
}

fn create_input(h: &Harness) -> CreateClaimInput {
    let mut procedure = Procedure::new("D2140", Money::new(dec!(150)));
    procedure.tooth = Some("14".to_string());
    CreateClaimInput {
        practice_id: h.practice,
        patient_id: h.patient,
        appointment_id: None,
        payer_id: "delta-dental".to_string(),
        payer_name: "Delta Dental".to_string(),
        procedures: vec![procedure],
        total_charged: Money::new(dec!(150)),
        patient_portion: Money::zero(),
        is_pre_determination: false,
    }
}

#[tokio::test]
async fn test_create_inserts_draft() {
    let h = harness();
    let claim = h.manager.create(&h.ctx, create_input(&h)).await.unwrap();
    assert_eq!(claim.status, ClaimStatus::Draft);
    assert!(claim.claim_number.starts_with("CLM-"));
    assert_eq!(claim.patient_id, Some(h.patient));
    assert!(h.audit.events().iter().any(|e| e.action == "claim.create"));
}

#[tokio::test]
async fn test_create_rejects_foreign_practice() {
    let h = harness();
    let mut input = create_input(&h);
    input.practice_id = PracticeId::new(); // not registered for the tenant
    let err = h.manager.create(&h.ctx, input).await.unwrap_err();
    assert!(matches!(err, ClaimError::NotFound(_)));
}

#[tokio::test]
async fn test_scrub_pass_then_submit() {
    let h = harness();
    let claim = h.manager.create(&h.ctx, create_input(&h)).await.unwrap();

    let outcome = h.manager.scrub(&h.ctx, claim.id).await.unwrap();
    assert_eq!(outcome.status, ClaimStatus::Ready);
    assert_eq!(outcome.errors, 0);

    let submitted = h.manager.submit(&h.ctx, claim.id).await.unwrap();
    assert_eq!(submitted.status, ClaimStatus::Submitted);
    assert_eq!(submitted.submitted_by.as_deref(), Some("dr-jones"));
    assert_eq!(submitted.age_in_days, Some(0));
    assert_eq!(submitted.age_bucket, Some(AgeBucket::Days0To30));
    assert!(submitted.submitted_at.is_some());
}

#[tokio::test]
async fn test_scrub_failure_blocks_submit() {
    let h = harness();
    let mut input = create_input(&h);
    input.procedures = vec![Procedure::new("D7140", Money::new(dec!(200)))];
    input.total_charged = Money::new(dec!(200));
    let claim = h.manager.create(&h.ctx, input).await.unwrap();

    let outcome = h.manager.scrub(&h.ctx, claim.id).await.unwrap();
    assert_eq!(outcome.status, ClaimStatus::ScrubFailed);
    assert!(outcome.errors > 0);

    let err = h.manager.submit(&h.ctx, claim.id).await.unwrap_err();
    assert!(matches!(err, ClaimError::InvalidState { .. }));

    // The failed submit mutated nothing
    let stored = ClaimStore::get(h.store.as_ref(), h.ctx.tenant_id, claim.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ClaimStatus::ScrubFailed);
    assert!(stored.submitted_at.is_none());
}

#[tokio::test]
async fn test_submit_requires_ready() {
    let h = harness();
    let claim = h.manager.create(&h.ctx, create_input(&h)).await.unwrap();
    // Draft, never scrubbed
    let err = h.manager.submit(&h.ctx, claim.id).await.unwrap_err();
    assert!(matches!(err, ClaimError::InvalidState { .. }));
}

#[tokio::test]
async fn test_scrub_has_no_prior_status_guard() {
    let h = harness();
    let claim = h.manager.create(&h.ctx, create_input(&h)).await.unwrap();
    h.manager.scrub(&h.ctx, claim.id).await.unwrap();
    h.manager.submit(&h.ctx, claim.id).await.unwrap();

    // Re-scrubbing a submitted claim is allowed and refreshes the verdict
    let outcome = h.manager.scrub(&h.ctx, claim.id).await.unwrap();
    assert_eq!(outcome.status, ClaimStatus::Ready);
}

#[tokio::test]
async fn test_update_status_is_unguarded() {
    let h = harness();
    let claim = h.manager.create(&h.ctx, create_input(&h)).await.unwrap();

    // Straight from draft to paid: the manual-override path has no guard
    let paid = h
        .manager
        .update_status(
            &h.ctx,
            claim.id,
            AdjudicationOutcome::Paid,
            Some(Money::new(dec!(120))),
            Some(Money::new(dec!(30))),
        )
        .await
        .unwrap();
    assert_eq!(paid.status, ClaimStatus::Paid);
    assert_eq!(paid.total_paid, Some(Money::new(dec!(120))));
    assert_eq!(paid.adjustments, Some(Money::new(dec!(30))));
    assert!(paid.paid_at.is_some());

    // And back again
    let rejected = h
        .manager
        .update_status(&h.ctx, claim.id, AdjudicationOutcome::Rejected, None, None)
        .await
        .unwrap();
    assert_eq!(rejected.status, ClaimStatus::Rejected);
}

#[tokio::test]
async fn test_recalculate_age_computes_bucket() {
    let h = harness();
    let claim = ClaimBuilder::new()
        .tenant(h.ctx.tenant_id)
        .submitted_days_ago(95)
        .build();
    h.store.seed_claim(claim.clone());

    let snapshot = h.manager.recalculate_age(&h.ctx, claim.id).await.unwrap();
    assert_eq!(snapshot.age_in_days, Some(95));
    assert_eq!(snapshot.age_bucket, Some(AgeBucket::Days91To120));
}

#[tokio::test]
async fn test_recalculate_age_frozen_when_paid() {
    let h = harness();
    let claim = ClaimBuilder::new()
        .tenant(h.ctx.tenant_id)
        .status(ClaimStatus::Paid)
        .submitted_days_ago(95)
        .build();
    let stored_bucket = claim.age_bucket;
    h.store.seed_claim(claim.clone());

    let snapshot = h.manager.recalculate_age(&h.ctx, claim.id).await.unwrap();
    assert_eq!(snapshot.age_in_days, claim.age_in_days);
    assert_eq!(snapshot.age_bucket, stored_bucket);
}

#[tokio::test]
async fn test_recalculate_age_noop_without_submission() {
    let h = harness();
    let claim = ClaimBuilder::new()
        .tenant(h.ctx.tenant_id)
        .status(ClaimStatus::Draft)
        .not_submitted()
        .build();
    h.store.seed_claim(claim.clone());

    let snapshot = h.manager.recalculate_age(&h.ctx, claim.id).await.unwrap();
    assert_eq!(snapshot.age_in_days, None);
}

#[tokio::test]
async fn test_foreign_tenant_claim_is_not_found() {
    let h = harness();
    let foreign = ClaimBuilder::new().build(); // different tenant
    h.store.seed_claim(foreign.clone());

    let err = h.manager.scrub(&h.ctx, foreign.id).await.unwrap_err();
    assert!(matches!(err, ClaimError::NotFound(_)));
}
