//! Remittance reconciliation tests against the in-memory store

use std::sync::Arc;

use rust_decimal_macros::dec;

use core_kernel::{ClaimId, Money, TenantContext, TenantId};
use domain_claims::ports::ClaimStore;
use domain_claims::ClaimStatus;
use domain_remittance::ports::RemittanceStore;
use domain_remittance::{
    BulkResolveItem, IngestInput, MatchStatus, RemittanceError, RemittanceReconciler, Resolution,
};
use infra_memstore::{InMemoryStore, RecordingAuditSink, RecordingPaymentSink};
use test_utils::{ClaimBuilder, LineItemBuilder};

struct Harness {
    store: Arc<InMemoryStore>,
    payments: Arc<RecordingPaymentSink>,
    reconciler: RemittanceReconciler,
    ctx: TenantContext,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let payments = Arc::new(RecordingPaymentSink::new());
    let audit = Arc::new(RecordingAuditSink::new());
    let reconciler = RemittanceReconciler::new(store.clone(), store.clone(), payments.clone(), audit);
    let ctx = TenantContext::new(TenantId::new(), "poster");
    Harness {
        store,
        payments,
        reconciler,
        ctx,
    }
}

fn ingest_input(check_number: &str, items: Vec<domain_remittance::LineItemInput>) -> IngestInput {
    let check_amount = items.iter().map(|i| i.paid_amount).sum();
    IngestInput {
        payer_id: "delta-dental".to_string(),
        payer_name: "Delta Dental".to_string(),
        check_number: check_number.to_string(),
        check_amount,
        line_items: items,
    }
}

async fn stored_claim(h: &Harness, id: ClaimId) -> domain_claims::Claim {
    ClaimStore::get(h.store.as_ref(), h.ctx.tenant_id, id)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn test_matched_item_pays_claim() {
    // Charged 300, payer pays 250 and adjusts 50 off: fully accounted
    let h = harness();
    let claim = ClaimBuilder::new()
        .tenant(h.ctx.tenant_id)
        .charged(dec!(300))
        .build();
    h.store.seed_claim(claim.clone());

    let item = LineItemBuilder::new(&claim.claim_number)
        .charged(dec!(300))
        .paid(dec!(250))
        .adjustment(dec!(50))
        .build();
    let summary = h
        .reconciler
        .ingest(&h.ctx, ingest_input("CHK-1001", vec![item]))
        .await
        .unwrap();

    assert_eq!(summary.matched, 1);
    assert_eq!(summary.match_rate, dec!(100));

    let stored = stored_claim(&h, claim.id).await;
    assert_eq!(stored.status, ClaimStatus::Paid);
    assert_eq!(stored.total_paid, Some(Money::new(dec!(250))));
    assert_eq!(stored.adjustments, Some(Money::new(dec!(50))));
    assert!(stored.paid_at.is_some());

    let posted = h.payments.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].claim_id, claim.id);
    assert_eq!(posted[0].amount, Money::new(dec!(250)));
}

#[tokio::test]
async fn test_unknown_claim_number_is_unmatched() {
    let h = harness();
    let item = LineItemBuilder::new("CLM-does-not-exist").build();
    let summary = h
        .reconciler
        .ingest(&h.ctx, ingest_input("CHK-1002", vec![item]))
        .await
        .unwrap();

    assert_eq!(summary.unmatched, 1);
    assert_eq!(summary.matched, 0);
    assert_eq!(summary.match_rate, dec!(0));
    assert!(h.payments.posted().is_empty());
}

#[tokio::test]
async fn test_unreconciled_amounts_are_exception() {
    // Paid + adjustment (200) falls short of the 300 charge
    let h = harness();
    let claim = ClaimBuilder::new()
        .tenant(h.ctx.tenant_id)
        .charged(dec!(300))
        .build();
    h.store.seed_claim(claim.clone());

    let item = LineItemBuilder::new(&claim.claim_number)
        .charged(dec!(300))
        .paid(dec!(200))
        .build();
    let summary = h
        .reconciler
        .ingest(&h.ctx, ingest_input("CHK-1003", vec![item]))
        .await
        .unwrap();

    assert_eq!(summary.exceptions, 1);
    assert!(h.payments.posted().is_empty());

    // The candidate is recorded but the claim is untouched
    let batch = RemittanceStore::get(h.store.as_ref(), h.ctx.tenant_id, summary.batch_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(batch.line_items[0].match_status, MatchStatus::Exception);
    assert_eq!(batch.line_items[0].matched_claim_id, Some(claim.id));
    let stored = stored_claim(&h, claim.id).await;
    assert_eq!(stored.status, ClaimStatus::Submitted);
}

#[tokio::test]
async fn test_ambiguous_claim_number_is_exception_without_link() {
    let h = harness();
    let first = ClaimBuilder::new()
        .tenant(h.ctx.tenant_id)
        .claim_number("CLM-SHARED")
        .build();
    let second = ClaimBuilder::new()
        .tenant(h.ctx.tenant_id)
        .claim_number("CLM-SHARED")
        .build();
    h.store.seed_claim(first);
    h.store.seed_claim(second);

    let item = LineItemBuilder::new("CLM-SHARED").build();
    let summary = h
        .reconciler
        .ingest(&h.ctx, ingest_input("CHK-1004", vec![item]))
        .await
        .unwrap();

    assert_eq!(summary.exceptions, 1);
    let batch = RemittanceStore::get(h.store.as_ref(), h.ctx.tenant_id, summary.batch_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(batch.line_items[0].matched_claim_id, None);
    assert!(h.payments.posted().is_empty());
}

#[tokio::test]
async fn test_duplicate_check_is_rejected() {
    let h = harness();
    let claim = ClaimBuilder::new().tenant(h.ctx.tenant_id).build();
    h.store.seed_claim(claim.clone());

    let first = ingest_input("CHK-1005", vec![LineItemBuilder::matching(&claim).build()]);
    h.reconciler.ingest(&h.ctx, first.clone()).await.unwrap();

    let err = h.reconciler.ingest(&h.ctx, first).await.unwrap_err();
    assert!(matches!(err, RemittanceError::DuplicateBatch { .. }));
    // Redelivery posted nothing new
    assert_eq!(h.payments.posted().len(), 1);
}

#[tokio::test]
async fn test_other_tenant_claims_are_invisible() {
    let h = harness();
    let foreign = ClaimBuilder::new().build(); // different tenant
    h.store.seed_claim(foreign.clone());

    let item = LineItemBuilder::matching(&foreign).build();
    let summary = h
        .reconciler
        .ingest(&h.ctx, ingest_input("CHK-1006", vec![item]))
        .await
        .unwrap();
    assert_eq!(summary.unmatched, 1);
}

#[tokio::test]
async fn test_resolve_accept_posts_payment() {
    let h = harness();
    let claim = ClaimBuilder::new()
        .tenant(h.ctx.tenant_id)
        .charged(dec!(300))
        .adjustments(dec!(12))
        .build();
    h.store.seed_claim(claim.clone());

    let item = LineItemBuilder::new(&claim.claim_number)
        .charged(dec!(300))
        .paid(dec!(200))
        .build();
    let summary = h
        .reconciler
        .ingest(&h.ctx, ingest_input("CHK-1007", vec![item]))
        .await
        .unwrap();
    assert_eq!(summary.exceptions, 1);

    h.reconciler
        .resolve_exception(&h.ctx, summary.batch_id, 0, claim.id, Resolution::Accept, None)
        .await
        .unwrap();

    let batch = RemittanceStore::get(h.store.as_ref(), h.ctx.tenant_id, summary.batch_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(batch.line_items[0].match_status, MatchStatus::Matched);
    assert_eq!(batch.match_rate, dec!(100));

    let stored = stored_claim(&h, claim.id).await;
    assert_eq!(stored.status, ClaimStatus::Paid);
    assert_eq!(stored.total_paid, Some(Money::new(dec!(200))));
    // Manual resolution leaves previously stored adjustments alone
    assert_eq!(stored.adjustments, Some(Money::new(dec!(12))));
    assert_eq!(h.payments.posted().len(), 1);
}

#[tokio::test]
async fn test_resolve_adjust_posts_corrected_amount() {
    let h = harness();
    let claim = ClaimBuilder::new()
        .tenant(h.ctx.tenant_id)
        .charged(dec!(300))
        .build();
    h.store.seed_claim(claim.clone());

    let item = LineItemBuilder::new(&claim.claim_number)
        .charged(dec!(300))
        .paid(dec!(200))
        .build();
    let summary = h
        .reconciler
        .ingest(&h.ctx, ingest_input("CHK-1008", vec![item]))
        .await
        .unwrap();

    h.reconciler
        .resolve_exception(
            &h.ctx,
            summary.batch_id,
            0,
            claim.id,
            Resolution::Adjust,
            Some(Money::new(dec!(180))),
        )
        .await
        .unwrap();

    let stored = stored_claim(&h, claim.id).await;
    assert_eq!(stored.total_paid, Some(Money::new(dec!(180))));
    let posted = h.payments.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].amount, Money::new(dec!(180)));
}

#[tokio::test]
async fn test_resolve_reject_links_without_payment() {
    let h = harness();
    let claim = ClaimBuilder::new()
        .tenant(h.ctx.tenant_id)
        .charged(dec!(300))
        .build();
    h.store.seed_claim(claim.clone());

    let item = LineItemBuilder::new(&claim.claim_number)
        .charged(dec!(300))
        .paid(dec!(200))
        .build();
    let summary = h
        .reconciler
        .ingest(&h.ctx, ingest_input("CHK-1009", vec![item]))
        .await
        .unwrap();

    h.reconciler
        .resolve_exception(&h.ctx, summary.batch_id, 0, claim.id, Resolution::Reject, None)
        .await
        .unwrap();

    let batch = RemittanceStore::get(h.store.as_ref(), h.ctx.tenant_id, summary.batch_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(batch.line_items[0].match_status, MatchStatus::Matched);
    assert_eq!(batch.line_items[0].matched_claim_id, Some(claim.id));
    // Rejected: no payment, claim status unchanged
    assert!(h.payments.posted().is_empty());
    let stored = stored_claim(&h, claim.id).await;
    assert_eq!(stored.status, ClaimStatus::Submitted);
}

#[tokio::test]
async fn test_resolve_adjust_requires_amount() {
    let h = harness();
    let err = h
        .reconciler
        .resolve_exception(
            &h.ctx,
            core_kernel::BatchId::new(),
            0,
            ClaimId::new(),
            Resolution::Adjust,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RemittanceError::Validation(_)));
}

#[tokio::test]
async fn test_resolve_matched_item_is_invalid_state() {
    let h = harness();
    let claim = ClaimBuilder::new().tenant(h.ctx.tenant_id).build();
    h.store.seed_claim(claim.clone());

    let summary = h
        .reconciler
        .ingest(
            &h.ctx,
            ingest_input("CHK-1010", vec![LineItemBuilder::matching(&claim).build()]),
        )
        .await
        .unwrap();
    assert_eq!(summary.matched, 1);

    let err = h
        .reconciler
        .resolve_exception(&h.ctx, summary.batch_id, 0, claim.id, Resolution::Accept, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RemittanceError::InvalidState(_)));
}

#[tokio::test]
async fn test_resolve_bad_index_is_not_found() {
    let h = harness();
    let claim = ClaimBuilder::new().tenant(h.ctx.tenant_id).build();
    h.store.seed_claim(claim.clone());
    let summary = h
        .reconciler
        .ingest(
            &h.ctx,
            ingest_input("CHK-1011", vec![LineItemBuilder::new("CLM-missing").build()]),
        )
        .await
        .unwrap();

    let err = h
        .reconciler
        .resolve_exception(&h.ctx, summary.batch_id, 9, claim.id, Resolution::Accept, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RemittanceError::NotFound(_)));
}

#[tokio::test]
async fn test_resolve_unknown_claim_is_not_found() {
    let h = harness();
    let summary = h
        .reconciler
        .ingest(
            &h.ctx,
            ingest_input("CHK-1012", vec![LineItemBuilder::new("CLM-missing").build()]),
        )
        .await
        .unwrap();

    let err = h
        .reconciler
        .resolve_exception(
            &h.ctx,
            summary.batch_id,
            0,
            ClaimId::new(),
            Resolution::Accept,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RemittanceError::NotFound(_)));
}

#[tokio::test]
async fn test_bulk_resolve_skips_bad_entries() {
    let h = harness();
    let claim = ClaimBuilder::new()
        .tenant(h.ctx.tenant_id)
        .charged(dec!(300))
        .build();
    h.store.seed_claim(claim.clone());

    let items = vec![
        LineItemBuilder::new(&claim.claim_number)
            .charged(dec!(300))
            .paid(dec!(200))
            .build(),
        LineItemBuilder::new("CLM-missing").build(),
    ];
    let summary = h
        .reconciler
        .ingest(&h.ctx, ingest_input("CHK-1013", items))
        .await
        .unwrap();

    let outcome = h
        .reconciler
        .bulk_resolve(
            &h.ctx,
            vec![
                BulkResolveItem {
                    batch_id: summary.batch_id,
                    line_index: 0,
                    claim_id: claim.id,
                },
                // Out-of-range index: skipped, not fatal
                BulkResolveItem {
                    batch_id: summary.batch_id,
                    line_index: 7,
                    claim_id: claim.id,
                },
            ],
            Resolution::Accept,
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.resolved, 1);
    assert_eq!(outcome.total, 2);
    assert_eq!(h.payments.posted().len(), 1);
}

#[tokio::test]
async fn test_summary_match_rate_equals_stored_batch() {
    let h = harness();
    let claim = ClaimBuilder::new().tenant(h.ctx.tenant_id).build();
    h.store.seed_claim(claim.clone());

    let items = vec![
        LineItemBuilder::matching(&claim).build(),
        LineItemBuilder::new("CLM-missing").build(),
        LineItemBuilder::new("CLM-also-missing").build(),
    ];
    let summary = h
        .reconciler
        .ingest(&h.ctx, ingest_input("CHK-1014", items))
        .await
        .unwrap();

    let batch = RemittanceStore::get(h.store.as_ref(), h.ctx.tenant_id, summary.batch_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(summary.match_rate, batch.match_rate);
    assert_eq!(summary.match_rate, dec!(33.33));
}
