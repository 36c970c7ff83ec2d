//! Remittance reconciliation service
//!
//! `ingest` processes a batch's line items sequentially: the batch document
//! commits first with final per-item statuses, then claim patches and payment
//! posts apply per matched item with no rollback. The (payer, check number)
//! dedupe key makes redelivery of the same physical file safe.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument};

use core_kernel::{
    AuditEvent, AuditSink, BatchId, ClaimId, Money, ResourceKind, TenantContext,
};
use domain_claims::{ClaimStatus, ports::ClaimStore};

use crate::batch::{
    classify, match_rate, LineItemInput, MatchStatus, RemittanceBatch, Resolution,
};
use crate::error::RemittanceError;
use crate::payment::PaymentRecord;
use crate::ports::{PaymentSink, RemittanceStore};

/// Input for ingesting one remittance file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestInput {
    pub payer_id: String,
    pub payer_name: String,
    pub check_number: String,
    pub check_amount: Money,
    pub line_items: Vec<LineItemInput>,
}

/// Result of an ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSummary {
    pub batch_id: BatchId,
    pub total_items: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub exceptions: usize,
    pub match_rate: rust_decimal::Decimal,
}

/// One entry of a bulk resolution request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResolveItem {
    pub batch_id: BatchId,
    pub line_index: usize,
    pub claim_id: ClaimId,
}

/// Best-effort bulk result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResolveOutcome {
    pub resolved: usize,
    pub total: usize,
}

/// Service matching remittance line items to claims
pub struct RemittanceReconciler {
    batches: Arc<dyn RemittanceStore>,
    claims: Arc<dyn ClaimStore>,
    payments: Arc<dyn PaymentSink>,
    audit: Arc<dyn AuditSink>,
}

impl RemittanceReconciler {
    pub fn new(
        batches: Arc<dyn RemittanceStore>,
        claims: Arc<dyn ClaimStore>,
        payments: Arc<dyn PaymentSink>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            batches,
            claims,
            payments,
            audit,
        }
    }

    /// Ingests a remittance batch, matching each line item in file order
    #[instrument(skip(self, ctx, input), fields(tenant = %ctx.tenant_id, check = %input.check_number))]
    pub async fn ingest(
        &self,
        ctx: &TenantContext,
        input: IngestInput,
    ) -> Result<IngestSummary, RemittanceError> {
        let tenant = ctx.tenant_id;
        if self
            .batches
            .find_by_check(tenant, &input.payer_id, &input.check_number)
            .await?
            .is_some()
        {
            return Err(RemittanceError::DuplicateBatch {
                payer_id: input.payer_id,
                check_number: input.check_number,
            });
        }

        let mut line_items = Vec::with_capacity(input.line_items.len());
        for item in &input.line_items {
            let candidates = self
                .claims
                .find_by_claim_number(tenant, &item.claim_number)
                .await?;
            let classified = classify(item, &candidates);
            debug!(
                claim_number = %classified.claim_number,
                status = ?classified.match_status,
                "line item classified"
            );
            line_items.push(classified);
        }

        let now = Utc::now();
        let batch = RemittanceBatch {
            id: BatchId::new_v7(),
            tenant_id: tenant,
            payer_id: input.payer_id,
            payer_name: input.payer_name,
            check_number: input.check_number,
            check_amount: input.check_amount,
            match_rate: match_rate(&line_items),
            line_items,
            created_at: now,
            updated_at: now,
        };
        let batch_id = self.batches.insert(batch.clone()).await?;

        let mut matched = 0usize;
        let mut unmatched = 0usize;
        let mut exceptions = 0usize;
        for item in &batch.line_items {
            match item.match_status {
                MatchStatus::Matched => {
                    matched += 1;
                    if let Some(claim_id) = item.matched_claim_id {
                        self.post_paid(
                            ctx,
                            claim_id,
                            item.paid_amount,
                            Some(item.adjustment_amount),
                            Some(format!("ERA check {}", batch.check_number)),
                        )
                        .await?;
                    }
                }
                MatchStatus::Unmatched => unmatched += 1,
                MatchStatus::Exception => exceptions += 1,
            }
        }

        info!(batch = %batch_id, matched, unmatched, exceptions, "remittance ingested");
        self.audit
            .append(
                AuditEvent::new(ctx, "remittance.ingest", ResourceKind::RemittanceBatch)
                    .with_resource(batch_id)
                    .with_details(json!({
                        "items": batch.line_items.len(),
                        "matched": matched,
                        "match_rate": batch.match_rate,
                    })),
            )
            .await;

        Ok(IngestSummary {
            batch_id,
            total_items: batch.line_items.len(),
            matched,
            unmatched,
            exceptions,
            match_rate: batch.match_rate,
        })
    }

    /// Manually resolves one exception or unmatched line item
    #[instrument(skip(self, ctx), fields(tenant = %ctx.tenant_id, batch = %batch_id, index = line_index))]
    pub async fn resolve_exception(
        &self,
        ctx: &TenantContext,
        batch_id: BatchId,
        line_index: usize,
        claim_id: ClaimId,
        resolution: Resolution,
        adjusted_amount: Option<Money>,
    ) -> Result<(), RemittanceError> {
        if resolution == Resolution::Adjust && adjusted_amount.is_none() {
            return Err(RemittanceError::validation(
                "adjust resolution requires an adjusted amount",
            ));
        }
        self.resolve_one(ctx, batch_id, line_index, claim_id, resolution, adjusted_amount)
            .await?;
        self.audit
            .append(
                AuditEvent::new(ctx, "remittance.resolve", ResourceKind::RemittanceBatch)
                    .with_resource(batch_id)
                    .with_details(json!({ "line_index": line_index, "resolution": resolution })),
            )
            .await;
        Ok(())
    }

    /// Applies the same per-item resolution to each entry, best-effort
    ///
    /// Entries whose batch or claim is missing, tenant-mismatched, whose
    /// index is out of range, or whose item is not currently resolvable are
    /// skipped and excluded from the resolved count.
    #[instrument(skip(self, ctx, items), fields(tenant = %ctx.tenant_id, total = items.len()))]
    pub async fn bulk_resolve(
        &self,
        ctx: &TenantContext,
        items: Vec<BulkResolveItem>,
        resolution: Resolution,
        adjusted_amount: Option<Money>,
    ) -> Result<BulkResolveOutcome, RemittanceError> {
        if resolution == Resolution::Adjust && adjusted_amount.is_none() {
            return Err(RemittanceError::validation(
                "adjust resolution requires an adjusted amount",
            ));
        }
        let total = items.len();
        let mut resolved = 0usize;
        for entry in items {
            match self
                .resolve_one(
                    ctx,
                    entry.batch_id,
                    entry.line_index,
                    entry.claim_id,
                    resolution,
                    adjusted_amount,
                )
                .await
            {
                Ok(()) => resolved += 1,
                Err(err) => {
                    debug!(batch = %entry.batch_id, index = entry.line_index, %err, "bulk entry skipped");
                }
            }
        }
        self.audit
            .append(
                AuditEvent::new(ctx, "remittance.bulk_resolve", ResourceKind::RemittanceBatch)
                    .with_details(json!({ "resolved": resolved, "total": total })),
            )
            .await;
        Ok(BulkResolveOutcome { resolved, total })
    }

    /// Shared per-item resolution logic
    async fn resolve_one(
        &self,
        ctx: &TenantContext,
        batch_id: BatchId,
        line_index: usize,
        claim_id: ClaimId,
        resolution: Resolution,
        adjusted_amount: Option<Money>,
    ) -> Result<(), RemittanceError> {
        let tenant = ctx.tenant_id;
        let mut batch = self
            .batches
            .get(tenant, batch_id)
            .await?
            .ok_or_else(|| RemittanceError::not_found("batch"))?;
        let item = batch
            .line_items
            .get(line_index)
            .ok_or_else(|| RemittanceError::not_found("line item"))?;
        if !item.match_status.is_resolvable() {
            return Err(RemittanceError::invalid_state(format!(
                "line item is {:?}, not resolvable",
                item.match_status
            )));
        }
        // Claim must exist in the tenant before the item is re-linked
        if self.claims.get(tenant, claim_id).await?.is_none() {
            return Err(RemittanceError::not_found("claim"));
        }

        let paid_amount = match resolution {
            Resolution::Adjust => adjusted_amount
                .ok_or_else(|| RemittanceError::validation("adjusted amount required"))?,
            _ => item.paid_amount,
        };

        let item = &mut batch.line_items[line_index];
        item.matched_claim_id = Some(claim_id);
        item.match_status = MatchStatus::Matched;
        batch.recompute_match_rate();
        batch.updated_at = Utc::now();
        self.batches.update(&batch).await?;

        if matches!(resolution, Resolution::Accept | Resolution::Adjust) {
            self.post_paid(
                ctx,
                claim_id,
                paid_amount,
                None,
                Some(format!(
                    "Manual resolution of check {} line {}",
                    batch.check_number, line_index
                )),
            )
            .await?;
        }
        Ok(())
    }

    /// Marks the claim paid and posts the payment record
    ///
    /// `adjustments` of `None` leaves the stored adjustments untouched;
    /// `Some(value)` overwrites them with the line item's value, present or
    /// not, the way ingestion does.
    async fn post_paid(
        &self,
        ctx: &TenantContext,
        claim_id: ClaimId,
        paid_amount: Money,
        adjustments: Option<Option<Money>>,
        notes: Option<String>,
    ) -> Result<(), RemittanceError> {
        let tenant = ctx.tenant_id;
        let mut claim = self
            .claims
            .get(tenant, claim_id)
            .await?
            .ok_or_else(|| RemittanceError::not_found("claim"))?;
        let now = Utc::now();
        claim.status = ClaimStatus::Paid;
        claim.total_paid = Some(paid_amount);
        if let Some(adjustments) = adjustments {
            claim.adjustments = adjustments;
        }
        claim.paid_at = Some(now);
        claim.updated_at = now;
        self.claims.update(&claim).await?;

        self.payments
            .post(PaymentRecord::from_remittance(
                tenant, claim_id, paid_amount, notes,
            ))
            .await?;
        Ok(())
    }
}
