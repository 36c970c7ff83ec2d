//! Read-only analytics service
//!
//! Loads tenant-scoped snapshots through the claim-side ports and delegates
//! to the pure aggregation functions. Performs no writes; results may be
//! stale relative to concurrent mutations elsewhere.

use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use core_kernel::{CoreError, PracticeId, TenantContext};
use domain_claims::ports::{AppealStore, ClaimStore, DenialStore};

use crate::aging::{self, AgingReport};
use crate::payer_behavior::{self, PayerBehavior};
use crate::worklist::{self, WorklistEntry, DEFAULT_WORKLIST_LIMIT};

/// Analytics over the claim/denial/appeal corpus
pub struct ReceivablesAnalytics {
    claims: Arc<dyn ClaimStore>,
    denials: Arc<dyn DenialStore>,
    appeals: Arc<dyn AppealStore>,
}

impl ReceivablesAnalytics {
    pub fn new(
        claims: Arc<dyn ClaimStore>,
        denials: Arc<dyn DenialStore>,
        appeals: Arc<dyn AppealStore>,
    ) -> Self {
        Self {
            claims,
            denials,
            appeals,
        }
    }

    /// A/R aging buckets for the tenant, optionally narrowed to one practice
    #[instrument(skip(self, ctx), fields(tenant = %ctx.tenant_id))]
    pub async fn aging_report(
        &self,
        ctx: &TenantContext,
        practice_id: Option<PracticeId>,
    ) -> Result<AgingReport, CoreError> {
        let claims = self.claims.list(ctx.tenant_id).await?;
        Ok(aging::build_report(&claims, practice_id, Utc::now()))
    }

    /// Top claims to work next, by weighted score
    #[instrument(skip(self, ctx), fields(tenant = %ctx.tenant_id))]
    pub async fn prioritized_worklist(
        &self,
        ctx: &TenantContext,
        limit: Option<usize>,
    ) -> Result<Vec<WorklistEntry>, CoreError> {
        let claims = self.claims.list(ctx.tenant_id).await?;
        let denials = self.denials.list(ctx.tenant_id).await?;
        Ok(worklist::build_worklist(
            &claims,
            &denials,
            limit.unwrap_or(DEFAULT_WORKLIST_LIMIT),
            Utc::now(),
        ))
    }

    /// Per-payer behavior statistics
    #[instrument(skip(self, ctx), fields(tenant = %ctx.tenant_id))]
    pub async fn payer_behavior(&self, ctx: &TenantContext) -> Result<Vec<PayerBehavior>, CoreError> {
        let claims = self.claims.list(ctx.tenant_id).await?;
        let appeals = self.appeals.list(ctx.tenant_id).await?;
        Ok(payer_behavior::build_payer_behavior(&claims, &appeals))
    }
}
