//! Remittance-side ports

use async_trait::async_trait;

use core_kernel::{BatchId, CoreError, TenantId};

use crate::batch::RemittanceBatch;
use crate::payment::PaymentRecord;

/// Remittance batch persistence
#[async_trait]
pub trait RemittanceStore: Send + Sync {
    async fn insert(&self, batch: RemittanceBatch) -> Result<BatchId, CoreError>;

    async fn get(&self, tenant: TenantId, id: BatchId)
        -> Result<Option<RemittanceBatch>, CoreError>;

    /// Writes back a loaded batch
    async fn update(&self, batch: &RemittanceBatch) -> Result<(), CoreError>;

    /// Dedupe lookup: an already-ingested batch for this payer and check
    async fn find_by_check(
        &self,
        tenant: TenantId,
        payer_id: &str,
        check_number: &str,
    ) -> Result<Option<RemittanceBatch>, CoreError>;
}

/// Downstream payment sink; records are not read back by the core
#[async_trait]
pub trait PaymentSink: Send + Sync {
    async fn post(&self, payment: PaymentRecord) -> Result<(), CoreError>;
}
