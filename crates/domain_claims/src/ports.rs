//! Claim-side ports
//!
//! The transactional document store, the practice directory, and the
//! reference-data providers are external collaborators; each is reached
//! through a port trait. All reads are tenant-scoped: a document owned by
//! another tenant is indistinguishable from a missing one.

use async_trait::async_trait;

use core_kernel::{
    AppointmentId, ClaimId, CoreError, PatientId, PracticeId, TenantId,
};

use crate::appeal::Appeal;
use crate::claim::Claim;
use crate::denial::Denial;
use crate::scrub::{FeeSchedule, PayerRuleSet};

/// Claim persistence
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Inserts a new claim
    async fn insert(&self, claim: Claim) -> Result<ClaimId, CoreError>;

    /// Loads a claim by id within the tenant
    async fn get(&self, tenant: TenantId, id: ClaimId) -> Result<Option<Claim>, CoreError>;

    /// Writes back a loaded claim (last-write-wins)
    async fn update(&self, claim: &Claim) -> Result<(), CoreError>;

    /// All claims in the tenant carrying the given claim number
    async fn find_by_claim_number(
        &self,
        tenant: TenantId,
        claim_number: &str,
    ) -> Result<Vec<Claim>, CoreError>;

    /// All claims in the tenant
    async fn list(&self, tenant: TenantId) -> Result<Vec<Claim>, CoreError>;
}

/// Practice/patient/appointment ownership lookups
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn practice_exists(&self, tenant: TenantId, id: PracticeId) -> Result<bool, CoreError>;

    async fn patient_exists(&self, tenant: TenantId, id: PatientId) -> Result<bool, CoreError>;

    async fn appointment_exists(
        &self,
        tenant: TenantId,
        id: AppointmentId,
    ) -> Result<bool, CoreError>;
}

/// Read-only payer-rule reference data
#[async_trait]
pub trait PayerRuleProvider: Send + Sync {
    /// The rule set for a payer, if one is configured
    async fn lookup(
        &self,
        tenant: TenantId,
        payer_id: &str,
    ) -> Result<Option<PayerRuleSet>, CoreError>;
}

/// Read-only fee-schedule reference data
#[async_trait]
pub trait FeeScheduleProvider: Send + Sync {
    /// All schedules configured for a practice
    async fn lookup(
        &self,
        tenant: TenantId,
        practice_id: PracticeId,
    ) -> Result<Vec<FeeSchedule>, CoreError>;
}

/// Denial history reads
#[async_trait]
pub trait DenialStore: Send + Sync {
    async fn list(&self, tenant: TenantId) -> Result<Vec<Denial>, CoreError>;
}

/// Appeal history reads
#[async_trait]
pub trait AppealStore: Send + Sync {
    async fn list(&self, tenant: TenantId) -> Result<Vec<Appeal>, CoreError>;
}
