//! Tenant-partitioned in-memory document store

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use core_kernel::{
    AppointmentId, BatchId, ClaimId, CoreError, PatientId, PracticeId, TenantId,
};
use domain_claims::ports::{
    AppealStore, ClaimStore, DenialStore, DirectoryStore, FeeScheduleProvider, PayerRuleProvider,
};
use domain_claims::{Appeal, Claim, Denial, FeeSchedule, PayerRuleSet};
use domain_remittance::ports::RemittanceStore;
use domain_remittance::RemittanceBatch;

#[derive(Default)]
struct Inner {
    claims: HashMap<ClaimId, Claim>,
    batches: HashMap<BatchId, RemittanceBatch>,
    denials: Vec<Denial>,
    appeals: Vec<Appeal>,
    practices: HashSet<(TenantId, PracticeId)>,
    patients: HashSet<(TenantId, PatientId)>,
    appointments: HashSet<(TenantId, AppointmentId)>,
    payer_rules: HashMap<(TenantId, String), PayerRuleSet>,
    fee_schedules: HashMap<(TenantId, PracticeId), Vec<FeeSchedule>>,
}

/// In-memory adapter behind every store and provider port
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    // Seeding helpers for tests and local runs

    pub fn register_practice(&self, tenant: TenantId, id: PracticeId) {
        self.write().practices.insert((tenant, id));
    }

    pub fn register_patient(&self, tenant: TenantId, id: PatientId) {
        self.write().patients.insert((tenant, id));
    }

    pub fn register_appointment(&self, tenant: TenantId, id: AppointmentId) {
        self.write().appointments.insert((tenant, id));
    }

    pub fn set_payer_rules(&self, tenant: TenantId, payer_id: impl Into<String>, rules: PayerRuleSet) {
        self.write().payer_rules.insert((tenant, payer_id.into()), rules);
    }

    pub fn set_fee_schedules(
        &self,
        tenant: TenantId,
        practice: PracticeId,
        schedules: Vec<FeeSchedule>,
    ) {
        self.write().fee_schedules.insert((tenant, practice), schedules);
    }

    pub fn seed_claim(&self, claim: Claim) {
        self.write().claims.insert(claim.id, claim);
    }

    pub fn seed_denial(&self, denial: Denial) {
        self.write().denials.push(denial);
    }

    pub fn seed_appeal(&self, appeal: Appeal) {
        self.write().appeals.push(appeal);
    }
}

#[async_trait]
impl ClaimStore for InMemoryStore {
    async fn insert(&self, claim: Claim) -> Result<ClaimId, CoreError> {
        let id = claim.id;
        self.write().claims.insert(id, claim);
        Ok(id)
    }

    async fn get(&self, tenant: TenantId, id: ClaimId) -> Result<Option<Claim>, CoreError> {
        Ok(self
            .read()
            .claims
            .get(&id)
            .filter(|c| c.tenant_id == tenant)
            .cloned())
    }

    async fn update(&self, claim: &Claim) -> Result<(), CoreError> {
        let mut inner = self.write();
        match inner.claims.get(&claim.id) {
            Some(existing) if existing.tenant_id == claim.tenant_id => {
                inner.claims.insert(claim.id, claim.clone());
                Ok(())
            }
            _ => Err(CoreError::not_found("claim")),
        }
    }

    async fn find_by_claim_number(
        &self,
        tenant: TenantId,
        claim_number: &str,
    ) -> Result<Vec<Claim>, CoreError> {
        let mut found: Vec<Claim> = self
            .read()
            .claims
            .values()
            .filter(|c| c.tenant_id == tenant && c.claim_number == claim_number)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn list(&self, tenant: TenantId) -> Result<Vec<Claim>, CoreError> {
        let mut found: Vec<Claim> = self
            .read()
            .claims
            .values()
            .filter(|c| c.tenant_id == tenant)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(found)
    }
}

#[async_trait]
impl DirectoryStore for InMemoryStore {
    async fn practice_exists(&self, tenant: TenantId, id: PracticeId) -> Result<bool, CoreError> {
        Ok(self.read().practices.contains(&(tenant, id)))
    }

    async fn patient_exists(&self, tenant: TenantId, id: PatientId) -> Result<bool, CoreError> {
        Ok(self.read().patients.contains(&(tenant, id)))
    }

    async fn appointment_exists(
        &self,
        tenant: TenantId,
        id: AppointmentId,
    ) -> Result<bool, CoreError> {
        Ok(self.read().appointments.contains(&(tenant, id)))
    }
}

#[async_trait]
impl PayerRuleProvider for InMemoryStore {
    async fn lookup(
        &self,
        tenant: TenantId,
        payer_id: &str,
    ) -> Result<Option<PayerRuleSet>, CoreError> {
        Ok(self
            .read()
            .payer_rules
            .get(&(tenant, payer_id.to_string()))
            .cloned())
    }
}

#[async_trait]
impl FeeScheduleProvider for InMemoryStore {
    async fn lookup(
        &self,
        tenant: TenantId,
        practice_id: PracticeId,
    ) -> Result<Vec<FeeSchedule>, CoreError> {
        Ok(self
            .read()
            .fee_schedules
            .get(&(tenant, practice_id))
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl DenialStore for InMemoryStore {
    async fn list(&self, tenant: TenantId) -> Result<Vec<Denial>, CoreError> {
        Ok(self
            .read()
            .denials
            .iter()
            .filter(|d| d.tenant_id == tenant)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AppealStore for InMemoryStore {
    async fn list(&self, tenant: TenantId) -> Result<Vec<Appeal>, CoreError> {
        Ok(self
            .read()
            .appeals
            .iter()
            .filter(|a| a.tenant_id == tenant)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RemittanceStore for InMemoryStore {
    async fn insert(&self, batch: RemittanceBatch) -> Result<BatchId, CoreError> {
        let id = batch.id;
        self.write().batches.insert(id, batch);
        Ok(id)
    }

    async fn get(
        &self,
        tenant: TenantId,
        id: BatchId,
    ) -> Result<Option<RemittanceBatch>, CoreError> {
        Ok(self
            .read()
            .batches
            .get(&id)
            .filter(|b| b.tenant_id == tenant)
            .cloned())
    }

    async fn update(&self, batch: &RemittanceBatch) -> Result<(), CoreError> {
        let mut inner = self.write();
        match inner.batches.get(&batch.id) {
            Some(existing) if existing.tenant_id == batch.tenant_id => {
                inner.batches.insert(batch.id, batch.clone());
                Ok(())
            }
            _ => Err(CoreError::not_found("batch")),
        }
    }

    async fn find_by_check(
        &self,
        tenant: TenantId,
        payer_id: &str,
        check_number: &str,
    ) -> Result<Option<RemittanceBatch>, CoreError> {
        Ok(self
            .read()
            .batches
            .values()
            .find(|b| {
                b.tenant_id == tenant && b.payer_id == payer_id && b.check_number == check_number
            })
            .cloned())
    }
}
