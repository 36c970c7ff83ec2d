//! A/R aging report
//!
//! Open claims are bucketed by days outstanding into two parallel ledgers:
//! the insurance-owed balance and the patient-owed portion.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Money, PracticeId};
use domain_claims::{AgeBucket, Claim};

/// Count and amount accumulated in one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BucketTotals {
    pub count: usize,
    pub total_amount: Money,
}

/// One ledger's aging buckets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAging {
    /// All five buckets, always present, in ascending age order
    pub buckets: BTreeMap<AgeBucket, BucketTotals>,
    pub total: Money,
}

impl LedgerAging {
    fn empty() -> Self {
        let buckets = AgeBucket::all()
            .into_iter()
            .map(|b| (b, BucketTotals::default()))
            .collect();
        Self {
            buckets,
            total: Money::zero(),
        }
    }

    fn tally(&mut self, bucket: AgeBucket, amount: Money) {
        let slot = self.buckets.entry(bucket).or_default();
        slot.count += 1;
        slot.total_amount += amount;
        self.total += amount;
    }

    fn round_to_cents(&mut self) {
        for slot in self.buckets.values_mut() {
            slot.total_amount = slot.total_amount.round_to_cents();
        }
        self.total = self.total.round_to_cents();
    }

    /// Bucket accessor, mainly for assertions
    pub fn bucket(&self, bucket: AgeBucket) -> BucketTotals {
        self.buckets.get(&bucket).copied().unwrap_or_default()
    }
}

/// The full aging report: insurance and patient ledgers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingReport {
    pub insurance: LedgerAging,
    pub patient: LedgerAging,
}

/// Effective bucket for a claim: recomputed from submission time when
/// available, else the stored bucket, else recomputed from creation time
fn effective_bucket(claim: &Claim, now: DateTime<Utc>) -> AgeBucket {
    if let Some(submitted_at) = claim.submitted_at {
        return AgeBucket::from_days(Claim::age_days_since(submitted_at, now));
    }
    if let Some(bucket) = claim.age_bucket {
        return bucket;
    }
    AgeBucket::from_days(Claim::age_days_since(claim.created_at, now))
}

/// Builds the aging report over a claim corpus
///
/// Only open-A/R, non-pre-determination claims participate; an optional
/// practice filter narrows the corpus. All amounts round to cents.
pub fn build_report(
    claims: &[Claim],
    practice_id: Option<PracticeId>,
    now: DateTime<Utc>,
) -> AgingReport {
    let mut insurance = LedgerAging::empty();
    let mut patient = LedgerAging::empty();

    for claim in claims {
        if !claim.status.is_open_receivable() || claim.is_pre_determination {
            continue;
        }
        if let Some(practice) = practice_id {
            if claim.practice_id != practice {
                continue;
            }
        }
        let bucket = effective_bucket(claim, now);
        insurance.tally(bucket, claim.insurance_balance());
        if claim.patient_portion.is_positive() {
            patient.tally(bucket, claim.patient_portion);
        }
    }

    insurance.round_to_cents();
    patient.round_to_cents();
    AgingReport { insurance, patient }
}
