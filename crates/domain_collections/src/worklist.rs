//! Prioritized collections worklist
//!
//! Each open claim gets a weighted score from a base of 50, adjusted for age,
//! billed amount, payer history, denial history, and appeal status, clamped
//! to [0, 100]. The score is a deterministic function of its inputs; the
//! rationale lists only the factors that actually fired.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, Money};
use domain_claims::{Claim, ClaimStatus, Denial};

pub const DEFAULT_WORKLIST_LIMIT: usize = 20;

/// Minimum claim count before payer history influences scoring
const PAYER_HISTORY_MIN_CLAIMS: usize = 3;

/// Per-payer history snapshot used by the scorer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayerHistory {
    pub total_claims: usize,
    /// Currently-denied claims over total, as a fraction
    pub denial_rate: Decimal,
    /// Mean days from submission to payment over paid claims carrying both
    /// timestamps; None when no claim qualifies
    pub avg_pay_days: Option<Decimal>,
}

/// One worklist row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorklistEntry {
    pub claim_id: ClaimId,
    pub claim_number: String,
    pub payer_name: String,
    pub status: ClaimStatus,
    pub age_days: i64,
    pub total_charged: Money,
    pub insurance_balance: Money,
    pub score: u8,
    pub rationale: String,
}

/// Builds payer history snapshots from the non-pre-determination corpus
pub fn payer_histories(claims: &[Claim]) -> HashMap<String, PayerHistory> {
    let mut totals: HashMap<&str, (usize, usize, Vec<Decimal>)> = HashMap::new();
    for claim in claims {
        if claim.is_pre_determination {
            continue;
        }
        let entry = totals.entry(claim.payer_id.as_str()).or_default();
        entry.0 += 1;
        if claim.status == ClaimStatus::Denied {
            entry.1 += 1;
        }
        if claim.status == ClaimStatus::Paid {
            if let (Some(submitted), Some(paid)) = (claim.submitted_at, claim.paid_at) {
                entry.2.push(Decimal::from((paid - submitted).num_days()));
            }
        }
    }
    totals
        .into_iter()
        .map(|(payer, (total, denied, pay_days))| {
            let denial_rate = if total == 0 {
                dec!(0)
            } else {
                Decimal::from(denied) / Decimal::from(total)
            };
            let avg_pay_days = if pay_days.is_empty() {
                None
            } else {
                Some(pay_days.iter().sum::<Decimal>() / Decimal::from(pay_days.len()))
            };
            (
                payer.to_string(),
                PayerHistory {
                    total_claims: total,
                    denial_rate,
                    avg_pay_days,
                },
            )
        })
        .collect()
}

/// Scores one claim; returns the clamped score and the triggered factors
pub fn score_claim(
    claim: &Claim,
    payer: Option<&PayerHistory>,
    has_denial_record: bool,
    now: DateTime<Utc>,
) -> (u8, Vec<String>) {
    let mut score: i32 = 50;
    let mut factors = Vec::new();

    let age_days = claim.effective_age_days(now);
    let age_points = if age_days > 90 {
        30
    } else if age_days > 60 {
        20
    } else if age_days > 30 {
        10
    } else {
        0
    };
    score += age_points;
    if age_points > 0 {
        factors.push(format!("aged {age_days} days"));
    }

    let charged = claim.total_charged;
    let amount_points = if charged >= Money::new(dec!(2000)) {
        20
    } else if charged >= Money::new(dec!(1000)) {
        15
    } else if charged >= Money::new(dec!(500)) {
        10
    } else {
        5
    };
    score += amount_points;
    factors.push(format!("balance {charged} (+{amount_points})"));

    if let Some(history) = payer {
        if history.total_claims >= PAYER_HISTORY_MIN_CLAIMS {
            if history.denial_rate > dec!(0.15) {
                score -= 10;
                let percent = (history.denial_rate * dec!(100)).round_dp(0);
                factors.push(format!("payer denial rate {percent}%"));
            }
            if history.avg_pay_days.is_some_and(|avg| avg > dec!(45)) {
                score -= 5;
                factors.push("slow-paying payer".to_string());
            }
        }
    }

    if claim.status == ClaimStatus::Denied || has_denial_record {
        score -= 10;
        factors.push("denial on file".to_string());
    }

    if claim.status == ClaimStatus::Appealed {
        score += 5;
        factors.push("under appeal".to_string());
    }

    (score.clamp(0, 100) as u8, factors)
}

/// Builds the prioritized worklist over the corpus
///
/// Sorted by score descending, ties broken by age descending; returns the
/// top `limit` entries.
pub fn build_worklist(
    claims: &[Claim],
    denials: &[Denial],
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<WorklistEntry> {
    let histories = payer_histories(claims);
    let denied_claims: HashSet<ClaimId> = denials.iter().map(|d| d.claim_id).collect();

    let mut entries: Vec<WorklistEntry> = claims
        .iter()
        .filter(|c| c.status.is_open_receivable() && !c.is_pre_determination)
        .map(|claim| {
            let (score, factors) = score_claim(
                claim,
                histories.get(&claim.payer_id),
                denied_claims.contains(&claim.id),
                now,
            );
            WorklistEntry {
                claim_id: claim.id,
                claim_number: claim.claim_number.clone(),
                payer_name: claim.payer_name.clone(),
                status: claim.status,
                age_days: claim.effective_age_days(now),
                total_charged: claim.total_charged,
                insurance_balance: claim.insurance_balance().round_to_cents(),
                score,
                rationale: factors.join("; "),
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.age_days.cmp(&a.age_days))
    });
    entries.truncate(limit);
    entries
}
