//! Per-payer behavior statistics
//!
//! Aggregates the non-pre-determination claim corpus per payer: volumes,
//! denial and appeal rates, and average days to payment, with flags for
//! slow-paying and high-denial payers.

use std::collections::{HashMap, HashSet};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::ClaimId;
use domain_claims::{Appeal, Claim, ClaimStatus};

/// Behavioral flag raised on a payer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayerFlag {
    /// Average days to pay above 45
    Slow,
    /// Denial rate above 10%
    HighDenial,
}

/// Aggregated statistics for one payer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerBehavior {
    pub payer_id: String,
    pub payer_name: String,
    pub total_claims: usize,
    pub paid_claims: usize,
    pub denied_claims: usize,
    /// Claims with at least one linked appeal
    pub appealed_claims: usize,
    /// Claims with at least one won or partially won appeal
    pub appeal_wins: usize,
    /// Rounded mean days from submission to payment; None when no paid claim
    /// carries both timestamps
    pub avg_days_to_pay: Option<i64>,
    /// Percentage, 2 decimals
    pub denial_rate: Decimal,
    /// Percentage, 2 decimals; None when no claim was appealed
    pub appeal_success_rate: Option<Decimal>,
    pub flags: Vec<PayerFlag>,
}

/// Builds per-payer behavior rows, sorted by claim volume descending
/// (ties broken by payer id for stable output)
pub fn build_payer_behavior(claims: &[Claim], appeals: &[Appeal]) -> Vec<PayerBehavior> {
    let mut appealed: HashSet<ClaimId> = HashSet::new();
    let mut won: HashSet<ClaimId> = HashSet::new();
    for appeal in appeals {
        appealed.insert(appeal.claim_id);
        if appeal.status.is_win() {
            won.insert(appeal.claim_id);
        }
    }

    struct Accum<'a> {
        payer_name: &'a str,
        total: usize,
        paid: usize,
        denied: usize,
        appealed: usize,
        wins: usize,
        pay_days: Vec<Decimal>,
    }

    let mut per_payer: HashMap<&str, Accum<'_>> = HashMap::new();
    for claim in claims {
        if claim.is_pre_determination {
            continue;
        }
        let acc = per_payer
            .entry(claim.payer_id.as_str())
            .or_insert_with(|| Accum {
                payer_name: claim.payer_name.as_str(),
                total: 0,
                paid: 0,
                denied: 0,
                appealed: 0,
                wins: 0,
                pay_days: Vec::new(),
            });
        acc.total += 1;
        match claim.status {
            ClaimStatus::Paid => acc.paid += 1,
            ClaimStatus::Denied => acc.denied += 1,
            _ => {}
        }
        if claim.status == ClaimStatus::Paid {
            if let (Some(submitted), Some(paid)) = (claim.submitted_at, claim.paid_at) {
                acc.pay_days.push(Decimal::from((paid - submitted).num_days()));
            }
        }
        if appealed.contains(&claim.id) {
            acc.appealed += 1;
        }
        if won.contains(&claim.id) {
            acc.wins += 1;
        }
    }

    let mut rows: Vec<PayerBehavior> = per_payer
        .into_iter()
        .map(|(payer_id, acc)| {
            let avg_days_to_pay = if acc.pay_days.is_empty() {
                None
            } else {
                let mean =
                    acc.pay_days.iter().sum::<Decimal>() / Decimal::from(acc.pay_days.len());
                Some(mean.round_dp(0).to_i64().unwrap_or(0))
            };
            let denial_rate = if acc.total == 0 {
                dec!(0)
            } else {
                (Decimal::from(acc.denied) / Decimal::from(acc.total) * dec!(100)).round_dp(2)
            };
            let appeal_success_rate = if acc.appealed == 0 {
                None
            } else {
                Some(
                    (Decimal::from(acc.wins) / Decimal::from(acc.appealed) * dec!(100))
                        .round_dp(2),
                )
            };
            let mut flags = Vec::new();
            if avg_days_to_pay.is_some_and(|d| d > 45) {
                flags.push(PayerFlag::Slow);
            }
            if denial_rate > dec!(10) {
                flags.push(PayerFlag::HighDenial);
            }
            PayerBehavior {
                payer_id: payer_id.to_string(),
                payer_name: acc.payer_name.to_string(),
                total_claims: acc.total,
                paid_claims: acc.paid,
                denied_claims: acc.denied,
                appealed_claims: acc.appealed,
                appeal_wins: acc.wins,
                avg_days_to_pay,
                denial_rate,
                appeal_success_rate,
                flags,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_claims
            .cmp(&a.total_claims)
            .then_with(|| a.payer_id.cmp(&b.payer_id))
    });
    rows
}
