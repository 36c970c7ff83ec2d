//! Remittance batch and line-item entities
//!
//! A batch is created whole by ingestion; individual line items are mutated
//! in place by exception resolution, and the match rate is recomputed from
//! the current line-item set on every mutation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{BatchId, ClaimId, Money, TenantId};
use domain_claims::Claim;

/// Outcome of matching one line item against the claim corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Linked to a claim with reconciling amounts
    Matched,
    /// No claim carries the line item's claim number
    Unmatched,
    /// Needs manual attention: amounts do not reconcile, or the claim
    /// number is ambiguous within the tenant
    Exception,
}

impl MatchStatus {
    /// Statuses a manual resolution may act on
    pub fn is_resolvable(&self) -> bool {
        matches!(self, MatchStatus::Exception | MatchStatus::Unmatched)
    }
}

/// How an exception is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Post the item's paid amount as-is
    Accept,
    /// Link the item without posting a payment
    Reject,
    /// Post a corrected amount
    Adjust,
}

/// A line item as it arrives from the payer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemInput {
    pub claim_number: String,
    pub patient_name: Option<String>,
    pub charged_amount: Money,
    pub paid_amount: Money,
    pub adjustment_amount: Option<Money>,
    pub remark_codes: Option<Vec<String>>,
}

/// A stored line item with its match classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemittanceLineItem {
    pub claim_number: String,
    pub patient_name: Option<String>,
    pub charged_amount: Money,
    pub paid_amount: Money,
    pub adjustment_amount: Option<Money>,
    pub remark_codes: Option<Vec<String>>,
    /// The linked (or candidate) claim, when one was identified
    pub matched_claim_id: Option<ClaimId>,
    pub match_status: MatchStatus,
}

impl RemittanceLineItem {
    /// Paid plus adjustment - what the payer accounted for
    pub fn total_accounted(&self) -> Money {
        self.paid_amount + self.adjustment_amount.unwrap_or_else(Money::zero)
    }
}

/// A payer remittance advice (ERA) batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemittanceBatch {
    pub id: BatchId,
    pub tenant_id: TenantId,
    pub payer_id: String,
    pub payer_name: String,
    pub check_number: String,
    pub check_amount: Money,
    /// Line items in file order
    pub line_items: Vec<RemittanceLineItem>,
    /// Percentage of items currently matched, 2 decimals
    pub match_rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RemittanceBatch {
    /// Recomputes the match rate from the current line-item set
    pub fn recompute_match_rate(&mut self) {
        self.match_rate = match_rate(&self.line_items);
    }
}

/// Percentage of matched items, rounded to 2 decimals; zero for an empty set
pub fn match_rate(items: &[RemittanceLineItem]) -> Decimal {
    if items.is_empty() {
        return dec!(0);
    }
    let matched = items
        .iter()
        .filter(|i| i.match_status == MatchStatus::Matched)
        .count();
    (Decimal::from(matched) / Decimal::from(items.len()) * dec!(100)).round_dp(2)
}

/// Classifies a line item against the claims carrying its claim number
///
/// Zero candidates is unmatched. More than one is an exception: the claim
/// number is ambiguous within the tenant and no link is made silently. A
/// single candidate matches when its billed total equals the item's charged
/// amount and paid + adjustment accounts for that charge, both at cent
/// tolerance; otherwise the item is an exception with the candidate recorded.
pub fn classify(input: &LineItemInput, candidates: &[Claim]) -> RemittanceLineItem {
    let (match_status, matched_claim_id) = match candidates {
        [] => (MatchStatus::Unmatched, None),
        [claim] => {
            let charged_matches = claim.total_charged.reconciles_with(input.charged_amount);
            let total_accounted =
                input.paid_amount + input.adjustment_amount.unwrap_or_else(Money::zero);
            let amounts_reconcile =
                charged_matches && total_accounted.reconciles_with(input.charged_amount);
            if amounts_reconcile {
                (MatchStatus::Matched, Some(claim.id))
            } else {
                (MatchStatus::Exception, Some(claim.id))
            }
        }
        _ => (MatchStatus::Exception, None),
    };
    RemittanceLineItem {
        claim_number: input.claim_number.clone(),
        patient_name: input.patient_name.clone(),
        charged_amount: input.charged_amount,
        paid_amount: input.paid_amount,
        adjustment_amount: input.adjustment_amount,
        remark_codes: input.remark_codes.clone(),
        matched_claim_id,
        match_status,
    }
}
