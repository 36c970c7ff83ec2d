//! Pre-submission claim scrubbing
//!
//! A pure evaluator over (claim, payer rules, fee schedules). Evaluation runs
//! four phases in a fixed order, each appending to one issue list:
//!
//! 1. required fields
//! 2. payer rules
//! 3. fee-schedule comparison
//! 4. common issues (duplicates, tooth numbers, charge-total check)
//!
//! Downstream consumers rely on issue order for display and fixtures, so the
//! output must be identical for identical inputs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::claim::{Claim, ClaimStatus};

/// Issue severity; only `Error` blocks submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single scrubbing finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubIssue {
    pub code: String,
    pub message: String,
    pub severity: Severity,
    /// Path of the offending field, when one can be named
    pub field: Option<String>,
}

impl ScrubIssue {
    fn new(code: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity,
            field: None,
        }
    }

    fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Issue codes emitted by the evaluator
pub mod codes {
    pub const MISSING_PATIENT_ID: &str = "MISSING_PATIENT_ID";
    pub const MISSING_PAYER_ID: &str = "MISSING_PAYER_ID";
    pub const NO_PROCEDURES: &str = "NO_PROCEDURES";
    pub const INVALID_TOTAL_CHARGED: &str = "INVALID_TOTAL_CHARGED";
    pub const MISSING_PROCEDURE_CODE: &str = "MISSING_PROCEDURE_CODE";
    pub const INVALID_PROCEDURE_FEE: &str = "INVALID_PROCEDURE_FEE";
    pub const FEE_OVER_SCHEDULE: &str = "FEE_OVER_SCHEDULE";
    pub const DUPLICATE_PROCEDURE: &str = "DUPLICATE_PROCEDURE";
    pub const MISSING_TOOTH_NUMBER: &str = "MISSING_TOOTH_NUMBER";
    pub const CHARGE_TOTAL_MISMATCH: &str = "CHARGE_TOTAL_MISMATCH";
}

/// Payer rule type; determines the severity of the finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    PreAuthRequired,
    AttachmentRequired,
    FrequencyLimit,
    ProcedureCombo,
    AgeLimit,
    MissingData,
}

impl RuleType {
    fn severity(&self) -> Severity {
        match self {
            RuleType::MissingData => Severity::Error,
            _ => Severity::Warning,
        }
    }

    fn issue_code(&self) -> &'static str {
        match self {
            RuleType::PreAuthRequired => "PRE_AUTH_REQUIRED",
            RuleType::AttachmentRequired => "ATTACHMENT_REQUIRED",
            RuleType::FrequencyLimit => "FREQUENCY_LIMIT",
            RuleType::ProcedureCombo => "PROCEDURE_COMBO",
            RuleType::AgeLimit => "AGE_LIMIT",
            RuleType::MissingData => "MISSING_DATA",
        }
    }
}

/// A payer-configured rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerRule {
    pub rule_type: RuleType,
    /// Allowlist of procedure codes the rule applies to; an empty or absent
    /// list means the rule applies to the whole claim
    pub procedure_codes: Option<Vec<String>>,
    pub description: String,
}

/// The active rule set for one payer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerRuleSet {
    pub is_active: bool,
    pub rules: Vec<PayerRule>,
}

/// A scheduled fee for one procedure code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledFee {
    pub code: String,
    pub fee: Money,
}

/// A practice fee schedule, optionally payer-specific
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// External payer key; None for practice-wide schedules
    pub payer_id: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub fees: Vec<ScheduledFee>,
}

impl FeeSchedule {
    fn fee_for(&self, code: &str) -> Option<Money> {
        self.fees.iter().find(|f| f.code == code).map(|f| f.fee)
    }
}

/// Billed fees above this multiple of the scheduled fee are flagged
const FEE_SCHEDULE_RATIO_LIMIT: Decimal = dec!(1.10);

/// Tooth-required CDT code prefixes; D7 (oral surgery) gets its own label
const TOOTH_REQUIRED_PREFIXES: [&str; 5] = ["D2", "D3", "D4", "D6", "D7"];

/// Result of a scrub run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubReport {
    /// Findings in evaluation order
    pub issues: Vec<ScrubIssue>,
}

impl ScrubReport {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Status the claim lands in after this scrub
    pub fn verdict(&self) -> ClaimStatus {
        if self.has_errors() {
            ClaimStatus::ScrubFailed
        } else {
            ClaimStatus::Ready
        }
    }
}

/// Runs all scrubbing phases against a claim
pub fn evaluate(
    claim: &Claim,
    payer_rules: Option<&PayerRuleSet>,
    fee_schedules: &[FeeSchedule],
) -> ScrubReport {
    let mut issues = Vec::new();
    check_required_fields(claim, &mut issues);
    if let Some(rule_set) = payer_rules {
        apply_payer_rules(claim, rule_set, &mut issues);
    }
    compare_fee_schedule(claim, fee_schedules, &mut issues);
    check_common_issues(claim, &mut issues);
    ScrubReport { issues }
}

/// Phase 1: structurally required fields
fn check_required_fields(claim: &Claim, issues: &mut Vec<ScrubIssue>) {
    if claim.patient_id.is_none() {
        issues.push(
            ScrubIssue::new(codes::MISSING_PATIENT_ID, Severity::Error, "Claim has no patient")
                .with_field("patient_id"),
        );
    }
    if claim.payer_id.trim().is_empty() {
        issues.push(
            ScrubIssue::new(codes::MISSING_PAYER_ID, Severity::Error, "Claim has no payer")
                .with_field("payer_id"),
        );
    }
    if claim.procedures.is_empty() {
        issues.push(
            ScrubIssue::new(codes::NO_PROCEDURES, Severity::Error, "Claim has no procedures")
                .with_field("procedures"),
        );
    }
    if !claim.total_charged.is_positive() {
        issues.push(
            ScrubIssue::new(
                codes::INVALID_TOTAL_CHARGED,
                Severity::Error,
                format!("Total charged must be positive, got {}", claim.total_charged),
            )
            .with_field("total_charged"),
        );
    }
    for (index, proc) in claim.procedures.iter().enumerate() {
        if proc.code.trim().is_empty() {
            issues.push(
                ScrubIssue::new(
                    codes::MISSING_PROCEDURE_CODE,
                    Severity::Error,
                    format!("Procedure {} has no code", index + 1),
                )
                .with_field(format!("procedures[{index}].code")),
            );
        }
        if !proc.fee.is_positive() {
            issues.push(
                ScrubIssue::new(
                    codes::INVALID_PROCEDURE_FEE,
                    Severity::Error,
                    format!("Procedure {} has a non-positive fee {}", index + 1, proc.fee),
                )
                .with_field(format!("procedures[{index}].fee")),
            );
        }
    }
}

/// Phase 2: payer-configured rules
fn apply_payer_rules(claim: &Claim, rule_set: &PayerRuleSet, issues: &mut Vec<ScrubIssue>) {
    if !rule_set.is_active {
        return;
    }
    for rule in &rule_set.rules {
        let matching: Vec<&str> = match &rule.procedure_codes {
            Some(allowlist) if !allowlist.is_empty() => {
                let hits: Vec<&str> = claim
                    .procedures
                    .iter()
                    .filter(|p| allowlist.iter().any(|c| c == &p.code))
                    .map(|p| p.code.as_str())
                    .collect();
                if hits.is_empty() {
                    continue;
                }
                hits
            }
            _ => Vec::new(),
        };
        let message = if matching.is_empty() {
            rule.description.clone()
        } else {
            format!("{} (applies to {})", rule.description, matching.join(", "))
        };
        issues.push(ScrubIssue::new(
            rule.rule_type.issue_code(),
            rule.rule_type.severity(),
            message,
        ));
    }
}

/// Phase 3: billed fees against the fee schedule
fn compare_fee_schedule(claim: &Claim, schedules: &[FeeSchedule], issues: &mut Vec<ScrubIssue>) {
    // Payer-specific active schedule wins over the practice default
    let schedule = schedules
        .iter()
        .find(|s| s.is_active && s.payer_id.as_deref() == Some(claim.payer_id.as_str()))
        .or_else(|| schedules.iter().find(|s| s.is_active && s.is_default));
    let Some(schedule) = schedule else {
        return;
    };
    for (index, proc) in claim.procedures.iter().enumerate() {
        let Some(scheduled) = schedule.fee_for(&proc.code) else {
            continue;
        };
        if !scheduled.is_positive() {
            continue;
        }
        let ratio = proc.fee.amount() / scheduled.amount();
        if ratio > FEE_SCHEDULE_RATIO_LIMIT {
            let percent = (ratio * dec!(100)).round_dp(1);
            issues.push(
                ScrubIssue::new(
                    codes::FEE_OVER_SCHEDULE,
                    Severity::Warning,
                    format!(
                        "{} billed at {} against scheduled {} ({percent}% of schedule)",
                        proc.code, proc.fee, scheduled
                    ),
                )
                .with_field(format!("procedures[{index}].fee")),
            );
        }
    }
}

/// Phase 4: duplicates, tooth numbers, and the charge-total check
fn check_common_issues(claim: &Claim, issues: &mut Vec<ScrubIssue>) {
    // Duplicate codes, reported once each in first-occurrence order
    let mut seen: Vec<(&str, usize)> = Vec::new();
    for proc in &claim.procedures {
        let code = proc.code.as_str();
        if code.trim().is_empty() {
            continue;
        }
        match seen.iter_mut().find(|(c, _)| *c == code) {
            Some((_, count)) => *count += 1,
            None => seen.push((code, 1)),
        }
    }
    for (code, count) in seen.iter().filter(|(_, count)| *count > 1) {
        issues.push(ScrubIssue::new(
            codes::DUPLICATE_PROCEDURE,
            Severity::Warning,
            format!("Procedure {code} appears {count} times"),
        ));
    }

    for (index, proc) in claim.procedures.iter().enumerate() {
        let needs_tooth = TOOTH_REQUIRED_PREFIXES
            .iter()
            .any(|prefix| proc.code.starts_with(prefix));
        let has_tooth = proc.tooth.as_deref().is_some_and(|t| !t.trim().is_empty());
        if needs_tooth && !has_tooth {
            let label = if proc.code.starts_with("D7") {
                "surgical"
            } else {
                "tooth-specific"
            };
            issues.push(
                ScrubIssue::new(
                    codes::MISSING_TOOTH_NUMBER,
                    Severity::Error,
                    format!("Tooth number required for {label} procedure {}", proc.code),
                )
                .with_field(format!("procedures[{index}].tooth")),
            );
        }
    }

    let summed: Money = claim.procedures.iter().map(|p| p.extended_charge()).sum();
    if !summed.reconciles_with(claim.total_charged) {
        issues.push(ScrubIssue::new(
            codes::CHARGE_TOTAL_MISMATCH,
            Severity::Warning,
            format!(
                "Procedure charges sum to {summed} but total charged is {}",
                claim.total_charged
            ),
        ));
    }
}
