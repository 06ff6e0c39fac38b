//! Product risk engine.
//!
//! Two pure functions decide everything regulatory about a single record:
//! - [`evaluate_risk`] derives the `has_risk` flag and its explanation
//! - [`validate_for_write`] enforces the approval rule before a write
//!
//! Neither touches storage or shared state, so both can be called concurrently
//! and repeatedly with identical results.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use cannareg_core::DomainError;

use crate::classification::{RegulatoryStatus, TherapeuticCategory};

/// THC percentage above which a product is considered potent (strictly greater).
pub const RISK_THC_THRESHOLD: Decimal = Decimal::from_parts(30, 0, 0, false, 2);

/// Categories in which a potent product needs special attention.
pub const RISK_CATEGORIES: [TherapeuticCategory; 2] =
    [TherapeuticCategory::Neurology, TherapeuticCategory::Pediatrics];

/// Outcome of [`evaluate_risk`].
///
/// `explanation` is `Some` exactly when `has_risk` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub has_risk: bool,
    pub explanation: Option<String>,
}

impl RiskAssessment {
    fn clear() -> Self {
        Self {
            has_risk: false,
            explanation: None,
        }
    }
}

fn exceeds_threshold(thc_percent: Decimal) -> bool {
    thc_percent > RISK_THC_THRESHOLD
}

/// Classify a product from its THC percentage and therapeutic category.
pub fn evaluate_risk(thc_percent: Decimal, category: TherapeuticCategory) -> RiskAssessment {
    if !exceeds_threshold(thc_percent) || !RISK_CATEGORIES.contains(&category) {
        return RiskAssessment::clear();
    }

    RiskAssessment {
        has_risk: true,
        explanation: Some(format!(
            "Product with THC {}% for {} - requires special attention",
            thc_percent,
            category.label()
        )),
    }
}

/// A write that breaks the approval rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteRuleViolation {
    #[error("products with THC above 0.30% cannot be approved (thc_percent = {thc_percent})")]
    ThcExceedsLimitForApproval { thc_percent: Decimal },
}

impl WriteRuleViolation {
    /// Stable identifier of the violated rule.
    pub fn code(&self) -> &'static str {
        match self {
            WriteRuleViolation::ThcExceedsLimitForApproval { .. } => {
                "thc_exceeds_limit_for_approval"
            }
        }
    }
}

impl From<WriteRuleViolation> for DomainError {
    fn from(value: WriteRuleViolation) -> Self {
        DomainError::invariant(value.code(), value.to_string())
    }
}

/// Check the approval rule against whatever fields a write supplies.
///
/// Only fires when both values are present. A partial write that omits either
/// one passes without comparison; see `ValidationMode::Merged` for the strict
/// alternative.
pub fn validate_for_write(
    thc_percent: Option<Decimal>,
    regulatory_status: Option<RegulatoryStatus>,
) -> Result<(), WriteRuleViolation> {
    match (thc_percent, regulatory_status) {
        (Some(thc), Some(RegulatoryStatus::Approved)) if exceeds_threshold(thc) => {
            Err(WriteRuleViolation::ThcExceedsLimitForApproval { thc_percent: thc })
        }
        _ => Ok(()),
    }
}
