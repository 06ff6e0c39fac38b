//! Products domain module.
//!
//! This crate contains the business rules for the product registry, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage):
//! - `classification`: the enumerated fields and their display labels
//! - `percentage`: THC/CBD potency value object
//! - `risk`: risk classification and the approval write rule
//! - `product`: the `Product` entity and its write commands
//! - `filter`: listing predicates
//! - `stats`: catalog summary counts

pub mod classification;
pub mod filter;
pub mod percentage;
pub mod product;
pub mod risk;
pub mod stats;

pub use classification::{RegulatoryStatus, SpectrumType, TherapeuticCategory};
pub use filter::{sort_newest_first, ProductFilter};
pub use percentage::Percentage;
pub use product::{
    CreateProduct, PatchProduct, Product, ProductFields, ProductId, ReplaceProduct, ValidationMode,
};
pub use risk::{
    evaluate_risk, validate_for_write, RiskAssessment, WriteRuleViolation, RISK_CATEGORIES,
    RISK_THC_THRESHOLD,
};
pub use stats::CatalogStats;
