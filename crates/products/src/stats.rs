//! Catalog summary counts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::product::Product;
use crate::risk::RISK_THC_THRESHOLD;

/// Aggregate counts over a set of products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub by_spectrum_type: BTreeMap<&'static str, usize>,
    pub by_therapeutic_category: BTreeMap<&'static str, usize>,
    pub by_regulatory_status: BTreeMap<&'static str, usize>,
    pub at_risk: usize,
    /// THC above the threshold but outside the risk categories.
    pub potent_without_risk: usize,
}

impl CatalogStats {
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        let mut stats = CatalogStats::default();
        for p in products {
            stats.total += 1;
            *stats.by_spectrum_type.entry(p.spectrum_type().as_str()).or_default() += 1;
            *stats
                .by_therapeutic_category
                .entry(p.therapeutic_category().as_str())
                .or_default() += 1;
            *stats
                .by_regulatory_status
                .entry(p.regulatory_status().as_str())
                .or_default() += 1;

            if p.has_risk() {
                stats.at_risk += 1;
            } else if p.thc_percent().value() > RISK_THC_THRESHOLD {
                stats.potent_without_risk += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::{RegulatoryStatus, SpectrumType, TherapeuticCategory};
    use crate::product::{CreateProduct, ProductId, ValidationMode};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn product(thc: i64, category: TherapeuticCategory, status: RegulatoryStatus) -> Product {
        Product::create(
            ProductId::new(),
            &CreateProduct {
                name: "p".into(),
                spectrum_type: SpectrumType::Hybrid,
                thc_percent: Decimal::new(thc, 2),
                cbd_percent: Decimal::ZERO,
                therapeutic_category: category,
                regulatory_status: Some(status),
            },
            ValidationMode::Supplied,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn counts_risk_and_potent_separately() {
        let items = vec![
            product(80, TherapeuticCategory::Neurology, RegulatoryStatus::Pending),
            product(60, TherapeuticCategory::Dermatology, RegulatoryStatus::Pending),
            product(10, TherapeuticCategory::Pediatrics, RegulatoryStatus::Approved),
        ];

        let stats = CatalogStats::from_products(&items);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.at_risk, 1);
        assert_eq!(stats.potent_without_risk, 1);
        assert_eq!(stats.by_spectrum_type.get("hybrid"), Some(&3));
        assert_eq!(stats.by_regulatory_status.get("pending"), Some(&2));
        assert_eq!(stats.by_therapeutic_category.get("oncology"), None);
    }

    #[test]
    fn empty_catalog_is_all_zero() {
        assert_eq!(CatalogStats::from_products(&[]), CatalogStats::default());
    }
}
