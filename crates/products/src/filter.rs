//! Listing predicates.

use serde::{Deserialize, Serialize};

use crate::classification::{RegulatoryStatus, SpectrumType, TherapeuticCategory};
use crate::product::Product;

/// Optional listing constraints; an empty filter matches every product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFilter {
    pub spectrum_type: Option<SpectrumType>,
    pub therapeutic_category: Option<TherapeuticCategory>,
    pub regulatory_status: Option<RegulatoryStatus>,
    /// Case-insensitive substring over the name and the category spelling.
    pub search: Option<String>,
    /// Keep only products the risk engine flags.
    pub at_risk_only: bool,
}

impl ProductFilter {
    pub fn at_risk() -> Self {
        Self {
            at_risk_only: true,
            ..Self::default()
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if self.spectrum_type.is_some_and(|s| s != product.spectrum_type()) {
            return false;
        }
        if self
            .therapeutic_category
            .is_some_and(|c| c != product.therapeutic_category())
        {
            return false;
        }
        if self
            .regulatory_status
            .is_some_and(|r| r != product.regulatory_status())
        {
            return false;
        }
        if let Some(needle) = self.search_needle() {
            let in_name = product.name().to_lowercase().contains(&needle);
            let in_category = product.therapeutic_category().as_str().contains(&needle);
            if !in_name && !in_category {
                return false;
            }
        }
        if self.at_risk_only && !product.has_risk() {
            return false;
        }
        true
    }

    fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// Sort newest first; ties broken by id so the order is total.
pub fn sort_newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id_typed().cmp(&a.id_typed()))
    });
}
