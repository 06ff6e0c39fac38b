//! Demonstration catalog.
//!
//! Covers every classification the risk engine distinguishes: low-THC
//! products, risky ones, potent products outside the risk categories and a
//! product sitting exactly on the threshold.

use rust_decimal::Decimal;
use tracing::instrument;

use cannareg_products::{
    CreateProduct, Product, RegulatoryStatus, SpectrumType, TherapeuticCategory,
};

use crate::registry::{ProductRegistry, RegistryResult};
use crate::store::ProductStore;

fn sample(
    name: &str,
    spectrum_type: SpectrumType,
    thc_hundredths: i64,
    cbd_hundredths: i64,
    therapeutic_category: TherapeuticCategory,
    regulatory_status: RegulatoryStatus,
) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        spectrum_type,
        thc_percent: Decimal::new(thc_hundredths, 2),
        cbd_percent: Decimal::new(cbd_hundredths, 2),
        therapeutic_category,
        regulatory_status: Some(regulatory_status),
    }
}

pub fn sample_catalog() -> Vec<CreateProduct> {
    use RegulatoryStatus::*;
    use SpectrumType::*;
    use TherapeuticCategory::*;

    vec![
        // low THC
        sample("Premium CBD Oil", Sativa, 10, 1500, Neurology, Approved),
        sample("Therapeutic Cream", Indica, 5, 850, Dermatology, Approved),
        sample("Pediatric Supplement", Hybrid, 20, 1200, Pediatrics, Approved),
        sample("Oncology Tincture", Sativa, 15, 2000, Oncology, Pending),
        // at risk
        sample("Strong Neurological Oil", Sativa, 80, 500, Neurology, Pending),
        sample("Special Pediatric Formula", Hybrid, 50, 1000, Pediatrics, Pending),
        sample("Advanced Neurological Treatment", Indica, 120, 300, Neurology, Rejected),
        // potent, outside the risk categories
        sample("Strong Dermatological Oil", Sativa, 60, 800, Dermatology, Pending),
        sample("Special Oncology Formula", Hybrid, 90, 1500, Oncology, Pending),
        // assorted
        sample("Pure CBD Oil", Sativa, 0, 2500, Other, Approved),
        sample("Relaxing Cream", Indica, 30, 1200, Other, Approved),
        sample("Experimental Blend", Hybrid, 40, 1800, Other, Pending),
    ]
}

/// Insert the sample catalog through `registry`, so every entry passes the
/// same checks as an API write. A store that already holds records is left
/// alone and nothing is returned.
#[instrument(skip(registry))]
pub async fn seed_registry<S: ProductStore>(
    registry: &ProductRegistry<S>,
) -> RegistryResult<Vec<Product>> {
    let existing = registry.store().count().await?;
    if existing > 0 {
        tracing::info!(existing, "catalog already populated, skipping seed");
        return Ok(Vec::new());
    }

    let mut created = Vec::new();
    for cmd in sample_catalog() {
        created.push(registry.create(cmd).await?);
    }
    tracing::info!(
        count = created.len(),
        at_risk = created.iter().filter(|p| p.has_risk()).count(),
        "sample catalog seeded"
    );
    Ok(created)
}
