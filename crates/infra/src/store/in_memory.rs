use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use cannareg_products::{sort_newest_first, Product, ProductFilter, ProductId};

use super::{ProductStore, StoreError};

/// In-memory product store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    fn backend(&self) -> &'static str {
        "in_memory"
    }

    async fn insert(&self, product: Product) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let id = product.id_typed();
        if map.contains_key(&id) {
            return Err(StoreError::Conflict(id));
        }
        map.insert(id, product);
        Ok(())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut items: Vec<Product> = map.values().filter(|p| filter.matches(p)).cloned().collect();
        sort_newest_first(&mut items);
        Ok(items)
    }

    async fn update(&self, product: Product) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        match map.get_mut(&product.id_typed()) {
            Some(slot) => {
                *slot = product;
                Ok(())
            }
            None => Err(StoreError::NotFound(product.id_typed())),
        }
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.len() as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.read().map(|_| ()).map_err(|_| poisoned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cannareg_products::{
        CreateProduct, PatchProduct, SpectrumType, TherapeuticCategory, ValidationMode,
    };
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    fn product(name: &str, offset_secs: i64) -> Product {
        Product::create(
            ProductId::new(),
            &CreateProduct {
                name: name.to_string(),
                spectrum_type: SpectrumType::Sativa,
                thc_percent: Decimal::new(80, 2),
                cbd_percent: Decimal::new(500, 2),
                therapeutic_category: TherapeuticCategory::Neurology,
                regulatory_status: None,
            },
            ValidationMode::Supplied,
            Utc::now() + Duration::seconds(offset_secs),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_get_delete() {
        let store = InMemoryProductStore::new();
        let p = product("Oil", 0);
        let id = p.id_typed();

        store.insert(p.clone()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), Some(p));
        assert_eq!(store.count().await.unwrap(), 1);

        assert!(store.delete(id).await.unwrap());
        assert!(!store.delete(id).await.unwrap());
        assert_eq!(store.get(id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_insert_conflicts() {
        let store = InMemoryProductStore::new();
        let p = product("Oil", 0);
        store.insert(p.clone()).await.unwrap();

        let err = store.insert(p).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_requires_existing_record() {
        let store = InMemoryProductStore::new();
        let p = product("Oil", 0);

        let err = store.update(p.clone()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        store.insert(p.clone()).await.unwrap();
        let renamed = p
            .apply_patch(
                &PatchProduct { name: Some("Renamed".into()), ..Default::default() },
                ValidationMode::Supplied,
                Utc::now(),
            )
            .unwrap();
        store.update(renamed).await.unwrap();
        assert_eq!(store.get(p.id_typed()).await.unwrap().unwrap().name(), "Renamed");
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filtered() {
        let store = InMemoryProductStore::new();
        store.insert(product("first", 0)).await.unwrap();
        store.insert(product("second", 1)).await.unwrap();
        store.insert(product("third", 2)).await.unwrap();

        let all = store.list(&ProductFilter::default()).await.unwrap();
        let names: Vec<_> = all.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["third", "second", "first"]);

        let filter = ProductFilter { search: Some("SEC".into()), ..Default::default() };
        let hits = store.list(&filter).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name(), "second");
    }
}
