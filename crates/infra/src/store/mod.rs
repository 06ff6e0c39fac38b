//! Product record storage.
//!
//! The store persists whatever it is given: domain rules run in
//! [`crate::registry::ProductRegistry`] before any write reaches it.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use cannareg_products::{Product, ProductFilter, ProductId};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;

/// Storage operation error.
///
/// These are **infrastructure errors**, as opposed to domain errors
/// (validation, invariants).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("product not found: {0}")]
    NotFound(ProductId),

    #[error("product already exists: {0}")]
    Conflict(ProductId),

    /// Row could not be mapped back into a `Product`.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Persistence for product records.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Short backend name for health reporting.
    fn backend(&self) -> &'static str;

    /// Insert a new record. Fails with `Conflict` when the id is taken.
    async fn insert(&self, product: Product) -> Result<(), StoreError>;

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Records matching `filter`, newest first.
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError>;

    /// Overwrite an existing record. Fails with `NotFound` when absent.
    async fn update(&self, product: Product) -> Result<(), StoreError>;

    /// Remove a record. Returns whether anything was deleted.
    async fn delete(&self, id: ProductId) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// Cheap reachability check.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn backend(&self) -> &'static str {
        (**self).backend()
    }

    async fn insert(&self, product: Product) -> Result<(), StoreError> {
        (**self).insert(product).await
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get(id).await
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        (**self).list(filter).await
    }

    async fn update(&self, product: Product) -> Result<(), StoreError> {
        (**self).update(product).await
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        (**self).count().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }
}
