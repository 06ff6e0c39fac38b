//! Product registry: the application service behind the HTTP surface.
//!
//! Every write goes through the same pipeline:
//!
//! ```text
//! Command
//!   ↓
//! 1. Load the current record (updates only)
//!   ↓
//! 2. Build the new state (field checks, then the approval rule)
//!   ↓
//! 3. Persist; a rejected command never reaches the store
//! ```
//!
//! Reads attach nothing: risk is derived from the stored fields by whoever
//! renders the product.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use cannareg_core::DomainError;
use cannareg_products::{
    CatalogStats, CreateProduct, PatchProduct, Product, ProductFilter, ProductId, ReplaceProduct,
    ValidationMode,
};

use crate::store::{ProductStore, StoreError};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistryError {
    /// Whether the failure means "no such product".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistryError::Domain(DomainError::NotFound)
                | RegistryError::Store(StoreError::NotFound(_))
        )
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry over a type-erased store, as wired by the server.
pub type SharedRegistry = ProductRegistry<Arc<dyn ProductStore>>;

#[derive(Debug, Clone)]
pub struct ProductRegistry<S> {
    store: S,
    mode: ValidationMode,
}

impl<S: ProductStore> ProductRegistry<S> {
    pub fn new(store: S, mode: ValidationMode) -> Self {
        Self { store, mode }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[instrument(skip(self, cmd), fields(name = %cmd.name), err)]
    pub async fn create(&self, cmd: CreateProduct) -> RegistryResult<Product> {
        let product = Product::create(ProductId::new(), &cmd, self.mode, Utc::now())?;
        self.store.insert(product.clone()).await?;
        tracing::info!(
            product_id = %product.id_typed(),
            has_risk = product.has_risk(),
            "product created"
        );
        Ok(product)
    }

    #[instrument(skip(self), err)]
    pub async fn get(&self, id: ProductId) -> RegistryResult<Product> {
        self.store
            .get(id)
            .await?
            .ok_or(RegistryError::Domain(DomainError::not_found()))
    }

    #[instrument(skip(self), err)]
    pub async fn list(&self, filter: &ProductFilter) -> RegistryResult<Vec<Product>> {
        Ok(self.store.list(filter).await?)
    }

    /// Every product the risk engine flags, newest first.
    pub async fn list_at_risk(&self) -> RegistryResult<Vec<Product>> {
        self.list(&ProductFilter::at_risk()).await
    }

    #[instrument(skip(self), err)]
    pub async fn stats(&self) -> RegistryResult<CatalogStats> {
        let products = self.store.list(&ProductFilter::default()).await?;
        Ok(CatalogStats::from_products(&products))
    }

    #[instrument(skip(self, cmd), err)]
    pub async fn replace(&self, id: ProductId, cmd: ReplaceProduct) -> RegistryResult<Product> {
        let current = self.get(id).await?;
        let updated = current.apply_replace(&cmd, self.mode, Utc::now())?;
        self.store.update(updated.clone()).await?;
        tracing::info!(product_id = %id, has_risk = updated.has_risk(), "product replaced");
        Ok(updated)
    }

    #[instrument(skip(self, cmd), err)]
    pub async fn patch(&self, id: ProductId, cmd: PatchProduct) -> RegistryResult<Product> {
        let current = self.get(id).await?;
        let updated = current.apply_patch(&cmd, self.mode, Utc::now())?;
        self.store.update(updated.clone()).await?;
        tracing::info!(product_id = %id, has_risk = updated.has_risk(), "product patched");
        Ok(updated)
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: ProductId) -> RegistryResult<()> {
        if !self.store.delete(id).await? {
            return Err(DomainError::not_found().into());
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}
