//! Service wiring: picks the product store and builds the registry around it.

use std::sync::Arc;

use cannareg_infra::{
    Config, InMemoryProductStore, PostgresProductStore, ProductRegistry, ProductStore,
    SharedRegistry, StoreError,
};
use cannareg_products::ValidationMode;

pub async fn build_registry(config: &Config) -> Result<Arc<SharedRegistry>, StoreError> {
    let store: Arc<dyn ProductStore> = if config.use_persistent_stores {
        build_postgres_store(config).await?
    } else {
        Arc::new(InMemoryProductStore::new())
    };

    tracing::info!(
        store = store.backend(),
        validation_mode = ?config.write_validation_mode,
        "product registry ready"
    );
    Ok(Arc::new(ProductRegistry::new(store, config.write_validation_mode)))
}

/// In-memory registry (dev/test).
pub fn in_memory_registry(mode: ValidationMode) -> Arc<SharedRegistry> {
    let store: Arc<dyn ProductStore> = Arc::new(InMemoryProductStore::new());
    Arc::new(ProductRegistry::new(store, mode))
}

async fn build_postgres_store(config: &Config) -> Result<Arc<dyn ProductStore>, StoreError> {
    // Config loading already rejects persistent mode without a URL.
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| StoreError::Backend("DATABASE_URL is not set".to_string()))?;

    let store = PostgresProductStore::connect(database_url, config.db_max_connections).await?;
    store.ensure_schema().await?;
    Ok(Arc::new(store))
}
