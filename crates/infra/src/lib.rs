//! Infrastructure layer: storage, the product registry service, configuration
//! and sample data.

pub mod config;
pub mod registry;
pub mod seed;
pub mod store;

pub use config::{Config, ConfigError};
pub use registry::{ProductRegistry, RegistryError, RegistryResult, SharedRegistry};
pub use store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};
