//! Postgres-backed product store.
//!
//! Enumerated fields are stored as their wire spellings (`TEXT`), percentages
//! as `NUMERIC(5, 2)`. The derived risk flag is never stored: `at_risk_only`
//! filtering runs through the risk engine after the rows are loaded.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` (insert only) |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / Io / Tls / other | N/A | `Backend` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;

use cannareg_core::Timestamps;
use cannareg_products::{
    Percentage, Product, ProductFields, ProductFilter, ProductId, RegulatoryStatus, SpectrumType,
    TherapeuticCategory,
};

use super::{ProductStore, StoreError};

const SCHEMA_SQL: &str = include_str!("../../migrations/0001_create_products.sql");

/// Postgres-backed product store.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; the store can be shared
/// across request handlers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    #[instrument(skip(database_url), err)]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `products` table and its indexes if they do not exist.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Backend(format!("database error in {}: {}", operation, db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

fn corrupt(column: &str, err: impl core::fmt::Display) -> StoreError {
    StoreError::Corrupt(format!("column {column}: {err}"))
}

fn row_to_product(row: &PgRow) -> Result<Product, StoreError> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| corrupt("id", e))?;
    let name: String = row.try_get("name").map_err(|e| corrupt("name", e))?;
    let spectrum: String = row
        .try_get("spectrum_type")
        .map_err(|e| corrupt("spectrum_type", e))?;
    let thc: Decimal = row.try_get("thc_percent").map_err(|e| corrupt("thc_percent", e))?;
    let cbd: Decimal = row.try_get("cbd_percent").map_err(|e| corrupt("cbd_percent", e))?;
    let category: String = row
        .try_get("therapeutic_category")
        .map_err(|e| corrupt("therapeutic_category", e))?;
    let status: String = row
        .try_get("regulatory_status")
        .map_err(|e| corrupt("regulatory_status", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| corrupt("created_at", e))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| corrupt("updated_at", e))?;

    let fields = ProductFields {
        name,
        spectrum_type: spectrum
            .parse::<SpectrumType>()
            .map_err(|e| corrupt("spectrum_type", e))?,
        thc_percent: Percentage::try_new("thc_percent", thc)
            .map_err(|e| corrupt("thc_percent", e))?,
        cbd_percent: Percentage::try_new("cbd_percent", cbd)
            .map_err(|e| corrupt("cbd_percent", e))?,
        therapeutic_category: category
            .parse::<TherapeuticCategory>()
            .map_err(|e| corrupt("therapeutic_category", e))?,
        regulatory_status: status
            .parse::<RegulatoryStatus>()
            .map_err(|e| corrupt("regulatory_status", e))?,
    };

    Ok(Product::restore(
        ProductId::from_uuid(id),
        fields,
        Timestamps::restore(created_at, updated_at),
    ))
}

/// `ILIKE` pattern for a free-text search: `None` when blank, otherwise the
/// trimmed text with `\`, `%` and `_` escaped, wrapped in `%`.
fn search_pattern(search: Option<&str>) -> Option<String> {
    let term = search.map(str::trim).filter(|s| !s.is_empty())?;
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        name,
        spectrum_type,
        thc_percent,
        cbd_percent,
        therapeutic_category,
        regulatory_status,
        created_at,
        updated_at
    FROM products
"#;

#[async_trait]
impl ProductStore for PostgresProductStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    #[instrument(skip(self, product), fields(product_id = %product.id_typed()), err)]
    async fn insert(&self, product: Product) -> Result<(), StoreError> {
        let f = product.fields();
        sqlx::query(
            r#"
            INSERT INTO products (
                id,
                name,
                spectrum_type,
                thc_percent,
                cbd_percent,
                therapeutic_category,
                regulatory_status,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(product.id_typed().as_uuid())
        .bind(&f.name)
        .bind(f.spectrum_type.as_str())
        .bind(f.thc_percent.value())
        .bind(f.cbd_percent.value())
        .bind(f.therapeutic_category.as_str())
        .bind(f.regulatory_status.as_str())
        .bind(product.created_at())
        .bind(product.updated_at())
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict(product.id_typed())
            } else {
                map_sqlx_error("insert_product", e)
            }
        })?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_product", e))?;

        row.as_ref().map(row_to_product).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let search = search_pattern(filter.search.as_deref());

        let rows = sqlx::query(&format!(
            r#"{SELECT_COLUMNS}
            WHERE ($1::text IS NULL OR spectrum_type = $1)
                AND ($2::text IS NULL OR therapeutic_category = $2)
                AND ($3::text IS NULL OR regulatory_status = $3)
                AND ($4::text IS NULL OR name ILIKE $4 OR therapeutic_category ILIKE $4)
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(filter.spectrum_type.map(|s| s.as_str()))
        .bind(filter.therapeutic_category.map(|c| c.as_str()))
        .bind(filter.regulatory_status.map(|r| r.as_str()))
        .bind(search)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            let product = row_to_product(row)?;
            if filter.matches(&product) {
                products.push(product);
            }
        }
        Ok(products)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id_typed()), err)]
    async fn update(&self, product: Product) -> Result<(), StoreError> {
        let f = product.fields();
        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = $2,
                spectrum_type = $3,
                thc_percent = $4,
                cbd_percent = $5,
                therapeutic_category = $6,
                regulatory_status = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(product.id_typed().as_uuid())
        .bind(&f.name)
        .bind(f.spectrum_type.as_str())
        .bind(f.thc_percent.value())
        .bind(f.cbd_percent.value())
        .bind(f.therapeutic_category.as_str())
        .bind(f.regulatory_status.as_str())
        .bind(product.updated_at())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_product", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(product.id_typed()));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM products")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_products", e))?;
        let total: i64 = row.try_get("total").map_err(|e| corrupt("total", e))?;
        Ok(total.max(0) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;
        Ok(())
    }
}
