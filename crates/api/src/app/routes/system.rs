use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use cannareg_infra::{ProductStore, SharedRegistry};

use crate::app::{dto::HealthResponse, errors};

/// Liveness plus a store round-trip; 503 when the store cannot answer.
pub async fn health(
    Extension(registry): Extension<Arc<SharedRegistry>>,
) -> axum::response::Response {
    let store = registry.store();
    let count = match store.ping().await {
        Ok(()) => store.count().await,
        Err(e) => Err(e),
    };

    match count {
        Ok(products) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                store: store.backend(),
                products,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            errors::json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", e.to_string())
        }
    }
}
