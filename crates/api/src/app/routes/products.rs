use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use cannareg_infra::SharedRegistry;
use cannareg_products::{CreateProduct, PatchProduct, ProductFilter, ReplaceProduct};

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/at-risk", get(list_at_risk))
        .route("/stats", get(catalog_stats))
        .route(
            "/:id",
            get(get_product)
                .put(replace_product)
                .patch(patch_product)
                .delete(delete_product),
        )
}

pub async fn list_products(
    Extension(registry): Extension<Arc<SharedRegistry>>,
    query: Result<Query<ProductFilter>, QueryRejection>,
) -> axum::response::Response {
    let Query(filter) = match query {
        Ok(q) => q,
        Err(e) => return dto::query_rejection_to_response(e),
    };

    match registry.list(&filter).await {
        Ok(products) => (StatusCode::OK, Json(dto::products_to_json(&products))).into_response(),
        Err(e) => errors::registry_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(registry): Extension<Arc<SharedRegistry>>,
    body: Result<Json<CreateProduct>, JsonRejection>,
) -> axum::response::Response {
    let Json(cmd) = match body {
        Ok(b) => b,
        Err(e) => return dto::json_rejection_to_response(e),
    };

    match registry.create(cmd).await {
        Ok(product) => (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::registry_error_to_response(e),
    }
}

pub async fn list_at_risk(
    Extension(registry): Extension<Arc<SharedRegistry>>,
) -> axum::response::Response {
    match registry.list_at_risk().await {
        Ok(products) => (StatusCode::OK, Json(dto::products_to_json(&products))).into_response(),
        Err(e) => errors::registry_error_to_response(e),
    }
}

pub async fn catalog_stats(
    Extension(registry): Extension<Arc<SharedRegistry>>,
) -> axum::response::Response {
    match registry.stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => errors::registry_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(registry): Extension<Arc<SharedRegistry>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match registry.get(id).await {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::registry_error_to_response(e),
    }
}

pub async fn replace_product(
    Extension(registry): Extension<Arc<SharedRegistry>>,
    Path(id): Path<String>,
    body: Result<Json<ReplaceProduct>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(cmd) = match body {
        Ok(b) => b,
        Err(e) => return dto::json_rejection_to_response(e),
    };

    match registry.replace(id, cmd).await {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::registry_error_to_response(e),
    }
}

pub async fn patch_product(
    Extension(registry): Extension<Arc<SharedRegistry>>,
    Path(id): Path<String>,
    body: Result<Json<PatchProduct>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(cmd) = match body {
        Ok(b) => b,
        Err(e) => return dto::json_rejection_to_response(e),
    };

    match registry.patch(id, cmd).await {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::registry_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(registry): Extension<Arc<SharedRegistry>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match registry.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::registry_error_to_response(e),
    }
}
