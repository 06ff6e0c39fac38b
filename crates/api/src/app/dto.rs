use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use serde::Serialize;

use cannareg_products::{Product, ProductId};

use crate::app::errors;

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
    pub products: u64,
}

// -------------------------
// JSON mapping helpers
// -------------------------

/// Serialize a product with its display labels and the derived risk fields.
pub fn product_to_json(product: &Product) -> serde_json::Value {
    let risk = product.risk();
    serde_json::json!({
        "id": product.id_typed().to_string(),
        "name": product.name(),
        "spectrum_type": product.spectrum_type().as_str(),
        "spectrum_type_label": product.spectrum_type().label(),
        "thc_percent": product.thc_percent().to_string(),
        "cbd_percent": product.cbd_percent().to_string(),
        "therapeutic_category": product.therapeutic_category().as_str(),
        "therapeutic_category_label": product.therapeutic_category().label(),
        "regulatory_status": product.regulatory_status().as_str(),
        "regulatory_status_label": product.regulatory_status().label(),
        "created_at": product.created_at().to_rfc3339(),
        "updated_at": product.updated_at().to_rfc3339(),
        "has_risk": risk.has_risk,
        "risk_explanation": risk.explanation,
    })
}

pub fn products_to_json(products: &[Product]) -> serde_json::Value {
    serde_json::Value::Array(products.iter().map(product_to_json).collect())
}

// -------------------------
// Extraction helpers
// -------------------------

pub fn parse_product_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.parse::<ProductId>().map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_id",
            format!("'{raw}' is not a valid product id"),
        )
    })
}

pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    errors::json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> axum::response::Response {
    errors::json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
}
