use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use cannareg_core::DomainError;
use cannareg_infra::{RegistryError, StoreError};

pub fn registry_error_to_response(err: RegistryError) -> axum::response::Response {
    match err {
        RegistryError::Domain(e) => domain_error_to_response(e),
        RegistryError::Store(StoreError::NotFound(id)) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("product {id} not found"))
        }
        RegistryError::Store(StoreError::Conflict(id)) => {
            json_error(StatusCode::CONFLICT, "conflict", format!("product {id} already exists"))
        }
        RegistryError::Store(e) => {
            tracing::error!(error = %e, "product store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let code = err.code();
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, code, msg),
        DomainError::InvariantViolation { message, .. } => {
            json_error(StatusCode::BAD_REQUEST, code, message)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, code, msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, code, "product not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, code, msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
