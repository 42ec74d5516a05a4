//! Mapping domain errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use vitrine_core::CatalogError;

/// Handler-level error wrapper so `?` works on `CatalogResult` values.
#[derive(Debug)]
pub struct ApiError(pub CatalogError);

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            CatalogError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            CatalogError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            CatalogError::InvalidSlug(_) => (StatusCode::BAD_REQUEST, "invalid_slug"),
            CatalogError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = Json(json!({
            "error": { "code": code, "message": self.0.to_string() }
        }));
        (status, body).into_response()
    }
}
