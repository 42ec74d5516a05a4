//! Application assembly: service wiring and the versioned router.

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{Extension, Router};

use services::CatalogService;

/// Build the full application router around a shared service instance.
pub fn build_app(service: Arc<CatalogService>) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_router())
        .layer(Extension(service))
}
