//! Catalog administration endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;

use vitrine_core::{CategoryId, ImageId, ProductId, TagId};

use crate::app::dto::{CategoryDto, CategoryPayload, ProductDto, ProductPayload, TagDto, TagPayload};
use crate::app::errors::ApiError;
use crate::app::services::CatalogService;

pub fn router() -> Router {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/:id", axum::routing::put(update_product).delete(delete_product))
        .route("/products/:id/images", post(upload_image))
        .route("/products/:id/images/:image_id/cover", post(set_cover))
        .route("/products/:id/images/:image_id", delete(delete_image))
        .route("/categories", post(create_category))
        .route(
            "/categories/:id",
            axum::routing::put(update_category).delete(delete_category),
        )
        .route("/tags", post(create_tag))
        .route("/tags/:id", axum::routing::put(update_tag).delete(delete_tag))
}

// ----- products -----

async fn create_product(
    Extension(service): Extension<Arc<CatalogService>>,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    let product = service.create_product(payload.into_draft())?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

async fn update_product(
    Extension(service): Extension<Arc<CatalogService>>,
    Path(id): Path<ProductId>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<ProductDto>, ApiError> {
    let product = service.update_product(id, payload.into_draft())?;
    Ok(Json(product.into()))
}

async fn delete_product(
    Extension(service): Extension<Arc<CatalogService>>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, ApiError> {
    service.delete_product(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ----- images -----

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: String,
    #[serde(default)]
    pub cover: bool,
    pub alt: Option<String>,
}

/// Raw-body upload; the original file name and cover request travel in the
/// query string.
async fn upload_image(
    Extension(service): Extension<Arc<CatalogService>>,
    Path(id): Path<ProductId>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    let product = service.add_image(id, &query.filename, &body, query.cover, query.alt)?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

async fn set_cover(
    Extension(service): Extension<Arc<CatalogService>>,
    Path((id, image_id)): Path<(ProductId, ImageId)>,
) -> Result<Json<ProductDto>, ApiError> {
    let product = service.set_cover_image(id, image_id)?;
    Ok(Json(product.into()))
}

async fn delete_image(
    Extension(service): Extension<Arc<CatalogService>>,
    Path((id, image_id)): Path<(ProductId, ImageId)>,
) -> Result<Json<ProductDto>, ApiError> {
    let product = service.delete_image(id, image_id)?;
    Ok(Json(product.into()))
}

// ----- categories -----

async fn create_category(
    Extension(service): Extension<Arc<CatalogService>>,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<CategoryDto>), ApiError> {
    let category = service.create_category(payload.into_draft())?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

async fn update_category(
    Extension(service): Extension<Arc<CatalogService>>,
    Path(id): Path<CategoryId>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<CategoryDto>, ApiError> {
    let category = service.update_category(id, payload.into_draft())?;
    Ok(Json(category.into()))
}

async fn delete_category(
    Extension(service): Extension<Arc<CatalogService>>,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode, ApiError> {
    service.delete_category(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ----- tags -----

async fn create_tag(
    Extension(service): Extension<Arc<CatalogService>>,
    Json(payload): Json<TagPayload>,
) -> Result<(StatusCode, Json<TagDto>), ApiError> {
    let tag = service.create_tag(payload.into_draft())?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}

async fn update_tag(
    Extension(service): Extension<Arc<CatalogService>>,
    Path(id): Path<TagId>,
    Json(payload): Json<TagPayload>,
) -> Result<Json<TagDto>, ApiError> {
    let tag = service.update_tag(id, payload.into_draft())?;
    Ok(Json(tag.into()))
}

async fn delete_tag(
    Extension(service): Extension<Arc<CatalogService>>,
    Path(id): Path<TagId>,
) -> Result<StatusCode, ApiError> {
    service.delete_tag(id)?;
    Ok(StatusCode::NO_CONTENT)
}
