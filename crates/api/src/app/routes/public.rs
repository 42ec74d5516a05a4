//! Read-only storefront endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;

use crate::app::dto::{CategoryDto, ListQuery, PageMeta, PagedResponse, ProductDto, TagDto};
use crate::app::errors::ApiError;
use crate::app::services::CatalogService;

pub fn router() -> Router {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/tags", get(list_tags))
        .route("/products", get(list_products))
        .route("/products/:id", get(product_by_slug))
        .route("/products/:id/related", get(related_products))
}

async fn list_categories(
    Extension(service): Extension<Arc<CatalogService>>,
) -> Json<Vec<CategoryDto>> {
    Json(service.categories().into_iter().map(Into::into).collect())
}

async fn list_tags(Extension(service): Extension<Arc<CatalogService>>) -> Json<Vec<TagDto>> {
    Json(service.tags().into_iter().map(Into::into).collect())
}

async fn list_products(
    Extension(service): Extension<Arc<CatalogService>>,
    Query(query): Query<ListQuery>,
) -> Json<PagedResponse<ProductDto>> {
    let result = service.search(&query.into_params());
    Json(PagedResponse {
        meta: PageMeta {
            page: result.page,
            per_page: result.per_page,
            total: result.total,
        },
        data: result.items.into_iter().map(Into::into).collect(),
    })
}

async fn product_by_slug(
    Extension(service): Extension<Arc<CatalogService>>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDto>, ApiError> {
    let product = service.product_by_slug(&slug)?;
    Ok(Json(product.into()))
}

#[derive(Debug, Deserialize)]
pub struct RelatedQuery {
    pub limit: Option<i64>,
}

async fn related_products(
    Extension(service): Extension<Arc<CatalogService>>,
    Path(slug): Path<String>,
    Query(query): Query<RelatedQuery>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let related = service.related(&slug, query.limit.unwrap_or(8))?;
    Ok(Json(related.into_iter().map(Into::into).collect()))
}
