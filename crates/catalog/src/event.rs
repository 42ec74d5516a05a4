//! Transient catalog change events.
//!
//! Produced by the service after each committed mutation, fanned out to
//! live subscribers, never persisted. A subscriber that connects later has
//! no way to replay them; it catches up by querying current state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use vitrine_core::ProductId;

use crate::product::Product;

/// What changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeKind {
    #[serde(rename = "product.created")]
    ProductCreated,
    #[serde(rename = "product.updated")]
    ProductUpdated,
    #[serde(rename = "product.deleted")]
    ProductDeleted,
    #[serde(rename = "image.updated")]
    ImageUpdated,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::ProductCreated => "product.created",
            ChangeKind::ProductUpdated => "product.updated",
            ChangeKind::ProductDeleted => "product.deleted",
            ChangeKind::ImageUpdated => "image.updated",
        }
    }
}

/// One committed catalog mutation, as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub product_id: ProductId,
    pub slug: String,
    pub occurred_at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Event for `product`, stamped now.
    pub fn now(kind: ChangeKind, product: &Product) -> Self {
        Self {
            kind,
            product_id: product.id,
            slug: product.slug.clone(),
            occurred_at: Utc::now(),
        }
    }
}
