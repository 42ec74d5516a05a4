use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use vitrine_core::{CategoryId, ImageId, ProductId, TagId};

/// Arbitrary product specification data. The catalog stores and returns it
/// untouched; only JSON-object shape is enforced at the boundary.
pub type SpecMap = Map<String, Value>;

/// Product category. Slug is unique among categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<CategoryId>,
}

/// Product tag. Slug is unique among tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: String,
}

/// Image owned by exactly one product; cascade-deleted with it.
///
/// Among a product's images at most one carries `cover`, and exactly one
/// when the collection is non-empty after a mutation (see [`crate::cover`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub url: String,
    pub alt: String,
    pub cover: bool,
    pub product_id: ProductId,
}

/// Fully resolved product as served to readers: category/tag references are
/// joined to their entities, images are carried inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub visible: bool,
    pub featured: bool,
    pub sort_order: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub specs: SpecMap,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    pub images: Vec<Image>,
}

impl Product {
    /// The image currently flagged as cover, if any.
    pub fn cover_image(&self) -> Option<&Image> {
        self.images.iter().find(|img| img.cover)
    }
}

/// Caller-supplied product state for create/update.
///
/// `slug: None` derives the slug from `name`. Unknown category ids and tag
/// slugs are dropped silently when applied. `images: None` keeps the
/// existing image set on update; `Some(list)` replaces it wholesale.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub slug: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub category_ids: Vec<CategoryId>,
    pub tag_slugs: Vec<String>,
    pub visible: bool,
    pub featured: bool,
    pub sort_order: Option<i32>,
    pub images: Option<Vec<ImageDraft>>,
    pub specs: SpecMap,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: None,
            short_description: None,
            description: None,
            category_ids: Vec::new(),
            tag_slugs: Vec::new(),
            visible: true,
            featured: false,
            sort_order: None,
            images: None,
            specs: SpecMap::new(),
        }
    }
}

/// Image state inside a whole-list replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDraft {
    pub url: String,
    pub alt: Option<String>,
    pub cover: bool,
}

/// Caller-supplied category state. `slug: None` derives from `name`.
#[derive(Debug, Clone, Default)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: Option<String>,
    pub parent_id: Option<CategoryId>,
}

/// Caller-supplied tag state. `slug: None` derives from `name`.
#[derive(Debug, Clone, Default)]
pub struct TagDraft {
    pub name: String,
    pub slug: Option<String>,
}
