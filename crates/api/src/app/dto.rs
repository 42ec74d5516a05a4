//! Wire shapes for the JSON API.
//!
//! Responses are camelCase. Product responses list the cover image first;
//! request payloads tolerate unknown category ids and tag slugs (dropped
//! silently) so stale admin UIs cannot fail a whole mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitrine_catalog::{
    Category, CategoryDraft, Image, ImageDraft, Product, ProductDraft, SearchParams, SpecMap, Tag,
    TagDraft, filter::DEFAULT_PER_PAGE,
};
use vitrine_core::{CategoryId, ImageId, ProductId, TagId};

// ----- responses -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<CategoryId>,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            parent_id: c.parent_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TagDto {
    pub id: TagId,
    pub name: String,
    pub slug: String,
}

impl From<Tag> for TagDto {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            name: t.name,
            slug: t.slug,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDto {
    pub id: ImageId,
    pub url: String,
    pub alt: String,
    pub is_cover: bool,
}

impl From<Image> for ImageDto {
    fn from(i: Image) -> Self {
        Self {
            id: i.id,
            url: i.url,
            alt: i.alt,
            is_cover: i.cover,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
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
    pub categories: Vec<CategoryDto>,
    pub tags: Vec<TagDto>,
    pub images: Vec<ImageDto>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        // Cover first, original order otherwise.
        let mut images = p.images;
        images.sort_by_key(|img| !img.cover);
        Self {
            id: p.id,
            name: p.name,
            slug: p.slug,
            short_description: p.short_description,
            description: p.description,
            visible: p.visible,
            featured: p.featured,
            sort_order: p.sort_order,
            created_at: p.created_at,
            specs: p.specs,
            categories: p.categories.into_iter().map(Into::into).collect(),
            tags: p.tags.into_iter().map(Into::into).collect(),
            images: images.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

// ----- requests -----

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub slug: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub category_ids: Vec<String>,
    pub tag_slugs: Vec<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub featured: bool,
    pub sort_order: Option<i32>,
    pub images: Option<Vec<ImagePayload>>,
    pub specs: Option<SpecMap>,
}

fn default_visible() -> bool {
    true
}

impl ProductPayload {
    pub fn into_draft(self) -> ProductDraft {
        ProductDraft {
            name: self.name,
            slug: self.slug,
            short_description: self.short_description,
            description: self.description,
            // Unparseable ids are treated like unknown ones: dropped.
            category_ids: self
                .category_ids
                .iter()
                .filter_map(|id| id.parse::<CategoryId>().ok())
                .collect(),
            tag_slugs: self.tag_slugs,
            visible: self.visible,
            featured: self.featured,
            sort_order: self.sort_order,
            images: self
                .images
                .map(|list| list.into_iter().map(ImagePayload::into_draft).collect()),
            specs: self.specs.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub url: String,
    pub alt: Option<String>,
    #[serde(default, alias = "cover")]
    pub is_cover: bool,
}

impl ImagePayload {
    fn into_draft(self) -> ImageDraft {
        ImageDraft {
            url: self.url,
            alt: self.alt,
            cover: self.is_cover,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: String,
    pub slug: Option<String>,
    pub parent_id: Option<String>,
}

impl CategoryPayload {
    pub fn into_draft(self) -> CategoryDraft {
        CategoryDraft {
            name: self.name,
            slug: self.slug,
            parent_id: self.parent_id.and_then(|id| id.parse().ok()),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct TagPayload {
    pub name: String,
    pub slug: Option<String>,
}

impl TagPayload {
    pub fn into_draft(self) -> TagDraft {
        TagDraft {
            name: self.name,
            slug: self.slug,
        }
    }
}

/// Public listing query string.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub visible: Option<bool>,
    pub featured: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListQuery {
    pub fn into_params(self) -> SearchParams {
        SearchParams {
            search: self.search,
            category: self.category,
            tags: self.tags,
            visible: self.visible,
            featured: self.featured,
            page: self.page.unwrap_or(1),
            per_page: self.per_page.unwrap_or(DEFAULT_PER_PAGE),
        }
    }
}
