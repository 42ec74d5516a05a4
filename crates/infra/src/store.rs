//! Catalog storage seam.
//!
//! `CatalogStore` is the durable-CRUD collaborator behind the service:
//! committed writes are immediately visible to readers and
//! referential integrity holds (images live inside their product record,
//! category/tag references are stripped when the target goes away). Only
//! the in-memory implementation ships; a database-backed one would slot in
//! behind the same trait.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use vitrine_catalog::{Category, Image, Product, SpecMap, Tag};
use vitrine_core::{CatalogError, CatalogResult, CategoryId, ProductId, TagId};

/// Persisted product shape: references by id, images owned inline.
/// Reads join it back into a fully resolved [`Product`].
#[derive(Debug, Clone)]
pub struct ProductRecord {
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
    pub category_ids: Vec<CategoryId>,
    pub tag_ids: Vec<TagId>,
    pub images: Vec<Image>,
}

pub trait CatalogStore: Send + Sync {
    // Products
    fn insert_product(&self, record: ProductRecord) -> CatalogResult<Product>;
    /// Replaces the record with the same id; `NotFound` when absent.
    fn update_product(&self, record: ProductRecord) -> CatalogResult<Product>;
    /// Removes the product and, with it, its images. Returns the removed
    /// product so the caller can publish its identity.
    fn remove_product(&self, id: ProductId) -> CatalogResult<Product>;
    fn product_by_id(&self, id: ProductId) -> Option<Product>;
    fn product_by_slug(&self, slug: &str) -> Option<Product>;
    /// Full resolved product set for the query engine.
    fn products(&self) -> Vec<Product>;
    fn product_slug_exists(&self, slug: &str, exclude: Option<ProductId>) -> bool;

    // Categories
    fn categories(&self) -> Vec<Category>;
    fn category_by_id(&self, id: CategoryId) -> Option<Category>;
    fn upsert_category(&self, category: Category) -> CatalogResult<Category>;
    /// Removes the category and strips it from every product.
    fn remove_category(&self, id: CategoryId) -> CatalogResult<()>;
    fn category_slug_exists(&self, slug: &str, exclude: Option<CategoryId>) -> bool;

    // Tags
    fn tags(&self) -> Vec<Tag>;
    fn tag_by_id(&self, id: TagId) -> Option<Tag>;
    fn upsert_tag(&self, tag: Tag) -> CatalogResult<Tag>;
    /// Removes the tag and strips it from every product.
    fn remove_tag(&self, id: TagId) -> CatalogResult<()>;
    fn tag_slug_exists(&self, slug: &str, exclude: Option<TagId>) -> bool;
}

/// In-memory catalog store for dev/tests.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    products: RwLock<HashMap<ProductId, ProductRecord>>,
    categories: RwLock<HashMap<CategoryId, Category>>,
    tags: RwLock<HashMap<TagId, Tag>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(&self, record: &ProductRecord) -> Product {
        let categories = self.categories.read().ok();
        let tags = self.tags.read().ok();
        Product {
            id: record.id,
            name: record.name.clone(),
            slug: record.slug.clone(),
            short_description: record.short_description.clone(),
            description: record.description.clone(),
            visible: record.visible,
            featured: record.featured,
            sort_order: record.sort_order,
            created_at: record.created_at,
            specs: record.specs.clone(),
            categories: record
                .category_ids
                .iter()
                .filter_map(|id| categories.as_ref().and_then(|m| m.get(id).cloned()))
                .collect(),
            tags: record
                .tag_ids
                .iter()
                .filter_map(|id| tags.as_ref().and_then(|m| m.get(id).cloned()))
                .collect(),
            images: record.images.clone(),
        }
    }
}

fn poisoned() -> CatalogError {
    CatalogError::storage("store lock poisoned")
}

impl CatalogStore for InMemoryCatalogStore {
    fn insert_product(&self, record: ProductRecord) -> CatalogResult<Product> {
        {
            let mut map = self.products.write().map_err(|_| poisoned())?;
            map.insert(record.id, record.clone());
        }
        Ok(self.resolve(&record))
    }

    fn update_product(&self, record: ProductRecord) -> CatalogResult<Product> {
        {
            let mut map = self.products.write().map_err(|_| poisoned())?;
            if !map.contains_key(&record.id) {
                return Err(CatalogError::not_found());
            }
            map.insert(record.id, record.clone());
        }
        Ok(self.resolve(&record))
    }

    fn remove_product(&self, id: ProductId) -> CatalogResult<Product> {
        let removed = {
            let mut map = self.products.write().map_err(|_| poisoned())?;
            map.remove(&id).ok_or_else(CatalogError::not_found)?
        };
        Ok(self.resolve(&removed))
    }

    fn product_by_id(&self, id: ProductId) -> Option<Product> {
        let record = {
            let map = self.products.read().ok()?;
            map.get(&id).cloned()
        }?;
        Some(self.resolve(&record))
    }

    fn product_by_slug(&self, slug: &str) -> Option<Product> {
        let record = {
            let map = self.products.read().ok()?;
            map.values().find(|r| r.slug == slug).cloned()
        };
        record.map(|r| self.resolve(&r))
    }

    fn products(&self) -> Vec<Product> {
        let records: Vec<ProductRecord> = match self.products.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => return vec![],
        };
        records.iter().map(|r| self.resolve(r)).collect()
    }

    fn product_slug_exists(&self, slug: &str, exclude: Option<ProductId>) -> bool {
        match self.products.read() {
            Ok(map) => map
                .values()
                .any(|r| r.slug == slug && exclude != Some(r.id)),
            Err(_) => false,
        }
    }

    fn categories(&self) -> Vec<Category> {
        let mut all: Vec<Category> = match self.categories.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => return vec![],
        };
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    fn category_by_id(&self, id: CategoryId) -> Option<Category> {
        self.categories.read().ok()?.get(&id).cloned()
    }

    fn upsert_category(&self, category: Category) -> CatalogResult<Category> {
        let mut map = self.categories.write().map_err(|_| poisoned())?;
        map.insert(category.id, category.clone());
        Ok(category)
    }

    fn remove_category(&self, id: CategoryId) -> CatalogResult<()> {
        {
            let mut map = self.categories.write().map_err(|_| poisoned())?;
            if map.remove(&id).is_none() {
                return Err(CatalogError::not_found());
            }
        }
        let mut products = self.products.write().map_err(|_| poisoned())?;
        for record in products.values_mut() {
            record.category_ids.retain(|c| *c != id);
        }
        Ok(())
    }

    fn category_slug_exists(&self, slug: &str, exclude: Option<CategoryId>) -> bool {
        match self.categories.read() {
            Ok(map) => map
                .values()
                .any(|c| c.slug == slug && exclude != Some(c.id)),
            Err(_) => false,
        }
    }

    fn tags(&self) -> Vec<Tag> {
        let mut all: Vec<Tag> = match self.tags.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => return vec![],
        };
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    fn tag_by_id(&self, id: TagId) -> Option<Tag> {
        self.tags.read().ok()?.get(&id).cloned()
    }

    fn upsert_tag(&self, tag: Tag) -> CatalogResult<Tag> {
        let mut map = self.tags.write().map_err(|_| poisoned())?;
        map.insert(tag.id, tag.clone());
        Ok(tag)
    }

    fn remove_tag(&self, id: TagId) -> CatalogResult<()> {
        {
            let mut map = self.tags.write().map_err(|_| poisoned())?;
            if map.remove(&id).is_none() {
                return Err(CatalogError::not_found());
            }
        }
        let mut products = self.products.write().map_err(|_| poisoned())?;
        for record in products.values_mut() {
            record.tag_ids.retain(|t| *t != id);
        }
        Ok(())
    }

    fn tag_slug_exists(&self, slug: &str, exclude: Option<TagId>) -> bool {
        match self.tags.read() {
            Ok(map) => map.values().any(|t| t.slug == slug && exclude != Some(t.id)),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, slug: &str) -> ProductRecord {
        ProductRecord {
            id: ProductId::new(),
            name: name.to_string(),
            slug: slug.to_string(),
            short_description: None,
            description: None,
            visible: true,
            featured: false,
            sort_order: None,
            created_at: Utc::now(),
            specs: SpecMap::new(),
            category_ids: vec![],
            tag_ids: vec![],
            images: vec![],
        }
    }

    #[test]
    fn resolves_category_and_tag_references_on_read() {
        let store = InMemoryCatalogStore::new();
        let cat = store
            .upsert_category(Category {
                id: CategoryId::new(),
                name: "Jantes".into(),
                slug: "jantes".into(),
                parent_id: None,
            })
            .unwrap();
        let tag = store
            .upsert_tag(Tag {
                id: TagId::new(),
                name: "sport".into(),
                slug: "sport".into(),
            })
            .unwrap();

        let mut rec = record("P", "p");
        rec.category_ids = vec![cat.id, CategoryId::new()]; // second one unknown
        rec.tag_ids = vec![tag.id];
        let product = store.insert_product(rec).unwrap();

        assert_eq!(product.categories, vec![cat]);
        assert_eq!(product.tags, vec![tag]);
    }

    #[test]
    fn slug_existence_honors_the_exclusion() {
        let store = InMemoryCatalogStore::new();
        let rec = record("P", "p");
        let id = rec.id;
        store.insert_product(rec).unwrap();

        assert!(store.product_slug_exists("p", None));
        assert!(!store.product_slug_exists("p", Some(id)));
        assert!(!store.product_slug_exists("q", None));
    }

    #[test]
    fn removing_a_product_returns_it_and_drops_its_images() {
        let store = InMemoryCatalogStore::new();
        let mut rec = record("P", "p");
        let id = rec.id;
        rec.images = vec![Image {
            id: vitrine_core::ImageId::new(),
            url: "/files/a.webp".into(),
            alt: "a".into(),
            cover: true,
            product_id: id,
        }];
        store.insert_product(rec).unwrap();

        let removed = store.remove_product(id).unwrap();
        assert_eq!(removed.slug, "p");
        assert!(store.product_by_id(id).is_none());
        assert_eq!(store.remove_product(id), Err(CatalogError::NotFound));
    }

    #[test]
    fn removing_a_category_strips_product_references() {
        let store = InMemoryCatalogStore::new();
        let cat = store
            .upsert_category(Category {
                id: CategoryId::new(),
                name: "Jantes".into(),
                slug: "jantes".into(),
                parent_id: None,
            })
            .unwrap();
        let mut rec = record("P", "p");
        let id = rec.id;
        rec.category_ids = vec![cat.id];
        store.insert_product(rec).unwrap();

        store.remove_category(cat.id).unwrap();
        assert!(store.product_by_id(id).unwrap().categories.is_empty());
    }

    #[test]
    fn update_of_unknown_product_is_not_found() {
        let store = InMemoryCatalogStore::new();
        let err = store.update_product(record("P", "p")).unwrap_err();
        assert_eq!(err, CatalogError::NotFound);
    }
}
