//! Catalog orchestration.
//!
//! `CatalogService` owns the collaborators and sequences every mutation the
//! same way: validate, repair the cover invariant, commit to the store, and
//! only then evict the cache and broadcast the change event. A reader that
//! hits the cache after a mutation returned can therefore never observe
//! pre-mutation state, and subscribers only hear about committed writes.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use vitrine_catalog::filter::{compile, related_query};
use vitrine_catalog::{
    Category, CategoryDraft, ChangeEvent, ChangeKind, Image, PageResult, Product, ProductDraft,
    SearchParams, Tag, TagDraft, cover, slug,
};
use vitrine_core::{CatalogError, CatalogResult, CategoryId, ImageId, ProductId, TagId};
use vitrine_infra::{CatalogCache, CatalogStore, EventBroadcaster, FileStore, ProductRecord};

pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    files: Arc<dyn FileStore>,
    cache: CatalogCache,
    broadcaster: EventBroadcaster,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, files: Arc<dyn FileStore>) -> Self {
        Self {
            store,
            files,
            cache: CatalogCache::new(),
            broadcaster: EventBroadcaster::new(),
        }
    }

    // ----- reads -----

    pub fn categories(&self) -> Vec<Category> {
        self.cache.categories(|| self.store.categories())
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.store.tags()
    }

    pub fn search(&self, params: &SearchParams) -> PageResult {
        compile(params).execute(self.store.products())
    }

    pub fn product_by_slug(&self, slug: &str) -> CatalogResult<Product> {
        self.cache
            .product_by_slug(slug, || self.store.product_by_slug(slug))
            .ok_or_else(CatalogError::not_found)
    }

    /// Products sharing a tag or the reference's first category, newest
    /// listing order, capped at `limit`.
    pub fn related(&self, slug: &str, limit: i64) -> CatalogResult<Vec<Product>> {
        let reference = self.product_by_slug(slug)?;
        let result = related_query(&reference, limit).execute(self.store.products());
        Ok(result.items)
    }

    /// Register a change-event subscriber. Dropping the receiver is the
    /// unsubscribe; no events are replayed.
    pub fn subscribe(&self) -> UnboundedReceiver<ChangeEvent> {
        self.broadcaster.subscribe()
    }

    // ----- product mutations -----

    pub fn create_product(&self, draft: ProductDraft) -> CatalogResult<Product> {
        let name = required_name(&draft.name, "product")?;
        let slug_source = draft.slug.as_deref().unwrap_or(&name);
        let slug = slug::unique(slug_source, |s| self.store.product_slug_exists(s, None))?;

        let id = ProductId::new();
        let mut images = materialize_images(draft.images.unwrap_or_default(), id);
        cover::enforce_single_cover(&mut images);

        let record = ProductRecord {
            id,
            name,
            slug,
            short_description: draft.short_description,
            description: draft.description,
            visible: draft.visible,
            featured: draft.featured,
            sort_order: draft.sort_order,
            created_at: chrono::Utc::now(),
            specs: draft.specs,
            category_ids: self.known_category_ids(draft.category_ids),
            tag_ids: self.tag_ids_for_slugs(&draft.tag_slugs),
            images,
        };

        let product = self.store.insert_product(record)?;
        self.commit_side_effects(ChangeEvent::now(ChangeKind::ProductCreated, &product));
        tracing::info!(id = %product.id, slug = %product.slug, "product created");
        Ok(product)
    }

    pub fn update_product(&self, id: ProductId, draft: ProductDraft) -> CatalogResult<Product> {
        let existing = self
            .store
            .product_by_id(id)
            .ok_or_else(CatalogError::not_found)?;

        let name = required_name(&draft.name, "product")?;
        let slug_source = draft.slug.as_deref().unwrap_or(&name);
        // The product keeps its own slug when the source still normalizes
        // to it; only collisions with OTHER products force a suffix.
        let slug = slug::unique(slug_source, |s| self.store.product_slug_exists(s, Some(id)))?;

        // An absent or empty image list keeps the current set; a non-empty
        // one replaces it wholesale and releases the files that drop out.
        let mut images = match draft.images {
            Some(list) if !list.is_empty() => {
                let replacement = materialize_images(list, id);
                for old in &existing.images {
                    if !replacement.iter().any(|img| img.url == old.url) {
                        self.files.delete(&old.url);
                    }
                }
                replacement
            }
            _ => existing.images.clone(),
        };
        cover::enforce_single_cover(&mut images);

        let record = ProductRecord {
            id,
            name,
            slug,
            short_description: draft.short_description,
            description: draft.description,
            visible: draft.visible,
            featured: draft.featured,
            sort_order: draft.sort_order,
            created_at: existing.created_at,
            specs: draft.specs,
            category_ids: self.known_category_ids(draft.category_ids),
            tag_ids: self.tag_ids_for_slugs(&draft.tag_slugs),
            images,
        };

        let product = self.store.update_product(record)?;
        self.commit_side_effects(ChangeEvent::now(ChangeKind::ProductUpdated, &product));
        Ok(product)
    }

    pub fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        let removed = self.store.remove_product(id)?;
        for image in &removed.images {
            self.files.delete(&image.url);
        }
        self.commit_side_effects(ChangeEvent::now(ChangeKind::ProductDeleted, &removed));
        tracing::info!(id = %removed.id, slug = %removed.slug, "product deleted");
        Ok(())
    }

    // ----- image mutations -----

    /// Store an uploaded file and attach it to the product. The new image
    /// becomes the cover when requested, or when the product had none.
    pub fn add_image(
        &self,
        product_id: ProductId,
        file_name: &str,
        bytes: &[u8],
        as_cover: bool,
        alt: Option<String>,
    ) -> CatalogResult<Product> {
        let product = self
            .store
            .product_by_id(product_id)
            .ok_or_else(CatalogError::not_found)?;

        let url = self.files.save(file_name, bytes)?;
        let uploaded = Image {
            id: ImageId::new(),
            url,
            alt: alt.unwrap_or_else(|| product.name.clone()),
            cover: false,
            product_id,
        };

        let mut images = product.images.clone();
        cover::apply_upload(&mut images, uploaded, as_cover);
        self.update_images(&product, images, ChangeKind::ImageUpdated)
    }

    pub fn set_cover_image(
        &self,
        product_id: ProductId,
        image_id: ImageId,
    ) -> CatalogResult<Product> {
        let product = self
            .store
            .product_by_id(product_id)
            .ok_or_else(CatalogError::not_found)?;

        let mut images = product.images.clone();
        cover::set_cover(&mut images, image_id)?;
        self.update_images(&product, images, ChangeKind::ImageUpdated)
    }

    pub fn delete_image(&self, product_id: ProductId, image_id: ImageId) -> CatalogResult<Product> {
        let product = self
            .store
            .product_by_id(product_id)
            .ok_or_else(CatalogError::not_found)?;

        let mut images = product.images.clone();
        let position = images
            .iter()
            .position(|img| img.id == image_id)
            .ok_or_else(CatalogError::not_found)?;
        let removed = images.remove(position);

        if cover::REELECT_COVER_AFTER_DELETE {
            cover::enforce_single_cover(&mut images);
        }
        // The file outlives a failed commit: a racing writer may keep the
        // record alive, and its image URL must stay resolvable.
        let updated = self.update_images(&product, images, ChangeKind::ImageUpdated)?;
        self.files.delete(&removed.url);
        Ok(updated)
    }

    // ----- category mutations (cache-evicting, no change events) -----

    pub fn create_category(&self, draft: CategoryDraft) -> CatalogResult<Category> {
        let name = required_name(&draft.name, "category")?;
        let slug_source = draft.slug.as_deref().unwrap_or(&name);
        let slug = slug::unique(slug_source, |s| self.store.category_slug_exists(s, None))?;
        let category = self.store.upsert_category(Category {
            id: CategoryId::new(),
            name,
            slug,
            parent_id: draft.parent_id,
        })?;
        self.cache.invalidate_all();
        Ok(category)
    }

    pub fn update_category(&self, id: CategoryId, draft: CategoryDraft) -> CatalogResult<Category> {
        if self.store.category_by_id(id).is_none() {
            return Err(CatalogError::not_found());
        }
        let name = required_name(&draft.name, "category")?;
        let slug_source = draft.slug.as_deref().unwrap_or(&name);
        let slug = slug::unique(slug_source, |s| self.store.category_slug_exists(s, Some(id)))?;
        let category = self.store.upsert_category(Category {
            id,
            name,
            slug,
            parent_id: draft.parent_id,
        })?;
        self.cache.invalidate_all();
        Ok(category)
    }

    pub fn delete_category(&self, id: CategoryId) -> CatalogResult<()> {
        self.store.remove_category(id)?;
        self.cache.invalidate_all();
        Ok(())
    }

    // ----- tag mutations (cache-evicting, no change events) -----

    pub fn create_tag(&self, draft: TagDraft) -> CatalogResult<Tag> {
        let name = required_name(&draft.name, "tag")?;
        let slug_source = draft.slug.as_deref().unwrap_or(&name);
        let slug = slug::unique(slug_source, |s| self.store.tag_slug_exists(s, None))?;
        let tag = self.store.upsert_tag(Tag {
            id: TagId::new(),
            name,
            slug,
        })?;
        self.cache.invalidate_all();
        Ok(tag)
    }

    pub fn update_tag(&self, id: TagId, draft: TagDraft) -> CatalogResult<Tag> {
        if self.store.tag_by_id(id).is_none() {
            return Err(CatalogError::not_found());
        }
        let name = required_name(&draft.name, "tag")?;
        let slug_source = draft.slug.as_deref().unwrap_or(&name);
        let slug = slug::unique(slug_source, |s| self.store.tag_slug_exists(s, Some(id)))?;
        let tag = self.store.upsert_tag(Tag { id, name, slug })?;
        self.cache.invalidate_all();
        Ok(tag)
    }

    pub fn delete_tag(&self, id: TagId) -> CatalogResult<()> {
        self.store.remove_tag(id)?;
        self.cache.invalidate_all();
        Ok(())
    }

    // ----- internals -----

    /// Post-commit sequence shared by every product mutation. Eviction runs
    /// before the broadcast so a subscriber reacting to the event re-reads
    /// through an already-flushed cache.
    fn commit_side_effects(&self, event: ChangeEvent) {
        self.cache.invalidate_all();
        self.broadcaster.broadcast(&event);
    }

    fn update_images(
        &self,
        product: &Product,
        images: Vec<Image>,
        kind: ChangeKind,
    ) -> CatalogResult<Product> {
        let mut record = record_of(product);
        record.images = images;
        let updated = self.store.update_product(record)?;
        self.commit_side_effects(ChangeEvent::now(kind, &updated));
        Ok(updated)
    }

    /// Keep only ids that resolve; unknown references are dropped silently.
    fn known_category_ids(&self, ids: Vec<CategoryId>) -> Vec<CategoryId> {
        ids.into_iter()
            .filter(|id| self.store.category_by_id(*id).is_some())
            .collect()
    }

    /// Map tag slugs to ids; unknown slugs are dropped silently.
    fn tag_ids_for_slugs(&self, slugs: &[String]) -> Vec<TagId> {
        let all = self.store.tags();
        slugs
            .iter()
            .filter_map(|s| all.iter().find(|t| t.slug == *s).map(|t| t.id))
            .collect()
    }
}

fn required_name(name: &str, what: &str) -> CatalogResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::validation(format!("{what} name is required")));
    }
    Ok(trimmed.to_string())
}

fn materialize_images(
    drafts: Vec<vitrine_catalog::ImageDraft>,
    product_id: ProductId,
) -> Vec<Image> {
    drafts
        .into_iter()
        .map(|d| Image {
            id: ImageId::new(),
            url: d.url,
            alt: d.alt.unwrap_or_default(),
            cover: d.cover,
            product_id,
        })
        .collect()
}

fn record_of(product: &Product) -> ProductRecord {
    ProductRecord {
        id: product.id,
        name: product.name.clone(),
        slug: product.slug.clone(),
        short_description: product.short_description.clone(),
        description: product.description.clone(),
        visible: product.visible,
        featured: product.featured,
        sort_order: product.sort_order,
        created_at: product.created_at,
        specs: product.specs.clone(),
        category_ids: product.categories.iter().map(|c| c.id).collect(),
        tag_ids: product.tags.iter().map(|t| t.id).collect(),
        images: product.images.clone(),
    }
}
