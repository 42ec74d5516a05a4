//! Full-flush read-through catalog cache.
//!
//! Two regions: product-by-slug and the category list. Any catalog
//! mutation flushes both wholesale; no per-key invalidation exists. An
//! epoch counter closes the read-miss/invalidate race: a loader result is
//! only stored if no eviction happened between the miss and the insert, so
//! a cache hit can never be older than the last eviction.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use vitrine_catalog::{Category, Product};

#[derive(Debug, Default)]
pub struct CatalogCache {
    epoch: AtomicU64,
    products_by_slug: DashMap<String, Product>,
    categories: RwLock<Option<Vec<Category>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-through product lookup. `load` runs on a miss against the
    /// source of truth; `None` results are not cached.
    pub fn product_by_slug(
        &self,
        slug: &str,
        load: impl FnOnce() -> Option<Product>,
    ) -> Option<Product> {
        let epoch = self.epoch.load(Ordering::Acquire);
        if let Some(hit) = self.products_by_slug.get(slug) {
            return Some(hit.clone());
        }
        let loaded = load()?;
        if self.epoch.load(Ordering::Acquire) == epoch {
            self.products_by_slug.insert(slug.to_string(), loaded.clone());
        }
        Some(loaded)
    }

    /// Read-through category list.
    pub fn categories(&self, load: impl FnOnce() -> Vec<Category>) -> Vec<Category> {
        let epoch = self.epoch.load(Ordering::Acquire);
        if let Ok(guard) = self.categories.read() {
            if let Some(hit) = guard.as_ref() {
                return hit.clone();
            }
        }
        let loaded = load();
        if self.epoch.load(Ordering::Acquire) == epoch {
            if let Ok(mut guard) = self.categories.write() {
                *guard = Some(loaded.clone());
            }
        }
        loaded
    }

    /// Evict everything. Called strictly after a store commit. The epoch
    /// bump comes first so in-flight loaders observe it and refuse to
    /// repopulate with pre-write data.
    pub fn invalidate_all(&self) {
        self.epoch.fetch_add(1, Ordering::Release);
        self.products_by_slug.clear();
        if let Ok(mut guard) = self.categories.write() {
            *guard = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::cell::Cell;
    use vitrine_core::ProductId;

    fn product(name: &str, slug: &str) -> Product {
        Product {
            id: ProductId::new(),
            name: name.to_string(),
            slug: slug.to_string(),
            short_description: None,
            description: None,
            visible: true,
            featured: false,
            sort_order: None,
            created_at: Utc::now(),
            specs: Default::default(),
            categories: vec![],
            tags: vec![],
            images: vec![],
        }
    }

    #[test]
    fn hit_skips_the_loader() {
        let cache = CatalogCache::new();
        let loads = Cell::new(0);
        let load = || {
            loads.set(loads.get() + 1);
            Some(product("P", "p"))
        };

        cache.product_by_slug("p", load).unwrap();
        cache.product_by_slug("p", load).unwrap();
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn misses_are_not_cached() {
        let cache = CatalogCache::new();
        let loads = Cell::new(0);
        let load = || {
            loads.set(loads.get() + 1);
            None
        };

        assert!(cache.product_by_slug("ghost", load).is_none());
        assert!(cache.product_by_slug("ghost", load).is_none());
        assert_eq!(loads.get(), 2);
    }

    #[test]
    fn invalidate_flushes_both_regions() {
        let cache = CatalogCache::new();
        cache.product_by_slug("p", || Some(product("P", "p")));
        cache.categories(Vec::new);

        cache.invalidate_all();

        let product_loads = Cell::new(0);
        cache.product_by_slug("p", || {
            product_loads.set(product_loads.get() + 1);
            Some(product("P2", "p"))
        });
        let category_loads = Cell::new(0);
        cache.categories(|| {
            category_loads.set(category_loads.get() + 1);
            vec![]
        });
        assert_eq!(product_loads.get(), 1);
        assert_eq!(category_loads.get(), 1);
    }

    #[test]
    fn eviction_during_a_load_prevents_stale_repopulation() {
        let cache = CatalogCache::new();
        // The loader races a writer: by the time it returns, the cache has
        // been invalidated. Its (pre-write) result must not be stored.
        let stale = cache.product_by_slug("p", || {
            cache.invalidate_all();
            Some(product("old", "p"))
        });
        assert_eq!(stale.unwrap().name, "old"); // the racing read itself may see old data

        let loads = Cell::new(0);
        let fresh = cache
            .product_by_slug("p", || {
                loads.set(loads.get() + 1);
                Some(product("new", "p"))
            })
            .unwrap();
        assert_eq!(loads.get(), 1, "stale entry must not have been cached");
        assert_eq!(fresh.name, "new");
    }
}
