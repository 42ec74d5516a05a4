//! The catalog query engine: composable predicates, deterministic ordering,
//! clamped pagination.
//!
//! Filters are tagged descriptors combined by [`compile`] into one
//! [`ProductQuery`]; the query executes against the full product set a
//! store hands it. Because every predicate is evaluated once per product
//! (never per join row), multi-valued tag/category matches cannot produce
//! duplicate result rows.

use std::cmp::{Ordering, Reverse};

use vitrine_core::ProductId;

use crate::product::Product;

/// Hard ceiling on page size, bounding response payloads.
pub const MAX_PER_PAGE: i64 = 50;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: i64 = 12;

/// Raw listing parameters as they arrive from the transport layer.
/// Absent or blank values impose no constraint.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub search: Option<String>,
    pub category: Option<String>,
    /// Comma-separated tag slugs; a product matches on any of them.
    pub tags: Option<String>,
    pub visible: Option<bool>,
    pub featured: Option<bool>,
    /// 1-based; values below 1 clamp to the first page.
    pub page: i64,
    pub per_page: i64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            tags: None,
            visible: None,
            featured: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One filter condition. `AnyOf` is the OR combinator; everything inside a
/// query's predicate list is AND-combined.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring over name, both descriptions, or any
    /// associated tag's display name.
    Search(String),
    /// Membership in the category with this slug.
    InCategory(String),
    /// Membership in any of these tag slugs.
    AnyTag(Vec<String>),
    Visible(bool),
    Featured(bool),
    /// Excludes a single product (self-exclusion for related lookups).
    NotProduct(ProductId),
    /// OR over sub-predicates.
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Predicate::Search(needle) => {
                let needle = needle.to_lowercase();
                let hit = |text: &str| text.to_lowercase().contains(&needle);
                hit(&product.name)
                    || product.short_description.as_deref().is_some_and(|s| hit(s))
                    || product.description.as_deref().is_some_and(|s| hit(s))
                    || product.tags.iter().any(|t| hit(&t.name))
            }
            Predicate::InCategory(slug) => product.categories.iter().any(|c| c.slug == *slug),
            Predicate::AnyTag(slugs) => product
                .tags
                .iter()
                .any(|t| slugs.iter().any(|s| *s == t.slug)),
            Predicate::Visible(v) => product.visible == *v,
            Predicate::Featured(v) => product.featured == *v,
            Predicate::NotProduct(id) => product.id != *id,
            Predicate::AnyOf(preds) => preds.iter().any(|p| p.matches(product)),
        }
    }
}

/// Clamped pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub page: u64,
    pub per_page: u64,
}

impl PageSpec {
    pub fn clamped(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1) as u64,
            per_page: per_page.clamp(1, MAX_PER_PAGE) as u64,
        }
    }

    // Saturating: a caller-supplied page near i64::MAX must not overflow
    // into a wrapped (wrong) offset; it just lands past the end.
    fn offset(&self) -> usize {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.per_page)
            .min(usize::MAX as u64) as usize
    }
}

/// A compiled, executable query plan.
#[derive(Debug, Clone)]
pub struct ProductQuery {
    predicates: Vec<Predicate>,
    page: PageSpec,
}

/// One page of matches plus the total over the unpaged filtered set.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub items: Vec<Product>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl ProductQuery {
    pub fn new(predicates: Vec<Predicate>, page: PageSpec) -> Self {
        Self { predicates, page }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn page(&self) -> PageSpec {
        self.page
    }

    /// AND over all predicates; an empty list matches everything.
    pub fn matches(&self, product: &Product) -> bool {
        self.predicates.iter().all(|p| p.matches(product))
    }

    /// Filter, order, count, page.
    pub fn execute(&self, products: Vec<Product>) -> PageResult {
        let mut matched: Vec<Product> =
            products.into_iter().filter(|p| self.matches(p)).collect();
        matched.sort_by(compare_listing);
        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(self.page.offset())
            .take(self.page.per_page as usize)
            .collect();
        PageResult {
            items,
            total,
            page: self.page.page,
            per_page: self.page.per_page,
        }
    }
}

/// Canonical listing order: ascending sort-order with unset values last,
/// then newest creation first as the tie-break. Pagination correctness
/// depends on this being total and stable across pages.
pub fn compare_listing(a: &Product, b: &Product) -> Ordering {
    let key = |p: &Product| (p.sort_order.is_none(), p.sort_order, Reverse(p.created_at));
    key(a).cmp(&key(b))
}

/// Build the query for a public listing request.
pub fn compile(params: &SearchParams) -> ProductQuery {
    let mut predicates = Vec::new();
    if let Some(q) = non_blank(&params.search) {
        predicates.push(Predicate::Search(q));
    }
    if let Some(slug) = non_blank(&params.category) {
        predicates.push(Predicate::InCategory(slug));
    }
    if let Some(csv) = non_blank(&params.tags) {
        let slugs: Vec<String> = csv
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if !slugs.is_empty() {
            predicates.push(Predicate::AnyTag(slugs));
        }
    }
    if let Some(v) = params.visible {
        predicates.push(Predicate::Visible(v));
    }
    if let Some(f) = params.featured {
        predicates.push(Predicate::Featured(f));
    }
    ProductQuery::new(predicates, PageSpec::clamped(params.page, params.per_page))
}

/// Query for products related to `reference`: anything sharing one of its
/// tags or its first category, excluding the reference itself.
pub fn related_query(reference: &Product, limit: i64) -> ProductQuery {
    let mut any = Vec::new();
    let tag_slugs: Vec<String> = reference.tags.iter().map(|t| t.slug.clone()).collect();
    if !tag_slugs.is_empty() {
        any.push(Predicate::AnyTag(tag_slugs));
    }
    if let Some(cat) = reference.categories.first() {
        any.push(Predicate::InCategory(cat.slug.clone()));
    }

    let mut predicates = vec![Predicate::NotProduct(reference.id)];
    if !any.is_empty() {
        predicates.push(Predicate::AnyOf(any));
    }
    ProductQuery::new(predicates, PageSpec::clamped(1, limit))
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
