//! `vitrine-catalog` — pure catalog domain.
//!
//! Entities, slug derivation, the filter/sort/paginate query engine, the
//! single-cover-image invariant, and change events. No IO and no async;
//! storage and transport live in `vitrine-infra` / `vitrine-api`.

pub mod cover;
pub mod event;
pub mod filter;
pub mod product;
pub mod slug;

pub use event::{ChangeEvent, ChangeKind};
pub use filter::{MAX_PER_PAGE, PageResult, Predicate, ProductQuery, SearchParams};
pub use product::{
    Category, CategoryDraft, Image, ImageDraft, Product, ProductDraft, SpecMap, Tag, TagDraft,
};
