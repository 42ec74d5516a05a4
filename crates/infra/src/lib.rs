//! `vitrine-infra` — process-wide collaborators around the catalog domain.
//!
//! Storage (trait + in-memory implementation), the full-flush read-through
//! cache, the change-event broadcaster, and uploaded-file storage. The
//! service in `vitrine-api` is the sole mutator of the cache and the
//! subscriber set.

pub mod broadcast;
pub mod cache;
pub mod files;
pub mod store;

pub use broadcast::EventBroadcaster;
pub use cache::CatalogCache;
pub use files::{FileStore, LocalFileStore, MemoryFileStore};
pub use store::{CatalogStore, InMemoryCatalogStore, ProductRecord};
