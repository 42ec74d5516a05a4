//! `vitrine-core` — catalog foundation building blocks.
//!
//! This crate contains **pure** primitives shared by every other crate
//! (identifiers and the error taxonomy); no infrastructure concerns.

pub mod error;
pub mod id;

pub use error::{CatalogError, CatalogResult};
pub use id::{CategoryId, ImageId, ProductId, TagId};
