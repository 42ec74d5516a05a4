//! Catalog error model.

use thiserror::Error;

/// Result type used across the catalog layers.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Structured error raised by the catalog core.
///
/// Keep this focused on deterministic failures the transport layer can map
/// to a user-visible response. Broadcast and file-cleanup failures are
/// swallowed at their call sites and never appear here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A lookup or mutation target does not exist.
    #[error("not found")]
    NotFound,

    /// Input failed validation (bad payload, disallowed upload, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Slug input normalized to nothing usable.
    #[error("invalid slug: {0}")]
    InvalidSlug(String),

    /// The storage collaborator failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl CatalogError {
    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_slug(msg: impl Into<String>) -> Self {
        Self::InvalidSlug(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
