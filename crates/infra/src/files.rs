//! Uploaded image file storage.
//!
//! Validation happens here (extension whitelist, size cap) so every store
//! implementation rejects the same payloads. Deletion is best-effort:
//! failures are logged and swallowed, never fatal to the surrounding
//! operation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use uuid::Uuid;

use vitrine_core::{CatalogError, CatalogResult};

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "svg"];
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

pub trait FileStore: Send + Sync {
    /// Validate and persist an uploaded file; returns the public URL path
    /// (`/files/{name}`) stored on the image.
    fn save(&self, original_name: &str, bytes: &[u8]) -> CatalogResult<String>;
    /// Best-effort removal by the URL returned from `save`.
    fn delete(&self, url: &str);
}

/// Shared validation: empty, oversized, or disallowed-extension payloads
/// are rejected before anything touches disk. Returns the lowercased
/// extension.
fn validate(original_name: &str, bytes: &[u8]) -> CatalogResult<String> {
    if bytes.is_empty() {
        return Err(CatalogError::validation("cannot store an empty file"));
    }
    if bytes.len() > MAX_FILE_BYTES {
        return Err(CatalogError::validation("file exceeds the 5 MB upload limit"));
    }
    let extension = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .ok_or_else(|| CatalogError::validation("file name has no extension"))?;
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(CatalogError::validation(format!(
            "file type {extension:?} not allowed; allowed: {ALLOWED_EXTENSIONS:?}"
        )));
    }
    Ok(extension)
}

fn url_to_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Disk-backed store under a single uploads directory; files get UUID names
/// so originals can never collide or traverse paths.
#[derive(Debug)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    /// Creates the uploads directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> CatalogResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .map_err(|e| CatalogError::storage(format!("creating uploads dir: {e}")))?;
        Ok(Self { root })
    }
}

impl FileStore for LocalFileStore {
    fn save(&self, original_name: &str, bytes: &[u8]) -> CatalogResult<String> {
        let extension = validate(original_name, bytes)?;
        let name = format!("{}.{extension}", Uuid::now_v7());
        let target = self.root.join(&name);
        std::fs::write(&target, bytes)
            .map_err(|e| CatalogError::storage(format!("writing {}: {e}", target.display())))?;
        Ok(format!("/files/{name}"))
    }

    fn delete(&self, url: &str) {
        let target = self.root.join(url_to_name(url));
        if let Err(e) = std::fs::remove_file(&target) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %target.display(), error = %e, "failed to delete upload");
            }
        }
    }
}

/// In-memory store for dev/tests.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.files
            .lock()
            .map(|f| f.contains_key(url_to_name(url)))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.files.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FileStore for MemoryFileStore {
    fn save(&self, original_name: &str, bytes: &[u8]) -> CatalogResult<String> {
        let extension = validate(original_name, bytes)?;
        let name = format!("{}.{extension}", Uuid::now_v7());
        self.files
            .lock()
            .map_err(|_| CatalogError::storage("file store lock poisoned"))?
            .insert(name.clone(), bytes.to_vec());
        Ok(format!("/files/{name}"))
    }

    fn delete(&self, url: &str) {
        if let Ok(mut files) = self.files.lock() {
            files.remove(url_to_name(url));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_oversized_and_disallowed_files() {
        let store = MemoryFileStore::new();
        assert!(matches!(
            store.save("a.png", &[]),
            Err(CatalogError::Validation(_))
        ));
        assert!(matches!(
            store.save("a.png", &vec![0u8; MAX_FILE_BYTES + 1]),
            Err(CatalogError::Validation(_))
        ));
        assert!(matches!(
            store.save("a.exe", b"data"),
            Err(CatalogError::Validation(_))
        ));
        assert!(matches!(
            store.save("noextension", b"data"),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn saves_under_a_fresh_name_and_deletes_by_url() {
        let store = MemoryFileStore::new();
        let url = store.save("Photo Originale.JPG", b"data").unwrap();
        assert!(url.starts_with("/files/"));
        assert!(url.ends_with(".jpg"));
        assert!(store.contains(&url));

        store.delete(&url);
        assert!(!store.contains(&url));
        // Deleting again is a no-op, not an error.
        store.delete(&url);
    }

    #[test]
    fn local_store_round_trips_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).unwrap();
        let url = store.save("wheel.webp", b"bytes").unwrap();

        let name = url.rsplit('/').next().unwrap();
        assert_eq!(std::fs::read(dir.path().join(name)).unwrap(), b"bytes");

        store.delete(&url);
        assert!(!dir.path().join(name).exists());
        store.delete("/files/never-existed.png"); // swallowed
    }
}
