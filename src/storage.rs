//! Storage for uploaded receipt images on disk.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from persisting an uploaded image.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create uploads directory: {0}")]
    DirectoryCreateFailed(#[source] std::io::Error),

    #[error("failed to save image: {0}")]
    ImageWriteFailed(#[source] std::io::Error),
}

/// A successfully persisted image.
#[derive(Debug, Clone)]
pub struct StoredImage {
    /// Generated on-disk filename: `<uuid>_<original name>`.
    pub stored_name: String,
    /// Absolute path of the saved file.
    pub path: PathBuf,
}

impl StoredImage {
    /// Public URL under which the stored image is served.
    pub fn public_url(&self) -> String {
        format!("/uploads/{}", self.stored_name)
    }
}

/// Persists uploaded images under a managed uploads directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    uploads_dir: PathBuf,
}

impl ImageStore {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }

    /// Save image bytes under a collision-free name.
    ///
    /// The name is `<fresh uuid>_<original name>`, so repeated uploads of
    /// the same filename never collide. Directory creation is idempotent.
    pub fn save(&self, bytes: &[u8], original_name: &str) -> Result<StoredImage, StorageError> {
        std::fs::create_dir_all(&self.uploads_dir).map_err(StorageError::DirectoryCreateFailed)?;

        let stored_name = format!("{}_{}", uuid::Uuid::new_v4(), original_name);
        let path = self.uploads_dir.join(&stored_name);
        std::fs::write(&path, bytes).map_err(StorageError::ImageWriteFailed)?;

        Ok(StoredImage { stored_name, path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_writes_bytes_and_creates_directory() {
        let dir = tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("uploads"));

        let stored = store.save(b"jpeg bytes", "receipt.jpg").unwrap();

        assert!(stored.path.exists());
        assert_eq!(std::fs::read(&stored.path).unwrap(), b"jpeg bytes");
        assert!(stored.stored_name.ends_with("_receipt.jpg"));
    }

    #[test]
    fn save_is_collision_free_for_identical_names() {
        let dir = tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let a = store.save(b"a", "same.png").unwrap();
        let b = store.save(b"b", "same.png").unwrap();

        assert_ne!(a.stored_name, b.stored_name);
        assert_eq!(std::fs::read(&a.path).unwrap(), b"a");
        assert_eq!(std::fs::read(&b.path).unwrap(), b"b");
    }

    #[test]
    fn public_url_is_under_uploads() {
        let stored = StoredImage {
            stored_name: "abc_receipt.jpg".to_string(),
            path: PathBuf::from("/tmp/abc_receipt.jpg"),
        };
        assert_eq!(stored.public_url(), "/uploads/abc_receipt.jpg");
    }

    #[test]
    fn save_into_existing_directory_is_not_an_error() {
        let dir = tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        store.save(b"x", "a.jpg").unwrap();
        store.save(b"y", "b.jpg").unwrap();
    }
}
