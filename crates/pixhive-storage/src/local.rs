//! Local filesystem output sink.

use crate::error::{StorageError, StorageResult};
use pixhive_core::{StorageBackend, StoredFile};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage backend.
///
/// One instance owns one destination directory and the base URL it is served
/// under. The directory tree is created once at construction, not per upload.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    upload_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new `LocalStorage`, creating the destination directory tree
    /// if it does not exist (idempotent).
    pub async fn new(upload_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let upload_path = upload_path.into();

        fs::create_dir_all(&upload_path).await.map_err(|e| {
            StorageError::Config(format!(
                "Failed to create storage directory {}: {}",
                upload_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            upload_path,
            base_url,
        })
    }

    pub fn upload_path(&self) -> &Path {
        &self.upload_path
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }

    /// Convert a filename to its filesystem path, rejecting anything that
    /// could escape the destination directory.
    fn filename_to_path(&self, filename: &str) -> StorageResult<PathBuf> {
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(StorageError::InvalidFilename(filename.to_string()));
        }
        Ok(self.upload_path.join(filename))
    }

    /// The stored-file record for a filename in this destination.
    pub fn record_for(&self, filename: &str) -> StoredFile {
        StoredFile {
            destination: self.upload_path.display().to_string(),
            base_url: self.base_url.clone(),
            filename: filename.to_string(),
            storage: self.backend_type(),
        }
    }

    /// Write one rendition's encoded bytes and flush them to disk.
    pub async fn write(&self, filename: &str, data: &[u8]) -> StorageResult<StoredFile> {
        let path = self.filename_to_path(filename)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| StorageError::Sink {
            filename: filename.to_string(),
            source: e,
        })?;

        file.write_all(data).await.map_err(|e| StorageError::Sink {
            filename: filename.to_string(),
            source: e,
        })?;

        file.sync_all().await.map_err(|e| StorageError::Sink {
            filename: filename.to_string(),
            source: e,
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(self.record_for(filename))
    }

    /// Unlink one rendition. A missing file is an error for that path.
    pub async fn delete(&self, filename: &str) -> StorageResult<()> {
        let path = self.filename_to_path(filename)?;

        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(filename.to_string())
            } else {
                StorageError::Deletion {
                    filename: filename.to_string(),
                    source: e,
                }
            }
        })?;

        tracing::info!(path = %path.display(), "Local storage delete successful");

        Ok(())
    }

    /// Check whether a rendition exists on disk.
    pub async fn exists(&self, filename: &str) -> StorageResult<bool> {
        let path = self.filename_to_path(filename)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, "http://localhost:3000/uploads".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_write_then_exists() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let record = storage.write("test.png", b"pixels").await.unwrap();
        assert_eq!(record.filename, "test.png");
        assert_eq!(record.storage, StorageBackend::Local);
        assert!(record.url().ends_with("/test.png"));

        assert!(storage.exists("test.png").await.unwrap());
        assert!(!storage.exists("missing.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        storage.write("gone.png", b"pixels").await.unwrap();
        storage.delete("gone.png").await.unwrap();
        assert!(!storage.exists("gone.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage.delete("never-written.png").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage.write("../escape.png", b"pixels").await;
        assert!(matches!(result, Err(StorageError::InvalidFilename(_))));

        let result = storage.delete("nested/../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidFilename(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidFilename(_))));
    }

    #[tokio::test]
    async fn test_new_creates_directory_tree() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = LocalStorage::new(&nested, "http://localhost/up".to_string())
            .await
            .unwrap();

        assert!(nested.is_dir());
        storage.write("ok.png", b"pixels").await.unwrap();
        assert!(nested.join("ok.png").is_file());
    }
}
