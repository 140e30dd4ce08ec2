//! File storage abstraction for uploaded learning materials.
//!
//! Handlers and services only see [`FileStorage`]; the local filesystem
//! backend is the one shipped. Keys are relative, slash separated paths
//! such as `materials/7f1c...-notes.pdf`.
//!
//! # Example
//!
//! ```ignore
//! use edudesk_core::file_storage::{FileStorage, LocalFileStorage, content_hash};
//!
//! let storage = LocalFileStorage::new(PathBuf::from("./uploads"), 10 * 1024 * 1024);
//! let hash = content_hash(&bytes);
//! let key = storage.save("materials/notes.pdf", &bytes).await?;
//! let bytes = storage.read(&key).await?;
//! storage.delete(&key).await?;
//! ```

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use sha2::{Digest, Sha256};
use tokio::fs;

use crate::errors::AppError;

pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Storage backend for material content.
pub trait FileStorage: Send + Sync {
    /// Save file content under `key` and return the key.
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String>;

    /// Read the full content stored under `key`.
    fn read<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Vec<u8>>;

    /// Delete a file by key. Deleting a missing file succeeds.
    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;

    /// Largest accepted content size in bytes.
    fn max_file_size(&self) -> usize;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("file exceeds maximum size of {max_bytes} bytes")]
    InvalidFileSize { max_bytes: usize },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("file not found")]
    NotFound,

    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidFileSize { .. } => AppError::bad_request(err.to_string()),
            StorageError::InvalidKey(_) => AppError::bad_request(err.to_string()),
            StorageError::NotFound => AppError::not_found("stored file not found"),
            StorageError::IoError(e) => AppError::internal(e),
        }
    }
}

/// Lowercase hex SHA-256 of `content`.
pub fn content_hash(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Stores files in a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    max_file_size: usize,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, max_file_size: usize) -> Self {
        Self {
            base_dir,
            max_file_size,
        }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Validate storage key format to prevent path traversal.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.'))
        {
            return Err(StorageError::InvalidKey(
                "key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String> {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            Ok(key.to_string())
        })
    }

    fn read<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Vec<u8>> {
        Box::pin(async move {
            Self::validate_key(key)?;

            match fs::read(self.base_dir.join(key)).await {
                Ok(bytes) => Ok(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            Self::validate_key(key)?;

            match fs::remove_file(self.base_dir.join(key)).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn max_file_size(&self) -> usize {
        self.max_file_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage(max: usize) -> LocalFileStorage {
        let dir = std::env::temp_dir().join(format!("edudesk-storage-{}", uuid::Uuid::new_v4()));
        LocalFileStorage::new(dir, max)
    }

    #[test]
    fn test_validate_key_accepts_valid_keys() {
        assert!(LocalFileStorage::validate_key("materials/notes.pdf").is_ok());
        assert!(LocalFileStorage::validate_key("materials/abc-123_v2.txt").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_path_traversal() {
        assert!(LocalFileStorage::validate_key("../../../etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("materials/../../secret").is_err());
    }

    #[test]
    fn test_validate_key_rejects_absolute_and_odd_keys() {
        assert!(LocalFileStorage::validate_key("/etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("\\windows\\system32").is_err());
        assert!(LocalFileStorage::validate_key("").is_err());
        assert!(LocalFileStorage::validate_key("materials/a b.txt").is_err());
    }

    #[test]
    fn test_content_hash_is_sha256_hex() {
        assert_eq!(
            content_hash(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[tokio::test]
    async fn test_save_read_delete() {
        let storage = temp_storage(1024);

        let key = storage.save("materials/a.txt", b"content").await.unwrap();
        assert_eq!(key, "materials/a.txt");
        assert_eq!(storage.read(&key).await.unwrap(), b"content");

        storage.delete(&key).await.unwrap();
        assert!(matches!(storage.read(&key).await, Err(StorageError::NotFound)));
        // second delete is a no-op
        storage.delete(&key).await.unwrap();

        let _ = std::fs::remove_dir_all(storage.base_dir());
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_content() {
        let storage = temp_storage(4);
        let err = storage.save("materials/big.bin", b"12345").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidFileSize { max_bytes: 4 }));
    }

    #[test]
    fn test_storage_errors_map_to_app_errors() {
        let err: AppError = StorageError::InvalidFileSize { max_bytes: 1 }.into();
        assert_eq!(err.code, crate::ErrorCode::BadRequest);
        let err: AppError = StorageError::NotFound.into();
        assert_eq!(err.code, crate::ErrorCode::NotFound);
    }
}
