//! Storage backend trait definition.
//!
//! Abstracts where uploaded media bytes live so the media library does not
//! care whether objects sit on local disk or elsewhere.

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

/// Storage error types
#[derive(Debug)]
pub enum StorageError {
    /// Object not found
    NotFound(String),
    /// IO error
    Io(std::io::Error),
    /// Key rejected by the backend
    InvalidKey(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound(key) => write!(f, "Object not found: {}", key),
            StorageError::Io(e) => write!(f, "IO error: {}", e),
            StorageError::InvalidKey(key) => write!(f, "Invalid key: {}", key),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(e.to_string())
        } else {
            StorageError::Io(e)
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage backend trait for pluggable storage.
///
/// Keys are organized by namespace (see [`namespaces`]).
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Get an object by namespace and key
    async fn get(&self, namespace: &str, key: &str) -> StorageResult<Bytes>;

    /// Put an object by namespace and key, replacing any existing object
    async fn put(&self, namespace: &str, key: &str, data: Bytes) -> StorageResult<()>;

    /// Delete an object; deleting a missing object succeeds
    async fn delete(&self, namespace: &str, key: &str) -> StorageResult<()>;

    async fn exists(&self, namespace: &str, key: &str) -> StorageResult<bool>;
}

/// Storage namespaces
pub mod namespaces {
    /// Uploaded media library files
    pub const MEDIA: &str = "media";
}
