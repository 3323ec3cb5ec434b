//! Storage configuration.

use std::path::PathBuf;
use std::sync::Arc;

use super::{LocalStorage, StorageBackend};

/// Storage backend type
#[derive(Debug, Clone)]
pub enum StorageType {
    /// Local filesystem storage
    Local { path: PathBuf },
}

impl Default for StorageType {
    fn default() -> Self {
        StorageType::Local {
            path: std::env::temp_dir().join("font-manager").join("media"),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub storage_type: StorageType,
}

impl StorageConfig {
    /// Create config for local storage at the given path
    pub fn local(path: PathBuf) -> Self {
        Self {
            storage_type: StorageType::Local { path },
        }
    }

    /// Build a storage backend from this config
    pub async fn build(&self) -> std::io::Result<Arc<dyn StorageBackend>> {
        match &self.storage_type {
            StorageType::Local { path } => {
                tokio::fs::create_dir_all(path).await?;
                Ok(Arc::new(LocalStorage::new(path.clone())))
            }
        }
    }
}
