//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{Result, ServerError};
use crate::storage::StorageConfig;

const ENV_STORAGE_PATH: &str = "FONT_MANAGER_STORAGE_PATH";
const ENV_BIND: &str = "FONT_MANAGER_BIND";
const ENV_NONCE_SECRET: &str = "FONT_MANAGER_NONCE_SECRET";
const ENV_MAX_UPLOAD_MB: &str = "FONT_MANAGER_MAX_UPLOAD_MB";

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Data directory holding the database and uploaded media
    pub storage_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Secret used to sign anti-forgery tokens; generated when unset
    pub nonce_secret: Option<String>,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            storage_path: std::env::temp_dir().join("font-manager"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            nonce_secret: None,
            max_upload_bytes: 64 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_STORAGE_PATH).filter(|p| !p.is_empty()) {
            config.storage_path = PathBuf::from(path);
        }

        if let Some(bind) = lookup(ENV_BIND) {
            config.bind_addr = bind
                .parse()
                .map_err(|_| ServerError::Config(format!("{} is not a socket address: {}", ENV_BIND, bind)))?;
        }

        config.nonce_secret = lookup(ENV_NONCE_SECRET).filter(|s| !s.is_empty());

        if let Some(mb) = lookup(ENV_MAX_UPLOAD_MB) {
            let mb: usize = mb
                .parse()
                .map_err(|_| ServerError::Config(format!("{} must be a whole number: {}", ENV_MAX_UPLOAD_MB, mb)))?;
            config.max_upload_bytes = mb
                .checked_mul(1024 * 1024)
                .ok_or_else(|| ServerError::Config(format!("{} is too large: {}", ENV_MAX_UPLOAD_MB, mb)))?;
        }

        Ok(config)
    }

    pub fn database_path(&self) -> PathBuf {
        self.storage_path.join("font-manager.db")
    }

    pub fn media_storage(&self) -> StorageConfig {
        StorageConfig::local(self.storage_path.join("media"))
    }
}
