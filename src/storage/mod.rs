//! Storage backend abstraction for uploaded media.
//!
//! Only the local filesystem backend is provided; the trait keeps the media
//! library independent of where bytes are kept.

mod backend;
mod config;
mod local;

pub use backend::{namespaces, StorageBackend, StorageError};
pub use config::StorageConfig;
pub use local::LocalStorage;
