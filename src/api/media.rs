//! Media library backing the asset picker.
//!
//! Uploaded files are stored content-addressed (SHA-256 of the bytes) in the
//! `media` storage namespace; an attachment row keeps the filename and MIME
//! type. Uploads are accepted by filename extension only.

use std::sync::Arc;

use bytes::Bytes;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use sha2::{Digest, Sha256};

use crate::db::entities::attachment;
use crate::error::{Result, ServerError};
use crate::fonts::PickedAsset;
use crate::registry::MimeAllowlist;
use crate::storage::{namespaces, StorageBackend};

pub struct MediaLibrary {
    db: Arc<DatabaseConnection>,
    storage: Arc<dyn StorageBackend>,
}

impl MediaLibrary {
    pub fn new(db: Arc<DatabaseConnection>, storage: Arc<dyn StorageBackend>) -> Self {
        Self { db, storage }
    }

    /// Store an uploaded file if the allowlist knows its extension
    pub async fn upload(
        &self,
        mimes: &MimeAllowlist,
        filename: &str,
        data: Bytes,
    ) -> Result<attachment::Model> {
        let filename = clean_filename(filename)
            .ok_or_else(|| ServerError::InvalidRequest("Missing filename".to_string()))?;
        let mime_type = mimes
            .mime_for(&filename)
            .ok_or_else(|| ServerError::UnsupportedMediaType(filename.clone()))?
            .to_string();

        let key = content_key(&data);
        let size = data.len() as i64;
        if !self.storage.exists(namespaces::MEDIA, &key).await? {
            self.storage.put(namespaces::MEDIA, &key, data).await?;
        }

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;

        let model = attachment::ActiveModel {
            filename: Set(filename),
            mime_type: Set(mime_type),
            storage_key: Set(key),
            size: Set(size),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        tracing::info!(
            "Stored attachment {} '{}' ({}, {} bytes)",
            model.id,
            model.filename,
            model.mime_type,
            model.size
        );
        Ok(model)
    }

    /// All attachments, newest first
    pub async fn list(&self) -> Result<Vec<attachment::Model>> {
        Ok(attachment::Entity::find()
            .order_by_desc(attachment::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<attachment::Model> {
        attachment::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(ServerError::MediaNotFound(id))
    }

    pub async fn read(&self, attachment: &attachment::Model) -> Result<Bytes> {
        Ok(self
            .storage
            .get(namespaces::MEDIA, &attachment.storage_key)
            .await?)
    }

    /// Delete an attachment; its bytes go once nothing else references them
    pub async fn delete(&self, id: i32) -> Result<()> {
        let model = self.get(id).await?;
        attachment::Entity::delete_by_id(model.id)
            .exec(self.db.as_ref())
            .await?;

        let still_used = attachment::Entity::find()
            .filter(attachment::Column::StorageKey.eq(&model.storage_key))
            .count(self.db.as_ref())
            .await?;
        if still_used == 0 {
            self.storage
                .delete(namespaces::MEDIA, &model.storage_key)
                .await?;
        }

        tracing::info!("Deleted attachment {} '{}'", model.id, model.filename);
        Ok(())
    }
}

/// Public URL an attachment is served from
pub fn media_url(attachment: &attachment::Model) -> String {
    format!("/media/{}/{}", attachment.id, attachment.filename)
}

/// Picker descriptor for an attachment
pub fn descriptor(attachment: &attachment::Model) -> PickedAsset {
    PickedAsset {
        id: attachment.id,
        filename: attachment.filename.clone(),
        url: media_url(attachment),
        mime_type: attachment.mime_type.clone(),
    }
}

fn content_key(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Last path component with anything outside `[A-Za-z0-9._-]` replaced
fn clean_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
