//! Font content store: entity CRUD plus per-font metadata.

use std::sync::Arc;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::db::entities::{font, font_meta};
use crate::error::{Result, ServerError};

use super::schema::{FontMeta, FontMetaUpdate, MetaField};

/// Content store for font entities
#[derive(Clone)]
pub struct FontStore {
    db: Arc<DatabaseConnection>,
}

fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

impl FontStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create_font(&self, title: &str) -> Result<font::Model> {
        let now = now();
        let model = font::ActiveModel {
            title: Set(title.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        tracing::info!("Created font {} '{}'", model.id, model.title);
        Ok(model)
    }

    pub async fn get_font(&self, id: i32) -> Result<font::Model> {
        font::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(ServerError::FontNotFound(id))
    }

    /// All fonts, most recently created first
    pub async fn list_fonts(&self) -> Result<Vec<font::Model>> {
        Ok(font::Entity::find()
            .order_by_desc(font::Column::CreatedAt)
            .order_by_desc(font::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn update_title(&self, id: i32, title: &str) -> Result<font::Model> {
        let mut model: font::ActiveModel = self.get_font(id).await?.into();
        model.title = Set(title.to_string());
        model.updated_at = Set(now());
        Ok(model.update(self.db.as_ref()).await?)
    }

    /// Delete a font and every metadata row it owns
    pub async fn delete_font(&self, id: i32) -> Result<()> {
        let font = self.get_font(id).await?;

        font_meta::Entity::delete_many()
            .filter(font_meta::Column::FontId.eq(id))
            .exec(self.db.as_ref())
            .await?;
        font::Entity::delete_by_id(font.id)
            .exec(self.db.as_ref())
            .await?;

        tracing::info!("Deleted font {} '{}'", font.id, font.title);
        Ok(())
    }

    /// Load stored metadata; missing keys keep their defaults
    pub async fn load_meta(&self, id: i32) -> Result<FontMeta> {
        let rows = font_meta::Entity::find()
            .filter(font_meta::Column::FontId.eq(id))
            .all(self.db.as_ref())
            .await?;

        let mut meta = FontMeta::default();
        for row in rows {
            match MetaField::from_meta_key(&row.meta_key) {
                Some(field) => meta.set(field, row.meta_value),
                None => tracing::debug!("Ignoring unknown meta key '{}' on font {}", row.meta_key, id),
            }
        }
        Ok(meta)
    }

    /// Store one field, replacing any previous value
    pub async fn write_field(&self, id: i32, field: MetaField, value: &str) -> Result<()> {
        let row = font_meta::ActiveModel {
            font_id: Set(id),
            meta_key: Set(field.meta_key().to_string()),
            meta_value: Set(value.to_string()),
            ..Default::default()
        };

        font_meta::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([font_meta::Column::FontId, font_meta::Column::MetaKey])
                    .update_column(font_meta::Column::MetaValue)
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        tracing::debug!("font {}: {} = {:?}", id, field.meta_key(), value);
        Ok(())
    }

    /// Write every present field, one write each, and return the write count.
    ///
    /// Writes are independent: a failure leaves earlier fields written.
    pub async fn apply_update(&self, id: i32, update: &FontMetaUpdate) -> Result<usize> {
        let mut writes = 0;
        for (field, value) in update.present() {
            self.write_field(id, field, value).await?;
            writes += 1;
        }
        Ok(writes)
    }
}
