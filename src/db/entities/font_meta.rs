//! Per-font metadata entity
//!
//! One row per (font, key). Keys come from `fonts::schema::MetaField`;
//! values are stored as plain text.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "font_meta")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub font_id: i32,
    pub meta_key: String,
    pub meta_value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::font::Entity",
        from = "Column::FontId",
        to = "super::font::Column::Id"
    )]
    Font,
}

impl Related<super::font::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Font.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
