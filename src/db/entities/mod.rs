//! Database entities

pub mod attachment;
pub mod font;
pub mod font_meta;

pub use attachment::Entity as Attachment;
pub use font::Entity as Font;
pub use font_meta::Entity as FontMeta;
