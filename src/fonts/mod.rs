//! Font entities: metadata schema, content store, editor and slot model.

pub mod editor;
pub mod sanitize;
pub mod schema;
pub mod slots;
pub mod store;

pub use editor::{render_editor, save_font_meta, FontSubmission, SaveOutcome};
pub use schema::FontFormat;
pub use slots::PickedAsset;
pub use store::FontStore;
