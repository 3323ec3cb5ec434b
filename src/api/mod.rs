pub mod handlers;
pub mod media;
pub mod nonce;

use std::sync::Arc;
use axum::{routing::{get, post}, Router};

pub use handlers::{health, AppState};

use handlers::{media_delete, media_file, media_list, media_upload};

/// Media library endpoints used by the asset picker, plus public file URLs
pub fn media_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/media", post(media_upload))
        .route("/admin/media.json", get(media_list))
        .route("/admin/media/:id/delete", post(media_delete))
        .route("/media/:id/:filename", get(media_file))
}
