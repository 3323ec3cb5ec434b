//! Web UI route handlers.

mod font_handlers;
mod utils;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::AppState;
use crate::registry::ADMIN_STYLESHEET_PATH;
use font_handlers::{create_font, delete_font, edit_font, index, list_fonts, new_font, save_font, stylesheet};

/// Create the web UI router with all admin pages under /admin
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/admin/fonts", get(list_fonts).post(create_font))
        .route("/admin/fonts/new", get(new_font))
        .route("/admin/fonts/:id", post(save_font))
        .route("/admin/fonts/:id/edit", get(edit_font))
        .route("/admin/fonts/:id/delete", post(delete_font))
        .route(ADMIN_STYLESHEET_PATH, get(stylesheet))
}
