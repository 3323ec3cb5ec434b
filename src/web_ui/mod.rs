//! Web UI Module
//!
//! Admin pages for managing fonts: the list, the create form and the entity
//! editor with its repeatable asset groups. Mount with `.merge(web_ui::router())`.

mod routes;
mod templates;

use axum::Router;
use std::sync::Arc;

use crate::api::AppState;

/// Create the web UI router.
pub fn router() -> Router<Arc<AppState>> {
    routes::create_router()
}
