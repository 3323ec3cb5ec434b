//! Shared utilities and helper functions for web UI.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tera::Context;

use crate::api::AppState;
use crate::error::ServerError;
use crate::registry::FONT_TYPE;
use crate::web_ui::templates;

/// Context every admin page starts from: registered stylesheets, menu
/// entries and the font type's labels.
pub fn page_context(state: &AppState) -> Context {
    let mut context = Context::new();
    context.insert("styles", state.registry.styles.all());
    context.insert("content_types", &state.registry.content_types);
    if let Some(font_type) = state.registry.content_type(FONT_TYPE) {
        context.insert("labels", &font_type.labels);
    }
    context
}

/// Helper to render a template
pub fn render_template(name: &str, context: &Context) -> Response {
    match templates::render(name, context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Template error: {}", e)).into_response()
        }
    }
}

/// Helper to render an error page
pub fn render_error(state: &AppState, status: StatusCode, message: &str) -> Response {
    let mut context = page_context(state);
    context.insert("message", message);

    match templates::render("error.html", &context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(_) => (status, message.to_string()).into_response(),
    }
}

/// Render a failed operation as an error page with the matching status
pub fn render_server_error(state: &AppState, err: ServerError) -> Response {
    let status = err.status_code();
    let message = if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
        "Internal server error".to_string()
    } else {
        err.to_string()
    };
    render_error(state, status, &message)
}

/// First value submitted under `name`
pub fn form_value<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Status line shown above a page after a redirect
pub fn notice_for(message: Option<&str>) -> Option<&'static str> {
    match message? {
        "created" => Some("Font created."),
        "updated" => Some("Font updated."),
        "deleted" => Some("Font deleted."),
        _ => None,
    }
}
