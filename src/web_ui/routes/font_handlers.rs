//! Font admin pages: list, create, edit/save and delete.

use axum::{
    extract::{Form, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::utils::{form_value, notice_for, page_context, render_error, render_server_error, render_template};
use crate::api::nonce::{font_action, CREATE_FONT_ACTION, MEDIA_UPLOAD_ACTION};
use crate::api::AppState;
use crate::error::Result;
use crate::fonts::sanitize::sanitize_text_field;
use crate::fonts::{render_editor, save_font_meta, FontFormat, FontSubmission, SaveOutcome};
use crate::web_ui::templates::ADMIN_CSS;

/// Host-level token field on admin forms
const NONCE_FIELD: &str = "_nonce";
const TITLE_FIELD: &str = "post_title";

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewFontForm {
    #[serde(default)]
    pub post_title: String,
    #[serde(rename = "_nonce", default)]
    pub nonce: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(rename = "_nonce", default)]
    pub nonce: String,
}

/// Font header shown above the editor
#[derive(Serialize)]
struct FontHeader<'a> {
    id: i32,
    title: &'a str,
}

/// One row of the font list
#[derive(Serialize)]
struct FontRow {
    id: i32,
    title: String,
    weight: &'static str,
    style: &'static str,
    formats: Vec<&'static str>,
    delete_nonce: String,
}

fn invalid_request(state: &AppState) -> Response {
    render_error(state, StatusCode::FORBIDDEN, "Invalid request. Please try again.")
}

fn edit_url(id: i32, message: &str) -> String {
    format!("/admin/fonts/{}/edit?message={}", id, message)
}

/// Home page
pub async fn index() -> Redirect {
    Redirect::to("/admin/fonts")
}

/// List all fonts
pub async fn list_fonts(State(state): State<Arc<AppState>>, Query(query): Query<PageQuery>) -> Response {
    match list_fonts_impl(&state, &query).await {
        Ok(response) => response,
        Err(e) => render_server_error(&state, e),
    }
}

async fn list_fonts_impl(state: &AppState, query: &PageQuery) -> Result<Response> {
    let mut rows = Vec::new();
    for font in state.fonts.list_fonts().await? {
        let meta = state.fonts.load_meta(font.id).await?;
        rows.push(FontRow {
            id: font.id,
            title: font.title,
            weight: meta.weight().label(),
            style: meta.style().label(),
            formats: meta.formats_set().into_iter().map(FontFormat::tag).collect(),
            delete_nonce: state.nonces.create(&font_action("delete", font.id)),
        });
    }

    let mut context = page_context(state);
    context.insert("fonts", &rows);
    context.insert("notice", &notice_for(query.message.as_deref()));
    Ok(render_template("fonts.html", &context))
}

/// New font form
pub async fn new_font(State(state): State<Arc<AppState>>) -> Response {
    let mut context = page_context(&state);
    context.insert("nonce", &state.nonces.create(CREATE_FONT_ACTION));
    render_template("font_new.html", &context)
}

/// Create a font (POST)
pub async fn create_font(State(state): State<Arc<AppState>>, Form(form): Form<NewFontForm>) -> Response {
    if !state.nonces.verify(&form.nonce, CREATE_FONT_ACTION) {
        tracing::warn!("Rejected font creation: bad anti-forgery token");
        return invalid_request(&state);
    }

    let title = sanitize_text_field(&form.post_title);
    match state.fonts.create_font(&title).await {
        Ok(font) => Redirect::to(&edit_url(font.id, "created")).into_response(),
        Err(e) => render_server_error(&state, e),
    }
}

/// Edit a font (GET - show editor)
pub async fn edit_font(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Response {
    match edit_font_impl(&state, id, &query).await {
        Ok(response) => response,
        Err(e) => render_server_error(&state, e),
    }
}

async fn edit_font_impl(state: &AppState, id: i32, query: &PageQuery) -> Result<Response> {
    let font = state.fonts.get_font(id).await?;
    let meta = state.fonts.load_meta(id).await?;

    let accept: Vec<String> = FontFormat::ALL.iter().map(|f| format!(".{}", f.tag())).collect();
    let allowed: Vec<&str> = state.registry.mimes.extensions().collect();

    let mut context = page_context(state);
    context.insert("font", &FontHeader { id: font.id, title: &font.title });
    context.insert("editor", &render_editor(&meta, &state.nonces));
    context.insert("title_nonce", &state.nonces.create(&font_action("update", id)));
    context.insert("delete_nonce", &state.nonces.create(&font_action("delete", id)));
    context.insert("media_nonce", &state.nonces.create(MEDIA_UPLOAD_ACTION));
    context.insert("accept", &accept.join(","));
    context.insert("allowed_types", &allowed.join(", "));
    context.insert("notice", &notice_for(query.message.as_deref()));
    Ok(render_template("font_edit.html", &context))
}

/// Save a font (POST): title first, then the metadata box
pub async fn save_font(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let host_token = form_value(&pairs, NONCE_FIELD).unwrap_or_default();
    if !state.nonces.verify(host_token, &font_action("update", id)) {
        tracing::warn!("Rejected update of font {}: bad anti-forgery token", id);
        return invalid_request(&state);
    }

    match save_font_impl(&state, id, &pairs).await {
        Ok(()) => Redirect::to(&edit_url(id, "updated")).into_response(),
        Err(e) => render_server_error(&state, e),
    }
}

async fn save_font_impl(state: &AppState, id: i32, pairs: &[(String, String)]) -> Result<()> {
    let mut font = state.fonts.get_font(id).await?;
    if let Some(title) = form_value(pairs, TITLE_FIELD) {
        font = state.fonts.update_title(id, &sanitize_text_field(title)).await?;
    }

    let submission = FontSubmission::from_pairs(pairs);
    if save_font_meta(&state.fonts, &state.nonces, &font, &submission).await? == SaveOutcome::Rejected {
        tracing::debug!("Metadata of font {} left unchanged", id);
    }
    Ok(())
}

/// Delete a font (POST)
pub async fn delete_font(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<DeleteForm>,
) -> Response {
    if !state.nonces.verify(&form.nonce, &font_action("delete", id)) {
        tracing::warn!("Rejected deletion of font {}: bad anti-forgery token", id);
        return invalid_request(&state);
    }

    match state.fonts.delete_font(id).await {
        Ok(()) => Redirect::to("/admin/fonts?message=deleted").into_response(),
        Err(e) => render_server_error(&state, e),
    }
}

/// Registered admin stylesheet
pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], ADMIN_CSS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::nonce::{NonceIssuer, FONT_META_ACTION};
    use crate::db::init_memory_database;
    use crate::fonts::schema::{FontStyle, FontWeight, MetaField};
    use crate::registry::{register_font_manager, Registry};
    use crate::storage::{LocalStorage, StorageBackend};
    use tempfile::TempDir;

    async fn state(dir: &TempDir) -> Arc<AppState> {
        let db = Arc::new(init_memory_database().await.unwrap());
        let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(dir.path().to_path_buf()));
        let mut registry = Registry::default();
        register_font_manager(&mut registry);
        Arc::new(AppState::new(
            registry,
            db,
            storage,
            NonceIssuer::new("test-secret"),
        ))
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_empty_list_shows_not_found_label() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;

        let response = list_fonts(State(state), Query(PageQuery::default())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Sorry, no fonts have been added."));
        // Registered stylesheets are linked from every page
        assert!(html.contains(r#"id="font-manager-css""#));
        assert!(html.contains("font-manager.css?ver=1.0.0"));
        // Menu entry carries the content type's icon
        assert!(html.contains(r#"<span class="menu-icon" aria-hidden="true">B</span>Fonts"#));
    }

    #[tokio::test]
    async fn test_create_requires_token() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;

        let forged = NewFontForm { post_title: "Inter".into(), nonce: "forged".into() };
        let response = create_font(State(state.clone()), Form(forged)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(state.fonts.list_fonts().await.unwrap().is_empty());

        let form = NewFontForm {
            post_title: " <b>Inter</b> ".into(),
            nonce: state.nonces.create(CREATE_FONT_ACTION),
        };
        let response = create_font(State(state.clone()), Form(form)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let fonts = state.fonts.list_fonts().await.unwrap();
        assert_eq!(fonts.len(), 1);
        assert_eq!(fonts[0].title, "Inter");
        assert_eq!(location(&response), edit_url(fonts[0].id, "created"));
    }

    #[tokio::test]
    async fn test_edit_page_renders_meta_box() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;
        let font = state.fonts.create_font("Inter").await.unwrap();

        let response = edit_font(State(state.clone()), Path(font.id), Query(PageQuery::default())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;

        assert!(html.contains("Manage Your Font Files"));
        assert!(html.contains(r#"name="font_meta_nonce""#));
        assert!(html.contains(r#"<option value="normal" selected>"#));
        for format in FontFormat::ALL {
            assert!(html.contains(&format!(r#"data-format="{}""#, format.tag())));
        }
        assert!(html.contains(r#"id="additional-font-files-container""#));
        assert!(html.contains("Add Font Variations"));
        assert!(html.contains("Delete Group"));
        assert!(html.contains("Select a Font"));
        assert!(html.contains("Use this font"));
    }

    #[tokio::test]
    async fn test_edit_missing_font_is_404() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;

        let response = edit_font(State(state), Path(42), Query(PageQuery::default())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Font not found: 42"));
    }

    #[tokio::test]
    async fn test_save_updates_title_and_meta() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;
        let font = state.fonts.create_font("Inter").await.unwrap();

        let host = state.nonces.create(&font_action("update", font.id));
        let meta = state.nonces.create(FONT_META_ACTION);
        let form = pairs(&[
            ("_nonce", host.as_str()),
            ("post_title", "Inter Variable"),
            ("font_meta_nonce", meta.as_str()),
            ("font_weight", "700"),
            ("font_style", "italic"),
            ("font_url_woff2", "/media/1/Inter.woff2"),
            // an added variation group repeats the base names
            ("font_url_woff2", "/media/2/Other.woff2"),
        ]);

        let response = save_font(State(state.clone()), Path(font.id), Form(form)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), edit_url(font.id, "updated"));

        assert_eq!(state.fonts.get_font(font.id).await.unwrap().title, "Inter Variable");
        let stored = state.fonts.load_meta(font.id).await.unwrap();
        assert_eq!(stored.weight(), FontWeight::W700);
        assert_eq!(stored.style(), FontStyle::Italic);
        assert_eq!(stored.url(FontFormat::Woff2), "/media/1/Inter.woff2");
    }

    #[tokio::test]
    async fn test_save_with_bad_meta_token_keeps_meta() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;
        let font = state.fonts.create_font("Inter").await.unwrap();

        let host = state.nonces.create(&font_action("update", font.id));
        let form = pairs(&[
            ("_nonce", host.as_str()),
            ("post_title", "Renamed"),
            ("font_meta_nonce", "forged"),
            ("font_weight", "100"),
        ]);

        let response = save_font(State(state.clone()), Path(font.id), Form(form)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(state.fonts.get_font(font.id).await.unwrap().title, "Renamed");
        assert_eq!(state.fonts.load_meta(font.id).await.unwrap().weight(), FontWeight::Normal);
    }

    #[tokio::test]
    async fn test_save_token_is_bound_to_font() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;
        let a = state.fonts.create_font("A").await.unwrap();
        let b = state.fonts.create_font("B").await.unwrap();

        let token_for_a = state.nonces.create(&font_action("update", a.id));
        let form = pairs(&[("_nonce", token_for_a.as_str()), ("post_title", "Hijacked")]);

        let response = save_font(State(state.clone()), Path(b.id), Form(form)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(state.fonts.get_font(b.id).await.unwrap().title, "B");
    }

    #[tokio::test]
    async fn test_delete_font() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;
        let font = state.fonts.create_font("Inter").await.unwrap();

        let forged = DeleteForm { nonce: state.nonces.create(&font_action("update", font.id)) };
        let response = delete_font(State(state.clone()), Path(font.id), Form(forged)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let form = DeleteForm { nonce: state.nonces.create(&font_action("delete", font.id)) };
        let response = delete_font(State(state.clone()), Path(font.id), Form(form)).await;
        assert_eq!(location(&response), "/admin/fonts?message=deleted");
        assert!(state.fonts.list_fonts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_shows_meta_summary() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;
        let font = state.fonts.create_font("Inter").await.unwrap();
        state
            .fonts
            .write_field(font.id, MetaField::Url(FontFormat::Ttf), "/media/1/a.ttf")
            .await
            .unwrap();

        let response = list_fonts(State(state), Query(PageQuery { message: Some("updated".into()) })).await;
        let html = body_text(response).await;
        assert!(html.contains("Font updated."));
        assert!(html.contains("Inter"));
        assert!(html.contains("ttf"));
    }
}
