use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::media::{descriptor, MediaLibrary};
use super::nonce::{NonceIssuer, MEDIA_UPLOAD_ACTION};
use crate::error::{Result, ServerError};
use crate::fonts::{FontStore, PickedAsset};
use crate::registry::Registry;
use crate::storage::StorageBackend;

/// Application state shared across handlers
pub struct AppState {
    pub registry: Registry,
    pub fonts: FontStore,
    pub media: MediaLibrary,
    pub nonces: NonceIssuer,
}

impl AppState {
    pub fn new(
        registry: Registry,
        db: Arc<DatabaseConnection>,
        storage: Arc<dyn StorageBackend>,
        nonces: NonceIssuer,
    ) -> Self {
        Self {
            registry,
            fonts: FontStore::new(db.clone()),
            media: MediaLibrary::new(db, storage),
            nonces,
        }
    }
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// Query parameters of media library requests
#[derive(Debug, Deserialize)]
pub struct MediaParams {
    #[serde(default)]
    pub filename: String,
    #[serde(rename = "_nonce", default)]
    pub nonce: String,
}

fn check_media_nonce(state: &AppState, params: &MediaParams) -> Result<()> {
    if state.nonces.verify(&params.nonce, MEDIA_UPLOAD_ACTION) {
        Ok(())
    } else {
        tracing::warn!("Rejected media request: bad anti-forgery token");
        Err(ServerError::AuthorizationFailure)
    }
}

/// Upload a file into the media library.
///
/// POST /admin/media?filename=<name>&_nonce=<token>, raw file bytes as body
pub async fn media_upload(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MediaParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PickedAsset>> {
    check_media_nonce(&state, &params)?;

    let declared = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info!(
        "Media upload: filename={} size={} content_type={}",
        params.filename,
        body.len(),
        declared
    );

    let model = state
        .media
        .upload(&state.registry.mimes, &params.filename, body)
        .await?;
    Ok(Json(descriptor(&model)))
}

/// List the media library for the asset picker
pub async fn media_list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<PickedAsset>>> {
    let items = state.media.list().await?;
    Ok(Json(items.iter().map(descriptor).collect()))
}

/// Remove an attachment from the media library
pub async fn media_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(params): Query<MediaParams>,
) -> Result<StatusCode> {
    check_media_nonce(&state, &params)?;
    state.media.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Serve a stored attachment under its public URL
pub async fn media_file(
    State(state): State<Arc<AppState>>,
    Path((id, filename)): Path<(i32, String)>,
) -> Result<Response> {
    let model = state.media.get(id).await?;
    if model.filename != filename {
        return Err(ServerError::MediaNotFound(id));
    }

    let data = state.media.read(&model).await?;
    tracing::debug!("Serving attachment {} ({} bytes)", model.id, data.len());

    Ok((
        [
            (header::CONTENT_TYPE, model.mime_type.clone()),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable".to_string()),
        ],
        Body::from(data),
    )
        .into_response())
}
