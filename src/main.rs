mod api;
mod config;
mod db;
mod error;
mod fonts;
mod registry;
mod storage;
mod web_ui;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::nonce::NonceIssuer;
use api::AppState;
use config::ServerConfig;
use registry::{register_font_manager, Registry};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "font_manager=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    // Initialize database
    let db_path = config.database_path();
    let db = db::init_database(&db_path)
        .await
        .expect("Failed to initialize database");
    let db = Arc::new(db);
    tracing::info!("Database initialized at {:?}", db_path);

    let media_storage = config
        .media_storage()
        .build()
        .await
        .expect("Failed to initialize media storage");

    // Explicit registration of content types, upload types and stylesheets
    let mut registry = Registry::default();
    register_font_manager(&mut registry);

    let nonces = match &config.nonce_secret {
        Some(secret) => NonceIssuer::new(secret.as_bytes()),
        None => {
            tracing::warn!("FONT_MANAGER_NONCE_SECRET not set; forms will expire on restart");
            NonceIssuer::with_random_secret()
        }
    };

    let addr = config.bind_addr;
    let body_limit = config.max_upload_bytes;
    let state = Arc::new(AppState::new(registry, db, media_storage, nonces));

    let app = Router::new()
        .route("/health", get(api::health))
        // Media library backing the asset picker
        .merge(api::media_router())
        // Admin pages
        .merge(web_ui::router())
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http());

    tracing::info!("Font Manager starting on http://{}", addr);
    tracing::info!("Admin UI: http://{}/admin/fonts", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
