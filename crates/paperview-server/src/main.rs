//! Paperview document gateway
//!
//! Authenticated HTTP endpoints for listing PDF documents and streaming
//! their bytes for inline viewing, backed by one of two interchangeable
//! storage backends selected once at startup.

use axum::{Router, response::Json, routing::get};
use paperview_store::{DocumentStore, LocalDirStore, ObjectStoreProvider};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod auth;
mod config;
mod error;
mod routes;

use config::{ServerConfig, StorageBackend};
use error::Result;

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: ServerConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "paperview_server=debug,tower_http=debug".to_string()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    info!(
        "Starting paperview gateway on {}:{}",
        config.host, config.port
    );

    let store = build_store(&config).await?;

    let state = AppState {
        store,
        config: config.clone(),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("Gateway listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Construct the selected storage backend.
///
/// The only place in the process that branches on the selection; everything
/// downstream sees `dyn DocumentStore`.
async fn build_store(config: &ServerConfig) -> Result<Arc<dyn DocumentStore>> {
    match config.backend {
        StorageBackend::ObjectStore => {
            let provider = ObjectStoreProvider::from_env().await?;
            info!(
                bucket = provider.bucket(),
                "serving documents from object store"
            );
            Ok(Arc::new(provider))
        }
        StorageBackend::LocalDir => {
            let store = LocalDirStore::new(&config.local_pdfs_dir);
            info!(
                root = %store.root().display(),
                "serving documents from local directory"
            );
            Ok(Arc::new(store))
        }
    }
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/documents", routes::documents::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Result<Json<Value>> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "paperview-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": time::OffsetDateTime::now_utc()
    })))
}
