pub mod catalog;
pub mod config;
mod data_formats;
pub mod db_helpers;
pub mod errors;
mod handlers;
pub mod models;
mod password;
pub mod seed;

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use data_formats::*;
use handlers::*;
use std::{
    future::Future,
    net::{SocketAddr, TcpListener},
    sync::Arc,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog::ArticleCatalog;
use config::Config;
use db_helpers::{init_db, MemStorage, SqliteStorage, Storage};

pub type JsonResponse<T> = (StatusCode, Json<T>);

pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run_app(app: Router, address: SocketAddr, catalog: Arc<ArticleCatalog>) -> Result<()> {
    let listener =
        TcpListener::bind(address).with_context(|| format!("Failed to bind to {address}"))?;
    serve(listener, app, catalog, shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    catalog: Arc<ArticleCatalog>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let app = app.layer(Extension(catalog));
    let address = listener.local_addr()?;
    tracing::info!(%address, "server started");
    axum::Server::from_tcp(listener)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Builds the catalog over the configured storage and loads the demo content.
/// Seeding finishes before this returns, so nothing is served half-seeded.
pub async fn init_catalog(config: &Config) -> Result<ArticleCatalog> {
    let storage: Arc<dyn Storage> = match &config.database_url {
        Some(db_url) => {
            let pool = init_db(db_url).await?;
            tracing::info!(%db_url, "using sqlite storage");
            Arc::new(SqliteStorage::new(pool))
        }
        None => {
            tracing::info!("using in-memory storage");
            Arc::new(MemStorage::new())
        }
    };
    let catalog = ArticleCatalog::new(storage);
    if config.seed_data {
        seed::seed_storage(catalog.storage())
            .await
            .context("Failed to seed demo content")?;
    }
    Ok(catalog)
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/api/articles", get(list_articles))
        .route("/api/articles/featured", get(list_featured_articles))
        .route("/api/articles/:id", get(get_article))
        .route(
            "/api/articles/:id/comments",
            get(get_comments).post(add_comment),
        )
        .route("/api/comments/:id/like", post(like_comment))
        .route("/api/authors/:id", get(get_author))
        .route("/api/users", post(register_user))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
