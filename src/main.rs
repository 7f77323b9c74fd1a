use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod pricing;
mod seed;

use crate::config::Config;
use crate::db::ProductStore;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: ProductStore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,pricing_service=debug")
            }),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    info!("Connecting to {}...", config.database_url);
    let store = ProductStore::connect(&config.database_url, config.max_connections).await?;
    info!("Database connection pool established.");

    if let Some(path) = &config.seed_csv {
        info!(path = %path, "Seeding catalog from CSV");
        seed::seed_from_csv(&store, path).await?;
    }

    let app = build_router(AppState { store });

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/products", get(handlers::products::list_products))
        .route("/pricing", post(handlers::pricing::post_pricing))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
