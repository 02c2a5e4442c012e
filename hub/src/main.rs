mod config;
mod download_log;
mod error;
mod routes;
mod state;

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use config::HubConfig;
use download_log::DownloadLog;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = HubConfig::from_env();
    let bind = cfg.bind.clone();
    let port = cfg.port;

    // The dataset is loaded once, before any request is served.
    let dataset = cz_data::load_dataset(&cfg.data_path)
        .with_context(|| format!("loading dataset from {}", cfg.data_path.display()))?;
    let names = cz_data::ReferenceNames::load(&cfg.asset_metadata_path)
        .with_context(|| format!("loading asset metadata from {}", cfg.asset_metadata_path.display()))?;
    let download_log = DownloadLog::new(&cfg)?;
    if !download_log.is_enabled() {
        tracing::warn!("GITHUB_TOKEN not set; downloads are logged locally only");
    }

    let static_dir = cfg.static_dir.clone();
    let state = AppState::new(cfg, dataset, names, download_log);

    let app = Router::new()
        .merge(routes::api_router())
        .route("/health", axum::routing::get(health))
        .fallback_service(ServeDir::new(&static_dir).append_index_html_on_directories(true))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("invalid bind address {bind}:{port}"))?;

    tracing::info!("Dashboard hub listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, gracefully stopping…");
}
