// =============================================================================
// Mint Insight — Main Entry Point
// =============================================================================
//
// Startup is fail-fast: the scaler artifact must load and agree with the
// canonical feature schema before the API binds. A service that starts with a
// broken feature contract would score garbage on every request.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod error;
mod features;
mod indicators;
mod model;
mod pipeline;
mod providers;
mod runtime_config;
mod sentiment;
mod signals;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::model::client::ModelClient;
use crate::model::scaler::StandardScaler;
use crate::providers::market::YahooChartClient;
use crate::providers::news::AlphaVantageClient;
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Mint Insight — Starting Up                        ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut config = RuntimeConfig::load("runtime_config.json").unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    // Env overrides — secrets and deployment-specific endpoints.
    if let Ok(addr) = std::env::var("MINT_BIND_ADDR") {
        config.bind_addr = addr;
    }
    if let Ok(key) = std::env::var("ALPHAVANTAGE_API_KEY") {
        config.alphavantage_api_key = key;
    }
    if let Ok(url) = std::env::var("MINT_MODEL_URL") {
        config.model_base_url = url;
    }
    if let Ok(path) = std::env::var("MINT_SCALER_PATH") {
        config.scaler_path = path;
    }

    if config.alphavantage_api_key.is_empty() {
        warn!("No Alpha Vantage API key configured — /news_sentiment will fail upstream");
    }

    // ── 2. Load fitted artifacts ─────────────────────────────────────────
    let scaler = StandardScaler::load(&config.scaler_path)
        .with_context(|| format!("failed to load scaler from {}", config.scaler_path))?;
    info!(
        path = %config.scaler_path,
        features = scaler.expected_feature_count(),
        "scaler loaded"
    );

    // ── 3. Build collaborators ───────────────────────────────────────────
    let model = Arc::new(ModelClient::new(&config.model_base_url)?);
    let market_data = Arc::new(YahooChartClient::new(&config.market_data_base_url)?);
    let news = Arc::new(AlphaVantageClient::new(
        &config.news_base_url,
        &config.alphavantage_api_key,
    )?);

    // ── 4. Build shared state (scaler/schema handshake) ──────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, scaler, model, market_data, news)?);
    info!(schema = ?state.schema, "feature schema resolved");

    // ── 5. Start the API server ──────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "API server failed");
        }
    });

    // ── 6. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received — stopping");
    info!("Mint Insight shut down complete.");
    Ok(())
}
