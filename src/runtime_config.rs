// =============================================================================
// Runtime Configuration
// =============================================================================
//
// Loaded once at startup from JSON (env overrides applied in main) and then
// immutable for the life of the process — request handlers see it only
// through the shared state. All fields carry `#[serde(default)]` so adding a
// field never breaks an older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:1234".to_string()
}

fn default_market_data_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_news_base_url() -> String {
    "https://www.alphavantage.co".to_string()
}

fn default_model_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_scaler_path() -> String {
    "scaler.json".to_string()
}

fn default_fetch_lookback_days() -> u32 {
    120
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the insight service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Address the HTTP API binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the daily-bars chart endpoint.
    #[serde(default = "default_market_data_base_url")]
    pub market_data_base_url: String,

    /// Base URL of the news-sentiment provider.
    #[serde(default = "default_news_base_url")]
    pub news_base_url: String,

    /// Alpha Vantage API key. Usually supplied via the
    /// `ALPHAVANTAGE_API_KEY` env var rather than the file.
    #[serde(default)]
    pub alphavantage_api_key: String,

    /// Base URL of the scoring-model server.
    #[serde(default = "default_model_base_url")]
    pub model_base_url: String,

    /// Path to the fitted scaler parameter artifact.
    #[serde(default = "default_scaler_path")]
    pub scaler_path: String,

    /// Calendar days of price history requested per prediction. Must
    /// comfortably exceed the 40-bar indicator lookback to survive holidays
    /// and halts.
    #[serde(default = "default_fetch_lookback_days")]
    pub fetch_lookback_days: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            market_data_base_url: default_market_data_base_url(),
            news_base_url: default_news_base_url(),
            alphavantage_api_key: String::new(),
            model_base_url: default_model_base_url(),
            scaler_path: default_scaler_path(),
            fetch_lookback_days: default_fetch_lookback_days(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            lookback_days = config.fetch_lookback_days,
            "config loaded"
        );

        Ok(config)
    }
}
