// =============================================================================
// Application State
// =============================================================================
//
// Everything a request handler needs, constructed once at startup and shared
// as `Arc<AppState>`. Deliberately immutable: the scaler, schema, and
// collaborator handles are read-only, so concurrent requests need no locking
// and there is no global mutable singleton anywhere in the process.
// =============================================================================

use std::sync::Arc;

use anyhow::Result;

use crate::features::schema;
use crate::model::scaler::StandardScaler;
use crate::model::ScoringModel;
use crate::providers::{MarketDataProvider, NewsProvider};
use crate::runtime_config::RuntimeConfig;

/// Immutable process-wide state shared across request handlers.
pub struct AppState {
    pub config: RuntimeConfig,
    pub scaler: StandardScaler,
    /// Effective feature schema: the canonical list truncated to the fitted
    /// scaler's expected count. Resolved once, at startup.
    pub schema: &'static [&'static str],
    pub model: Arc<dyn ScoringModel>,
    pub market_data: Arc<dyn MarketDataProvider>,
    pub news: Arc<dyn NewsProvider>,
}

impl AppState {
    /// Build the shared state, performing the scaler/schema handshake.
    ///
    /// Fails (and the process should refuse to start) when the fitted
    /// artifacts disagree with the canonical feature list.
    pub fn new(
        config: RuntimeConfig,
        scaler: StandardScaler,
        model: Arc<dyn ScoringModel>,
        market_data: Arc<dyn MarketDataProvider>,
        news: Arc<dyn NewsProvider>,
    ) -> Result<Self> {
        let schema = schema::effective_schema(scaler.expected_feature_count())?;

        Ok(Self {
            config,
            scaler,
            schema,
            model,
            market_data,
            news,
        })
    }
}
