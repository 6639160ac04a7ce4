// =============================================================================
// Market-Data Provider — daily OHLCV bars
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::types::Bar;

/// Source of daily price history for a symbol.
///
/// Bars come back ordered ascending by date but may contain duplicate dates;
/// callers deduplicate (keeping the last occurrence) and enforce minimum row
/// counts themselves.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_daily_bars(&self, symbol: &str, lookback_days: u32) -> Result<Vec<Bar>>;
}

// =============================================================================
// Yahoo-style chart endpoint client
// =============================================================================

/// Client for the v8 chart endpoint (`/v8/finance/chart/{symbol}`).
#[derive(Clone)]
pub struct YahooChartClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooChartClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent("mint-insight/1.0")
            .build()
            .context("failed to build market-data HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

// ── Wire format ──────────────────────────────────────────────────────────────
// Null quotes appear on partial sessions; they map to NaN so the feature
// engine's missing-value policy applies uniformly.

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Deserialize)]
struct ChartQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

fn val(series: &[Option<f64>], i: usize) -> f64 {
    series.get(i).copied().flatten().unwrap_or(f64::NAN)
}

#[async_trait]
impl MarketDataProvider for YahooChartClient {
    #[instrument(skip(self), name = "market::fetch_daily_bars")]
    async fn fetch_daily_bars(&self, symbol: &str, lookback_days: u32) -> Result<Vec<Bar>> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}d&interval=1d",
            self.base_url, symbol, lookback_days
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("chart request for {symbol} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("chart endpoint returned {status} for {symbol}");
        }

        let envelope: ChartEnvelope = resp
            .json()
            .await
            .with_context(|| format!("failed to parse chart response for {symbol}"))?;

        if let Some(err) = envelope.chart.error {
            if !err.is_null() {
                anyhow::bail!("chart endpoint error for {symbol}: {err}");
            }
        }

        let result = envelope
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .with_context(|| format!("chart response for {symbol} has no result"))?;

        let timestamps = result.timestamp.unwrap_or_default();
        let quote = result
            .indicators
            .quote
            .first()
            .with_context(|| format!("chart response for {symbol} has no quote block"))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = DateTime::from_timestamp(ts, 0)
                .with_context(|| format!("invalid timestamp {ts} for {symbol}"))?
                .date_naive();

            bars.push(Bar {
                date,
                open: val(&quote.open, i),
                high: val(&quote.high, i),
                low: val(&quote.low, i),
                close: val(&quote.close, i),
                volume: val(&quote.volume, i),
            });
        }

        debug!(symbol = %symbol, rows = bars.len(), "daily bars fetched");
        Ok(bars)
    }
}
