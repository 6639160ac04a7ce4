// =============================================================================
// News Provider — Alpha Vantage NEWS_SENTIMENT feed
// =============================================================================
//
// Returns the raw scored feed, unfiltered by date — the sentiment aggregator
// owns the trailing-window cutoff. A missing or empty `feed` key is a normal
// "no news" case, not a failure.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::sentiment::ArticleSentiment;

/// Source of recent scored news articles for a symbol.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn fetch_recent_articles(&self, symbol: &str) -> Result<Vec<ArticleSentiment>>;
}

/// Alpha Vantage NEWS_SENTIMENT client.
#[derive(Clone)]
pub struct AlphaVantageClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl AlphaVantageClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("failed to build news HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
        })
    }
}

#[derive(Deserialize)]
struct NewsEnvelope {
    #[serde(default)]
    feed: Vec<FeedItem>,
}

#[derive(Deserialize)]
struct FeedItem {
    /// Format: `YYYYMMDDTHHMMSS`.
    time_published: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    overall_sentiment_label: String,
    #[serde(default)]
    overall_sentiment_score: f64,
}

fn parse_published_date(raw: &str) -> Option<chrono::NaiveDate> {
    NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%S")
        .ok()
        .map(|dt| dt.date())
}

#[async_trait]
impl NewsProvider for AlphaVantageClient {
    #[instrument(skip(self), name = "news::fetch_recent_articles")]
    async fn fetch_recent_articles(&self, symbol: &str) -> Result<Vec<ArticleSentiment>> {
        let url = format!(
            "{}/query?function=NEWS_SENTIMENT&tickers={}&sort=LATEST&apikey={}",
            self.base_url, symbol, self.api_key
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("news request for {symbol} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("news endpoint returned {status} for {symbol}");
        }

        let envelope: NewsEnvelope = resp
            .json()
            .await
            .with_context(|| format!("failed to parse news response for {symbol}"))?;

        let mut articles = Vec::with_capacity(envelope.feed.len());
        for item in envelope.feed {
            match parse_published_date(&item.time_published) {
                Some(date) => articles.push(ArticleSentiment {
                    date,
                    title: item.title,
                    summary: item.summary,
                    url: item.url,
                    sentiment_label: item.overall_sentiment_label,
                    sentiment_score: item.overall_sentiment_score,
                }),
                None => {
                    warn!(
                        symbol = %symbol,
                        time_published = %item.time_published,
                        "skipping article with unparseable publish time"
                    );
                }
            }
        }

        debug!(symbol = %symbol, articles = articles.len(), "news feed fetched");
        Ok(articles)
    }
}
