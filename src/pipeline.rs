// =============================================================================
// Request Pipeline — orchestration of the core computation paths
// =============================================================================
//
// Three request-scoped, side-effect-free flows over the immutable AppState:
//
//   explain:        client-supplied feature map -> ranked explanation
//   predict:        symbol -> bars -> features -> scale -> score -> verdict
//   news sentiment: symbol -> articles -> windowed aggregation
//
// Provider and model calls are the only awaits; every numeric step between
// them is a pure function tested in its own module.
// =============================================================================

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::app_state::AppState;
use crate::error::{ApiError, Result};
use crate::features::{engine, schema};
use crate::model::normalize_attributions;
use crate::sentiment::{self, SentimentReport};
use crate::signals::{explanation, verdict};
use crate::types::{Confidence, Verdict};

/// Minimum usable row count from the provider before the engine's own
/// 40-bar lookback check even applies.
const MIN_FETCH_ROWS: usize = 30;

// =============================================================================
// Explanation path
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ExplainOutput {
    pub message: &'static str,
    pub features_used: Vec<&'static str>,
    pub explanations: Vec<explanation::FeatureImpact>,
}

/// Rank per-feature attributions for a caller-supplied raw feature vector.
pub async fn explain_features(
    state: &AppState,
    features: &HashMap<String, f64>,
) -> Result<ExplainOutput> {
    // Contract check first: every schema feature present and finite.
    schema::validate(state.schema, |name| features.get(name).copied()).map_err(|v| match v {
        schema::ContractViolation::MissingFeature(name) => ApiError::MissingField(name),
        schema::ContractViolation::InvalidValue(name) => ApiError::InvalidIndicatorValue {
            indicator: name,
            history_rows: None,
        },
    })?;

    let raw: Vec<f64> = state.schema.iter().map(|&n| features[n]).collect();

    let scaled = state.scaler.transform(&raw).map_err(ApiError::Internal)?;

    // The prediction itself is discarded on this path; the call still runs so
    // the explanation reflects a real model evaluation.
    let _ = state
        .model
        .predict(&scaled)
        .await
        .map_err(ApiError::Internal)?;

    let rows = state
        .model
        .explain(&scaled)
        .await
        .map_err(ApiError::Internal)?;
    let attributions =
        normalize_attributions(rows, state.schema.len()).map_err(ApiError::Internal)?;

    let explanations = explanation::rank(state.schema, &raw, &attributions);

    Ok(ExplainOutput {
        message: "Technical explanation generated",
        features_used: state.schema.to_vec(),
        explanations,
    })
}

// =============================================================================
// Prediction path
// =============================================================================

#[derive(Debug, Serialize)]
pub struct PredictOutput {
    pub symbol: String,
    pub prediction: f64,
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub net_strength: f64,
}

/// Full symbol-to-verdict flow.
pub async fn predict_symbol(state: &AppState, symbol: &str) -> Result<PredictOutput> {
    let raw_bars = state
        .market_data
        .fetch_daily_bars(symbol, state.config.fetch_lookback_days)
        .await
        .map_err(|e| ApiError::UpstreamFailure(format!("{e:#}")))?;

    let bars = engine::prepare_bars(raw_bars);
    if bars.len() < MIN_FETCH_ROWS {
        return Err(ApiError::InsufficientHistory(format!(
            "No or insufficient data for symbol {symbol} (rows={})",
            bars.len()
        )));
    }

    let features = engine::compute_features(&bars, symbol)?;
    debug!(symbol = %symbol, rows = bars.len(), "features computed");

    // Drift guard: the engine must emit exactly what the schema expects.
    schema::validate(state.schema, |name| features.get(name).copied()).map_err(|v| {
        ApiError::Internal(anyhow::anyhow!("engine/schema drift: {v}"))
    })?;

    let raw: Vec<f64> = state.schema.iter().map(|&n| features[n]).collect();
    let scaled = state.scaler.transform(&raw).map_err(ApiError::Internal)?;

    let prediction = state
        .model
        .predict(&scaled)
        .await
        .map_err(ApiError::Internal)?;
    let rows = state
        .model
        .explain(&scaled)
        .await
        .map_err(ApiError::Internal)?;
    let attributions =
        normalize_attributions(rows, state.schema.len()).map_err(ApiError::Internal)?;

    let directional = verdict::aggregate(&attributions);
    info!(
        symbol = %symbol,
        prediction,
        verdict = %directional.verdict,
        net_strength = directional.net_strength,
        "prediction complete"
    );

    Ok(PredictOutput {
        symbol: symbol.to_string(),
        prediction,
        verdict: directional.verdict,
        confidence: directional.confidence,
        net_strength: directional.net_strength,
    })
}

// =============================================================================
// News-sentiment path
// =============================================================================

/// Fetch and aggregate recent news sentiment for a symbol.
pub async fn news_sentiment(state: &AppState, symbol: &str) -> Result<SentimentReport> {
    let articles = state
        .news
        .fetch_recent_articles(symbol)
        .await
        .map_err(|e| ApiError::UpstreamFailure(format!("{e:#}")))?;

    let today = chrono::Utc::now().date_naive();
    Ok(sentiment::aggregate(articles, today))
}

// =============================================================================
// Tests — synthetic collaborators exercise the full flows
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::scaler::StandardScaler;
    use crate::model::ScoringModel;
    use crate::providers::{MarketDataProvider, NewsProvider};
    use crate::runtime_config::RuntimeConfig;
    use crate::sentiment::ArticleSentiment;
    use crate::types::Bar;
    use anyhow::Result as AnyResult;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Arc;

    struct FixedModel {
        prediction: f64,
        attributions: Vec<Vec<f64>>,
    }

    #[async_trait]
    impl ScoringModel for FixedModel {
        async fn predict(&self, _scaled: &[f64]) -> AnyResult<f64> {
            Ok(self.prediction)
        }
        async fn explain(&self, _scaled: &[f64]) -> AnyResult<Vec<Vec<f64>>> {
            Ok(self.attributions.clone())
        }
    }

    struct FixedBars(Vec<Bar>);

    #[async_trait]
    impl MarketDataProvider for FixedBars {
        async fn fetch_daily_bars(&self, _symbol: &str, _lookback: u32) -> AnyResult<Vec<Bar>> {
            Ok(self.0.clone())
        }
    }

    struct NoNews;

    #[async_trait]
    impl NewsProvider for NoNews {
        async fn fetch_recent_articles(&self, _symbol: &str) -> AnyResult<Vec<ArticleSentiment>> {
            Ok(Vec::new())
        }
    }

    fn trending_bars(n: u64) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64 * 0.5;
                Bar {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i),
                    open: close - 0.2,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000.0 + i as f64,
                }
            })
            .collect()
    }

    fn test_state(bars: Vec<Bar>, attributions: Vec<Vec<f64>>) -> AppState {
        let scaler =
            StandardScaler::from_params(vec![0.0; 13], vec![1.0; 13]).unwrap();
        AppState::new(
            RuntimeConfig::default(),
            scaler,
            Arc::new(FixedModel {
                prediction: 0.73,
                attributions,
            }),
            Arc::new(FixedBars(bars)),
            Arc::new(NoNews),
        )
        .unwrap()
    }

    fn synthetic_attributions() -> Vec<f64> {
        vec![
            0.30, -0.10, 0.05, 0.0, 0.02, -0.03, 0.11, -0.02, 0.11, 0.0, 0.04, -0.01, 0.13,
        ]
    }

    #[tokio::test]
    async fn predict_flow_produces_verdict() {
        let attrs = synthetic_attributions();
        let state = test_state(trending_bars(60), vec![attrs.clone()]);

        let out = predict_symbol(&state, "TEST").await.unwrap();
        assert_eq!(out.symbol, "TEST");
        assert!((out.prediction - 0.73).abs() < 1e-12);

        // net = positives - |negatives| = 0.76 - 0.16 = 0.6
        assert!((out.net_strength - 0.6).abs() < 1e-12);
        assert_eq!(out.verdict, Verdict::Increase);
        assert_eq!(out.confidence, Confidence::High);
    }

    #[tokio::test]
    async fn predict_rejects_short_fetch() {
        let state = test_state(trending_bars(10), vec![synthetic_attributions()]);
        let err = predict_symbol(&state, "TEST").await.unwrap_err();
        assert!(matches!(err, ApiError::InsufficientHistory(_)));
    }

    #[tokio::test]
    async fn explain_flow_round_trips_net_strength() {
        let attrs = synthetic_attributions();
        let state = test_state(trending_bars(60), vec![attrs.clone()]);

        let features: HashMap<String, f64> = state
            .schema
            .iter()
            .enumerate()
            .map(|(i, &n)| (n.to_string(), i as f64 + 1.0))
            .collect();

        let out = explain_features(&state, &features).await.unwrap();
        assert_eq!(out.message, "Technical explanation generated");
        assert_eq!(out.features_used.len(), 13);
        assert_eq!(out.explanations.len(), 13);

        // Signed sum of ranked impacts equals the aggregator's net strength.
        let signed: f64 = out.explanations.iter().map(|e| e.impact).sum();
        let net = verdict::aggregate(&attrs).net_strength;
        assert!((signed - net).abs() < 1e-12);

        // Non-increasing magnitudes.
        for w in out.explanations.windows(2) {
            assert!(w[0].impact.abs() >= w[1].impact.abs());
        }
    }

    #[tokio::test]
    async fn explain_names_missing_feature() {
        let state = test_state(trending_bars(60), vec![synthetic_attributions()]);

        let mut features: HashMap<String, f64> = state
            .schema
            .iter()
            .map(|&n| (n.to_string(), 1.0))
            .collect();
        features.remove("macd");

        let err = explain_features(&state, &features).await.unwrap_err();
        match err {
            ApiError::MissingField(name) => assert_eq!(name, "macd"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn multi_class_attributions_are_normalized() {
        let first = synthetic_attributions();
        let second: Vec<f64> = first.iter().map(|v| -v).collect();
        let state = test_state(trending_bars(60), vec![first.clone(), second]);

        let out = predict_symbol(&state, "TEST").await.unwrap();
        // Only the first class's row feeds the verdict.
        assert!((out.net_strength - 0.6).abs() < 1e-12);
    }

    #[tokio::test]
    async fn sentiment_no_data_is_success() {
        let state = test_state(trending_bars(60), vec![synthetic_attributions()]);
        let report = news_sentiment(&state, "TEST").await.unwrap();
        assert!(matches!(report, SentimentReport::NoData { .. }));
    }
}
