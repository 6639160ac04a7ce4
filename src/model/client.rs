// =============================================================================
// Model-Server Client
// =============================================================================
//
// HTTP client for the scoring-model service. The model runs out of process
// (it owns the trained booster and explainer); this client only moves scaled
// vectors across the wire and checks shapes on the way back.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::model::ScoringModel;

/// Client for the external scoring-model server.
#[derive(Clone)]
pub struct ModelClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct PredictResponse {
    prediction: f64,
}

#[derive(Deserialize)]
struct ExplainResponse {
    attributions: Vec<Vec<f64>>,
}

impl ModelClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("failed to build model HTTP client")?;

        let base_url = base_url.into();
        debug!(base_url = %base_url, "ModelClient initialised");

        Ok(Self { base_url, client })
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        scaled: &[f64],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "features": scaled }))
            .send()
            .await
            .with_context(|| format!("POST {path} request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("model server POST {path} returned {status}: {body}");
        }

        resp.json::<T>()
            .await
            .with_context(|| format!("failed to parse {path} response"))
    }
}

#[async_trait]
impl ScoringModel for ModelClient {
    #[instrument(skip(self, scaled), name = "model::predict")]
    async fn predict(&self, scaled: &[f64]) -> Result<f64> {
        let resp: PredictResponse = self.post("/predict", scaled).await?;
        if !resp.prediction.is_finite() {
            anyhow::bail!("model server returned non-finite prediction");
        }
        Ok(resp.prediction)
    }

    #[instrument(skip(self, scaled), name = "model::explain")]
    async fn explain(&self, scaled: &[f64]) -> Result<Vec<Vec<f64>>> {
        let resp: ExplainResponse = self.post("/explain", scaled).await?;
        Ok(resp.attributions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_predict_response() {
        let resp: PredictResponse = serde_json::from_str(r#"{"prediction": 0.73}"#).unwrap();
        assert!((resp.prediction - 0.73).abs() < 1e-12);
    }

    #[test]
    fn parses_explain_response() {
        let resp: ExplainResponse =
            serde_json::from_str(r#"{"attributions": [[0.1, -0.2], [0.0, 0.0]]}"#).unwrap();
        assert_eq!(resp.attributions.len(), 2);
        assert_eq!(resp.attributions[0], vec![0.1, -0.2]);
    }
}
