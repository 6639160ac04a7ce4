// =============================================================================
// Fitted Input Scaler — standard-scaler parameters exported from training
// =============================================================================
//
// Loaded once at startup and never mutated; every request reads it
// concurrently without locking. The artifact is the JSON export of the
// training scaler's per-feature means and scales, and its vector length IS
// the feature count the model was fitted on — the schema truncation handshake
// derives from it.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

/// Fitted standard-scaler parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    /// Per-feature means subtracted before scaling.
    mean: Vec<f64>,
    /// Per-feature divisors (standard deviations from fitting).
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Load scaler parameters from a JSON artifact at `path`.
    ///
    /// The artifact is validated on load: mean/scale lengths must agree and
    /// every scale must be finite and non-zero, otherwise the process should
    /// refuse to start rather than serve garbage.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scaler artifact from {}", path.display()))?;

        let scaler: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scaler artifact from {}", path.display()))?;

        scaler.validate()?;

        info!(
            path = %path.display(),
            features = scaler.expected_feature_count(),
            "scaler artifact loaded"
        );
        Ok(scaler)
    }

    /// Build a scaler from raw parameter vectors (used by tests and tooling).
    pub fn from_params(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<()> {
        if self.mean.is_empty() {
            anyhow::bail!("scaler artifact has no features");
        }
        if self.mean.len() != self.scale.len() {
            anyhow::bail!(
                "scaler artifact mean/scale length mismatch: {} vs {}",
                self.mean.len(),
                self.scale.len()
            );
        }
        if let Some(i) = self
            .scale
            .iter()
            .position(|s| !s.is_finite() || *s == 0.0)
        {
            anyhow::bail!("scaler artifact has invalid scale at index {i}");
        }
        Ok(())
    }

    /// Number of features the scaler (and therefore the model) was fitted on.
    pub fn expected_feature_count(&self) -> usize {
        self.mean.len()
    }

    /// Transform a raw feature vector into model input space.
    pub fn transform(&self, raw: &[f64]) -> Result<Vec<f64>> {
        if raw.len() != self.mean.len() {
            anyhow::bail!(
                "feature vector length {} does not match scaler feature count {}",
                raw.len(),
                self.mean.len()
            );
        }
        Ok(raw
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect())
    }
}
