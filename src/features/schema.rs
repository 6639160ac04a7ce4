// =============================================================================
// Feature Contract — canonical schema shared with the fitted model artifacts
// =============================================================================
//
// The scoring model and input scaler were fitted against this exact ordered
// feature list. Order is load-bearing: reordering or renaming anything here
// silently diverges from training. The effective schema is the canonical list
// truncated to the feature count the fitted scaler expects — a historical
// artifact-compatibility rule, kept deliberately, but validated loudly at
// startup instead of silently dropping features.
// =============================================================================

use thiserror::Error;
use tracing::warn;

/// Canonical ordered feature names. `daily_return` and `return_1d` are
/// identically defined on purpose; downstream consumers rely on both names.
pub const ALL_FEATURES: [&str; 13] = [
    "sma_20",
    "ema_10",
    "rsi_14",
    "macd",
    "atr_14",
    "vol_sma_5",
    "daily_return",
    "prev_close",
    "return_1d",
    "return_5d",
    "close_30_sma",
    "open",
    "boll_lb",
];

/// A feature vector violating the contract.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("Missing feature '{0}'")]
    MissingFeature(String),
    #[error("Feature '{0}' is not a finite number")]
    InvalidValue(String),
}

/// Resolve the effective schema for a scaler expecting `expected_count`
/// features.
///
/// Fails when the scaler wants more features than the canonical list holds
/// (the artifacts and this binary disagree — refuse to serve). A truncation
/// below the full list is tolerated for compatibility but logged with the
/// names being dropped.
pub fn effective_schema(expected_count: usize) -> anyhow::Result<&'static [&'static str]> {
    if expected_count == 0 {
        anyhow::bail!("scaler expects zero features; artifact is unusable");
    }
    if expected_count > ALL_FEATURES.len() {
        anyhow::bail!(
            "scaler expects {} features but the canonical schema has only {}; \
             model artifacts do not match this build",
            expected_count,
            ALL_FEATURES.len()
        );
    }
    if expected_count < ALL_FEATURES.len() {
        warn!(
            expected = expected_count,
            dropped = ?&ALL_FEATURES[expected_count..],
            "canonical feature list truncated to match fitted scaler"
        );
    }
    Ok(&ALL_FEATURES[..expected_count])
}

/// Validate that `lookup` yields a finite value for every schema feature.
///
/// The engine and the request path both pass through here so drift between
/// them surfaces as a contract violation rather than a wrong prediction.
pub fn validate<F>(schema: &[&str], lookup: F) -> Result<(), ContractViolation>
where
    F: Fn(&str) -> Option<f64>,
{
    for &name in schema {
        match lookup(name) {
            None => return Err(ContractViolation::MissingFeature(name.to_string())),
            Some(v) if !v.is_finite() => {
                return Err(ContractViolation::InvalidValue(name.to_string()))
            }
            Some(_) => {}
        }
    }
    Ok(())
}
