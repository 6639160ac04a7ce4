// =============================================================================
// Scoring-Model Boundary
// =============================================================================
//
// The trained model is a black box behind [`ScoringModel`]: a scaled feature
// vector goes in, a scalar prediction or a per-feature attribution matrix
// comes out. Whatever shape the backend returns, `normalize_attributions`
// reduces it to a single vector of known length BEFORE anything downstream
// (ranking, verdict aggregation) runs — the one place output-shape branching
// is allowed to exist.
// =============================================================================

pub mod client;
pub mod scaler;

use anyhow::Result;
use async_trait::async_trait;

/// External scoring-model collaborator.
///
/// Implementations must be deterministic for a given input vector and safe to
/// call from any number of concurrent requests.
#[async_trait]
pub trait ScoringModel: Send + Sync {
    /// Scalar prediction for one scaled feature vector.
    async fn predict(&self, scaled: &[f64]) -> Result<f64>;

    /// Per-feature attribution rows. Binary-classification backends return
    /// one row per class; single-output backends return one row.
    async fn explain(&self, scaled: &[f64]) -> Result<Vec<Vec<f64>>>;
}

/// Reduce a multi-row attribution result to the single vector the rest of the
/// pipeline consumes. For multi-class output only the first class's row is
/// used, matching how the model was evaluated during training.
pub fn normalize_attributions(rows: Vec<Vec<f64>>, expected_len: usize) -> Result<Vec<f64>> {
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("model returned no attribution rows"))?;

    if row.len() != expected_len {
        anyhow::bail!(
            "attribution vector length {} does not match feature count {}",
            row.len(),
            expected_len
        );
    }
    if let Some(bad) = row.iter().find(|v| !v.is_finite()) {
        anyhow::bail!("attribution vector contains non-finite value {bad}");
    }

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_row_passes_through() {
        let out = normalize_attributions(vec![vec![0.1, -0.2]], 2).unwrap();
        assert_eq!(out, vec![0.1, -0.2]);
    }

    #[test]
    fn multi_class_takes_first_row() {
        let rows = vec![vec![0.5, 0.5], vec![-0.5, -0.5]];
        let out = normalize_attributions(rows, 2).unwrap();
        assert_eq!(out, vec![0.5, 0.5]);
    }

    #[test]
    fn empty_result_is_an_error() {
        assert!(normalize_attributions(vec![], 2).is_err());
    }

    #[test]
    fn length_mismatch_is_an_error() {
        assert!(normalize_attributions(vec![vec![0.1]], 2).is_err());
    }

    #[test]
    fn non_finite_attribution_is_an_error() {
        assert!(normalize_attributions(vec![vec![0.1, f64::NAN]], 2).is_err());
    }
}
