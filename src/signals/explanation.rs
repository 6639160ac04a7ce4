// =============================================================================
// Explanation Ranker — per-feature attributions to a ranked human explanation
// =============================================================================

use serde::Serialize;

/// One feature's contribution to a single prediction.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureImpact {
    pub feature: String,
    /// Raw (unscaled) feature value the caller supplied.
    pub value: f64,
    /// Signed attribution of this feature to the model output.
    pub impact: f64,
    /// "positive" iff impact is strictly greater than zero. Zero counts as
    /// negative; downstream consumers depend on that boundary.
    pub direction: &'static str,
}

/// Rank attributions by absolute impact, descending.
///
/// The sort is stable: equal-magnitude impacts keep their schema order. The
/// three slices must be equal length; the caller guarantees this via the
/// feature contract and the attribution normalization step.
pub fn rank(schema: &[&str], values: &[f64], impacts: &[f64]) -> Vec<FeatureImpact> {
    debug_assert_eq!(schema.len(), values.len());
    debug_assert_eq!(schema.len(), impacts.len());

    let mut ranked: Vec<FeatureImpact> = schema
        .iter()
        .zip(values.iter().zip(impacts.iter()))
        .map(|(&feature, (&value, &impact))| FeatureImpact {
            feature: feature.to_string(),
            value,
            impact,
            direction: if impact > 0.0 { "positive" } else { "negative" },
        })
        .collect();

    ranked.sort_by(|a, b| b.impact.abs().total_cmp(&a.impact.abs()));
    ranked
}
