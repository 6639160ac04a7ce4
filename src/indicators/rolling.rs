// =============================================================================
// Rolling-Window Statistics
// =============================================================================
//
// Windowed mean and population standard deviation with a `min_periods`
// threshold. A window covers at most the last `window` positions; positions
// holding NaN are excluded from the count. If fewer than `min_periods` valid
// observations remain, the output for that position is NaN.
//
// This mirrors the training pipeline's rolling semantics exactly: warm-up
// positions emit NaN rather than being dropped, so indices stay aligned with
// the input series.
// =============================================================================

/// Rolling mean of `values` over `window`, requiring at least `min_periods`
/// valid (non-NaN) observations.
///
/// # Edge cases
/// - `window == 0` or `min_periods == 0` => all-NaN output.
/// - NaN inputs are skipped, not propagated into the sum.
pub fn mean(values: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    apply(values, window, min_periods, |obs| {
        obs.iter().sum::<f64>() / obs.len() as f64
    })
}

/// Rolling population standard deviation (divisor N, not N-1) of `values`
/// over `window`, requiring at least `min_periods` valid observations.
pub fn std_pop(values: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    apply(values, window, min_periods, |obs| {
        let n = obs.len() as f64;
        let mean = obs.iter().sum::<f64>() / n;
        let var = obs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        var.sqrt()
    })
}

/// Shared windowing skeleton: collect the valid observations in each trailing
/// window and apply `stat` when the `min_periods` threshold is met.
fn apply<F>(values: &[f64], window: usize, min_periods: usize, stat: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    if window == 0 || min_periods == 0 {
        return vec![f64::NAN; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut obs: Vec<f64> = Vec::with_capacity(window);

    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        obs.clear();
        obs.extend(values[start..=i].iter().copied().filter(|v| v.is_finite()));

        if obs.len() >= min_periods {
            out.push(stat(&obs));
        } else {
            out.push(f64::NAN);
        }
    }

    out
}
