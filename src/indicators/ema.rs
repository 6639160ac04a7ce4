// =============================================================================
// Exponentially Weighted Moving Average (span convention, non-adjusted)
// =============================================================================
//
// Recursive weighting:
//   alpha = 2 / (span + 1)
//   EMA_0 = value_0
//   EMA_t = alpha * value_t + (1 - alpha) * EMA_{t-1}
//
// The first output equals the first input — there is NO SMA seed. This is the
// convention the model was trained with and it differs from the common
// SMA-seeded variant; do not "fix" it.
// =============================================================================

/// Compute the non-adjusted EWM series of `values` with the given `span`.
///
/// Output has the same length as the input. Leading NaN inputs emit NaN until
/// the first finite value, which seeds the recursion. A NaN after the seed
/// carries the previous state forward (the missing session does not reset the
/// average).
///
/// # Edge cases
/// - `span == 0` => all-NaN output.
/// - All-NaN input => all-NaN output.
pub fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return vec![f64::NAN; values.len()];
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut state: Option<f64> = None;

    for &v in values {
        match (state, v.is_finite()) {
            (None, false) => out.push(f64::NAN),
            (None, true) => {
                state = Some(v);
                out.push(v);
            }
            (Some(prev), false) => out.push(prev),
            (Some(prev), true) => {
                let next = alpha * v + (1.0 - alpha) * prev;
                state = Some(next);
                out.push(next);
            }
        }
    }

    out
}
