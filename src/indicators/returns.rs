// =============================================================================
// Percentage Returns
// =============================================================================

/// Percentage change over `periods` steps:
/// `(v_t - v_{t-periods}) / v_{t-periods}`.
///
/// The first `periods` positions are NaN; a NaN on either side of the
/// comparison propagates.
pub fn pct_change(values: &[f64], periods: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        if i < periods {
            out.push(f64::NAN);
            continue;
        }
        let base = values[i - periods];
        out.push((values[i] - base) / base);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_day_return() {
        let out = pct_change(&[100.0, 110.0, 121.0], 1);
        assert!(out[0].is_nan());
        assert!((out[1] - 0.1).abs() < 1e-10);
        assert!((out[2] - 0.1).abs() < 1e-10);
    }

    #[test]
    fn five_day_return() {
        let values: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let out = pct_change(&values, 5);
        for v in &out[..5] {
            assert!(v.is_nan());
        }
        assert!((out[5] - 0.05).abs() < 1e-10); // (105 - 100) / 100
    }

    #[test]
    fn nan_base_propagates() {
        let out = pct_change(&[f64::NAN, 110.0], 1);
        assert!(out[1].is_nan());
    }
}
