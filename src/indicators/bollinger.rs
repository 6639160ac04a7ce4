// =============================================================================
// Bollinger Bands
// =============================================================================
//
// middle = 20-period SMA, upper/lower = middle ± k * population std (divisor
// N). The lower band is the schema feature; upper and middle ride along for
// diagnostics.
// =============================================================================

use crate::indicators::rolling;

/// Index-aligned Bollinger band series.
#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Compute Bollinger bands over `window` closes with `num_std` deviations.
///
/// A full window of valid closes is required before the bands resolve; warmup
/// positions are NaN.
pub fn bands(closes: &[f64], window: usize, num_std: f64) -> BollingerSeries {
    let middle = rolling::mean(closes, window, window);
    let std = rolling::std_pop(closes, window, window);

    let upper: Vec<f64> = middle
        .iter()
        .zip(std.iter())
        .map(|(&m, &s)| m + num_std * s)
        .collect();
    let lower: Vec<f64> = middle
        .iter()
        .zip(std.iter())
        .map(|(&m, &s)| m - num_std * s)
        .collect();

    BollingerSeries {
        upper,
        middle,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_closes_collapse_to_sma() {
        // Zero variance: lower band equals the SMA itself.
        let closes = vec![50.0; 40];
        let out = bands(&closes, 20, 2.0);
        let last = *out.lower.last().unwrap();
        assert!((last - 50.0).abs() < 1e-10);
        assert!((out.upper.last().unwrap() - 50.0).abs() < 1e-10);
    }

    #[test]
    fn lower_below_middle_below_upper() {
        let closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let out = bands(&closes, 20, 2.0);
        let i = 39;
        assert!(out.lower[i] < out.middle[i]);
        assert!(out.middle[i] < out.upper[i]);
    }

    #[test]
    fn warmup_is_nan() {
        let closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let out = bands(&closes, 20, 2.0);
        assert!(out.lower[18].is_nan());
        assert!(out.lower[19].is_finite());
    }
}
