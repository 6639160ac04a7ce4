// =============================================================================
// MACD (12, 26, 9)
// =============================================================================

use crate::indicators::ema::ewm_mean;

/// MACD line, signal line, and histogram series, index-aligned with the
/// input closes.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    /// EMA(12) - EMA(26) of closes. The only series exposed as a model
    /// feature.
    pub line: Vec<f64>,
    /// EMA(9) of the MACD line.
    pub signal: Vec<f64>,
    /// line - signal.
    pub histogram: Vec<f64>,
}

/// Compute MACD (12, 26, 9) using non-adjusted exponential averages.
///
/// Only `line` feeds the feature vector; the signal and histogram are
/// computed alongside it because downstream diagnostics use them.
pub fn macd(closes: &[f64]) -> MacdSeries {
    let ema12 = ewm_mean(closes, 12);
    let ema26 = ewm_mean(closes, 26);

    let line: Vec<f64> = ema12
        .iter()
        .zip(ema26.iter())
        .map(|(&a, &b)| a - b)
        .collect();

    let signal = ewm_mean(&line, 9);
    let histogram: Vec<f64> = line
        .iter()
        .zip(signal.iter())
        .map(|(&l, &s)| l - s)
        .collect();

    MacdSeries {
        line,
        signal,
        histogram,
    }
}
