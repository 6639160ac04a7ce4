// =============================================================================
// Average True Range — simple rolling mean variant
// =============================================================================
//
// True Range per bar:
//   TR_t = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR here is a plain `period`-bar rolling mean of TR, matching the training
// pipeline. This is NOT Wilder's smoothed ATR.
//
// The first bar has no previous close; its TR degrades to H - L because the
// missing terms are skipped, exactly as a row-wise max over NaN columns would.
// =============================================================================

use crate::indicators::rolling;
use crate::types::Bar;

/// True-range series, index-aligned with `bars`.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let hl = bar.high - bar.low;

        let tr = if i == 0 {
            hl
        } else {
            let prev_close = bars[i - 1].close;
            let hc = (bar.high - prev_close).abs();
            let lc = (bar.low - prev_close).abs();
            // NaN terms lose a max against any finite value, so a missing
            // prev_close leaves TR = H - L rather than poisoning the series.
            nan_max(nan_max(hl, hc), lc)
        };

        out.push(tr);
    }

    out
}

/// ATR series: `period`-bar rolling mean of the true range, requiring a full
/// window of valid TR values.
pub fn atr(bars: &[Bar], period: usize) -> Vec<f64> {
    rolling::mean(&true_range(bars), period, period)
}

/// Max that prefers the finite operand when one side is NaN.
fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() {
        b
    } else if b.is_nan() {
        a
    } else {
        a.max(b)
    }
}
