// =============================================================================
// Relative Strength Index — classic simple-rolling variant
// =============================================================================
//
// This is the plain-rolling RSI the model was trained on, NOT Wilder's
// exponentially smoothed variant:
//
//   delta_t    = close_t - close_{t-1}
//   gain_t     = max(delta_t, 0)        loss_t = max(-delta_t, 0)
//   avg_gain   = rolling mean of gains over `period` (exactly `period` valid)
//   avg_loss   = rolling mean of losses over `period`
//   RS         = avg_gain / avg_loss
//   RSI        = 100 - 100 / (1 + RS)
//
// Division artefacts are deliberate and match training:
//   - all gains, no losses => RS = +inf => RSI = 100 (not NaN)
//   - no movement at all   => RS = 0/0  => RSI = NaN (fails validation later)
// =============================================================================

use crate::indicators::rolling;

/// Compute the RSI series of `closes` over `period`.
///
/// Output has the same length as the input; the first `period` positions are
/// NaN (the delta at index 0 is undefined, and exactly `period` valid deltas
/// are required before the averages resolve).
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if closes.is_empty() {
        return Vec::new();
    }

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());

    // Delta at index 0 is undefined; NaN propagates into both series so the
    // rolling means only resolve once a full window of real deltas exists.
    gains.push(f64::NAN);
    losses.push(f64::NAN);
    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        if delta.is_finite() {
            gains.push(delta.max(0.0));
            losses.push((-delta).max(0.0));
        } else {
            gains.push(f64::NAN);
            losses.push(f64::NAN);
        }
    }

    let avg_gain = rolling::mean(&gains, period, period);
    let avg_loss = rolling::mean(&losses, period, period);

    avg_gain
        .iter()
        .zip(avg_loss.iter())
        .map(|(&g, &l)| {
            let rs = g / l;
            100.0 - 100.0 / (1.0 + rs)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warmup_positions_are_nan() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let out = rsi(&closes, 14);
        assert_eq!(out.len(), 20);
        for v in &out[..14] {
            assert!(v.is_nan());
        }
    }

    #[test]
    fn monotonic_gains_give_rsi_100() {
        // All gains, no losses: RS = +inf, RSI = 100 — not NaN.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let out = rsi(&closes, 14);
        let last = out.last().unwrap();
        assert!((last - 100.0).abs() < 1e-10, "expected 100.0, got {last}");
    }

    #[test]
    fn monotonic_losses_give_rsi_0() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let out = rsi(&closes, 14);
        let last = out.last().unwrap();
        assert!(last.abs() < 1e-10, "expected 0.0, got {last}");
    }

    #[test]
    fn flat_series_is_nan() {
        // avg_gain = avg_loss = 0 => RS = 0/0 = NaN. Matches training; the
        // feature validator is what rejects it, not this function.
        let closes = vec![100.0; 30];
        let out = rsi(&closes, 14);
        assert!(out.last().unwrap().is_nan());
    }

    #[test]
    fn values_stay_in_range() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        for v in rsi(&closes, 14).iter().filter(|v| v.is_finite()) {
            assert!((0.0..=100.0).contains(v), "RSI {v} out of range");
        }
    }

    #[test]
    fn insufficient_history_is_all_nan() {
        // 14 closes => 13 deltas < 14 required.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert!(rsi(&closes, 14).iter().all(|v| v.is_nan()));
    }
}
