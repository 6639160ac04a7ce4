// =============================================================================
// Indicator Engine — OHLCV history to validated feature values
// =============================================================================
//
// The deterministic front half of the prediction pipeline: dedup and sort the
// raw bars, run every indicator series, then extract the LAST NON-MISSING
// value of each series (slower indicators may still be warming up on the
// trailing rows). The resulting map carries one finite value per canonical
// feature or the whole vector fails — partial vectors are never returned.
// =============================================================================

use std::collections::HashMap;

use crate::error::ApiError;
use crate::indicators::{atr, bollinger, ema, macd, returns, rolling, rsi};
use crate::types::Bar;

/// Minimum bar count required before any indicator is attempted. The slowest
/// window is `close_30_sma` (30 periods); the buffer covers warm-up of the
/// stacked series on top of it.
pub const REQUIRED_HISTORY: usize = 40;

/// Deduplicate bars by date (keeping the last occurrence) and sort ascending.
///
/// Providers occasionally repeat the live session's bar; the re-fetch at the
/// end of the day is the authoritative one.
pub fn prepare_bars(mut bars: Vec<Bar>) -> Vec<Bar> {
    bars.sort_by_key(|b| b.date);

    let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => deduped.push(bar),
        }
    }
    deduped
}

/// Compute every canonical feature from prepared (sorted, deduplicated) bars.
///
/// Returns the full feature map; selection and ordering against the effective
/// schema happen at the contract layer. Errors:
/// - [`ApiError::InsufficientHistory`] when fewer than [`REQUIRED_HISTORY`]
///   bars are available.
/// - [`ApiError::InvalidIndicatorValue`] naming the first indicator whose
///   extracted value is missing or non-finite.
pub fn compute_features(
    bars: &[Bar],
    symbol: &str,
) -> Result<HashMap<&'static str, f64>, ApiError> {
    if bars.len() < REQUIRED_HISTORY {
        return Err(ApiError::InsufficientHistory(format!(
            "Not enough history for {symbol}. Need at least {REQUIRED_HISTORY} rows, got {}.",
            bars.len()
        )));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let opens: Vec<f64> = bars.iter().map(|b| b.open).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

    let sma_20 = rolling::mean(&closes, 20, 15);
    let ema_10 = ema::ewm_mean(&closes, 10);
    let rsi_14 = rsi::rsi(&closes, 14);
    let macd_series = macd::macd(&closes);
    let atr_14 = atr::atr(bars, 14);
    let vol_sma_5 = rolling::mean(&volumes, 5, 3);
    let daily_return = returns::pct_change(&closes, 1);
    let return_5d = returns::pct_change(&closes, 5);
    let close_30_sma = rolling::mean(&closes, 30, 20);
    let boll = bollinger::bands(&closes, 20, 2.0);

    let mut features: HashMap<&'static str, f64> = HashMap::new();
    features.insert("sma_20", last_valid(&sma_20));
    features.insert("ema_10", last_valid(&ema_10));
    features.insert("rsi_14", last_valid(&rsi_14));
    features.insert("macd", last_valid(&macd_series.line));
    features.insert("atr_14", last_valid(&atr_14));
    features.insert("vol_sma_5", last_valid(&vol_sma_5));
    features.insert("daily_return", last_valid(&daily_return));
    features.insert("return_1d", last_valid(&daily_return));
    features.insert("return_5d", last_valid(&return_5d));
    features.insert("close_30_sma", last_valid(&close_30_sma));
    features.insert("open", last_valid(&opens));
    features.insert("boll_lb", last_valid(&boll.lower));
    features.insert("prev_close", prev_valid_close(&closes));

    // Whole-vector validation: any missing value fails the request with the
    // offending indicator named, never a partial vector. Canonical order
    // keeps the named indicator deterministic when several are bad.
    for &name in &crate::features::schema::ALL_FEATURES {
        if !features.get(name).copied().unwrap_or(f64::NAN).is_finite() {
            return Err(ApiError::InvalidIndicatorValue {
                indicator: name.to_string(),
                history_rows: Some(bars.len()),
            });
        }
    }

    Ok(features)
}

/// Last non-NaN value of a series, or NaN when none exists.
fn last_valid(series: &[f64]) -> f64 {
    series
        .iter()
        .rev()
        .copied()
        .find(|v| v.is_finite())
        .unwrap_or(f64::NAN)
}

/// The second-most-recent VALID close — one valid observation before the
/// latest valid one, which is not necessarily "yesterday" if trailing rows
/// carry missing closes.
fn prev_valid_close(closes: &[f64]) -> f64 {
    closes
        .iter()
        .rev()
        .copied()
        .filter(|v| v.is_finite())
        .nth(1)
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(i: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i)
    }

    /// Gently trending series: every rolling window resolves at 40 bars.
    fn trending_bars(n: u64) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64 * 0.5;
                Bar {
                    date: date(i),
                    open: close - 0.2,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000.0 + i as f64,
                }
            })
            .collect()
    }

    #[test]
    fn rejects_short_history() {
        let bars = trending_bars(39);
        let err = compute_features(&bars, "TEST").unwrap_err();
        match err {
            ApiError::InsufficientHistory(msg) => {
                assert!(msg.contains("TEST"));
                assert!(msg.contains("40"));
                assert!(msg.contains("39"));
            }
            other => panic!("expected InsufficientHistory, got {other:?}"),
        }
    }

    #[test]
    fn accepts_exactly_40_bars() {
        let bars = trending_bars(40);
        let features = compute_features(&bars, "TEST").unwrap();
        assert_eq!(features.len(), 13);
        for (name, v) in &features {
            assert!(v.is_finite(), "feature {name} not finite: {v}");
        }
    }

    #[test]
    fn monotonic_rise_pegs_rsi_at_100() {
        let bars = trending_bars(60);
        let features = compute_features(&bars, "TEST").unwrap();
        assert!((features["rsi_14"] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn duplicated_return_features_are_equal() {
        let bars = trending_bars(50);
        let features = compute_features(&bars, "TEST").unwrap();
        assert_eq!(features["daily_return"], features["return_1d"]);
    }

    #[test]
    fn prev_close_is_second_most_recent_close() {
        let bars = trending_bars(40);
        let features = compute_features(&bars, "TEST").unwrap();
        // close_38 = 100 + 38 * 0.5
        assert!((features["prev_close"] - 119.0).abs() < 1e-10);
        assert!((features["open"] - (119.5 - 0.2)).abs() < 1e-10);
    }

    #[test]
    fn prev_close_skips_trailing_missing_close() {
        let mut bars = trending_bars(41);
        bars[40].close = f64::NAN;
        // Latest valid close is bar 39 (119.5); one before it is bar 38.
        assert!((prev_valid_close(&bars.iter().map(|b| b.close).collect::<Vec<_>>()) - 119.0).abs() < 1e-10);
    }

    #[test]
    fn boll_lb_equals_sma_on_constant_closes() {
        let bars: Vec<Bar> = (0..40)
            .map(|i| Bar {
                date: date(i),
                open: 50.0,
                high: 51.0,
                low: 49.0,
                close: 50.0,
                volume: 1000.0,
            })
            .collect();
        // Constant closes make RSI NaN (0/0) so full computation fails; check
        // the band directly against the SMA.
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let boll = bollinger::bands(&closes, 20, 2.0);
        let sma = rolling::mean(&closes, 20, 20);
        assert!((last_valid(&boll.lower) - last_valid(&sma)).abs() < 1e-10);
    }

    #[test]
    fn flat_closes_fail_with_named_indicator() {
        let bars: Vec<Bar> = (0..45)
            .map(|i| Bar {
                date: date(i),
                open: 50.0,
                high: 51.0,
                low: 49.0,
                close: 50.0,
                volume: 1000.0,
            })
            .collect();
        let err = compute_features(&bars, "FLAT").unwrap_err();
        match err {
            ApiError::InvalidIndicatorValue {
                indicator,
                history_rows,
            } => {
                // Flat closes break both RSI (0/0) and the return features
                // (0/50 is fine — zero IS finite), so the named indicator
                // must be rsi_14.
                assert_eq!(indicator, "rsi_14");
                assert_eq!(history_rows, Some(45));
            }
            other => panic!("expected InvalidIndicatorValue, got {other:?}"),
        }
    }

    #[test]
    fn prepare_dedups_keeping_last_and_sorts() {
        let mut bars = trending_bars(5);
        // Duplicate day 2 with a revised close, appended out of order.
        let mut revised = bars[2];
        revised.close = 999.0;
        bars.push(revised);
        bars.swap(0, 4);

        let prepared = prepare_bars(bars);
        assert_eq!(prepared.len(), 5);
        for w in prepared.windows(2) {
            assert!(w[0].date < w[1].date);
        }
        assert_eq!(prepared[2].close, 999.0);
    }
}
