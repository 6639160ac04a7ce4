// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free series transforms matching the semantics the scoring
// model was trained against. Every function maps an input series to an output
// series of the SAME length, with NaN marking positions that are still warming
// up or whose inputs were missing. Callers extract the last non-NaN value.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod returns;
pub mod rolling;
pub mod rsi;
