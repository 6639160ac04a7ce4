// =============================================================================
// External Data Providers
// =============================================================================
//
// Blocking I/O lives out here, behind traits, with timeouts — never inside
// the feature or aggregation code. Both providers return raw material; row
// deduplication, lookback checks, and the sentiment window are applied by the
// core.

pub mod market;
pub mod news;

pub use market::MarketDataProvider;
pub use news::NewsProvider;
