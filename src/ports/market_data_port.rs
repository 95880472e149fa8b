//! Market data provider port.

use crate::domain::error::FinstreamError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::params::{HistoryPeriod, Interval};
use crate::domain::snapshot::RawQuote;
use std::collections::HashMap;

/// Both calls may return fewer symbols than requested; a missing symbol is
/// not an error. `Err` is reserved for the provider failing as a whole.
pub trait MarketDataPort {
    fn fetch_history(
        &self,
        symbols: &[String],
        period: HistoryPeriod,
        interval: Interval,
    ) -> Result<HashMap<String, PriceSeries>, FinstreamError>;

    fn fetch_quotes(&self, symbols: &[String]) -> Result<HashMap<String, RawQuote>, FinstreamError>;
}
