#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use finstream::domain::error::FinstreamError;
pub use finstream::domain::ohlcv::{PricePoint, PriceSeries};
use finstream::domain::params::{HistoryPeriod, Interval, Parameters};
use finstream::domain::snapshot::RawQuote;
use finstream::ports::market_data_port::MarketDataPort;
use finstream::ports::parameter_port::ParameterPort;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub struct MockMarketDataPort {
    pub history: HashMap<(String, Interval), PriceSeries>,
    pub quotes: HashMap<String, RawQuote>,
    pub history_error: Option<String>,
    pub quote_error: Option<String>,
    pub history_calls: Cell<usize>,
    pub quote_calls: Cell<usize>,
}

impl MockMarketDataPort {
    pub fn new() -> Self {
        Self {
            history: HashMap::new(),
            quotes: HashMap::new(),
            history_error: None,
            quote_error: None,
            history_calls: Cell::new(0),
            quote_calls: Cell::new(0),
        }
    }

    pub fn with_series(mut self, interval: Interval, series: PriceSeries) -> Self {
        self.history
            .insert((series.symbol().to_string(), interval), series);
        self
    }

    pub fn with_daily(self, symbol: &str, closes: &[f64]) -> Self {
        self.with_series(Interval::OneDay, daily_series(symbol, closes))
    }

    pub fn with_quote(mut self, symbol: &str, quote: RawQuote) -> Self {
        self.quotes.insert(symbol.to_string(), quote);
        self
    }

    pub fn with_history_error(mut self, reason: &str) -> Self {
        self.history_error = Some(reason.to_string());
        self
    }

    pub fn with_quote_error(mut self, reason: &str) -> Self {
        self.quote_error = Some(reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn fetch_history(
        &self,
        symbols: &[String],
        _period: HistoryPeriod,
        interval: Interval,
    ) -> Result<HashMap<String, PriceSeries>, FinstreamError> {
        self.history_calls.set(self.history_calls.get() + 1);
        if let Some(reason) = &self.history_error {
            return Err(FinstreamError::Provider {
                reason: reason.clone(),
            });
        }
        Ok(symbols
            .iter()
            .filter_map(|s| {
                self.history
                    .get(&(s.clone(), interval))
                    .map(|series| (s.clone(), series.clone()))
            })
            .collect())
    }

    fn fetch_quotes(&self, symbols: &[String]) -> Result<HashMap<String, RawQuote>, FinstreamError> {
        self.quote_calls.set(self.quote_calls.get() + 1);
        if let Some(reason) = &self.quote_error {
            return Err(FinstreamError::Provider {
                reason: reason.clone(),
            });
        }
        Ok(symbols
            .iter()
            .filter_map(|s| self.quotes.get(s).map(|q| (s.clone(), q.clone())))
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryParameterStore {
    pub stored: RefCell<Option<Parameters>>,
    pub writes: Cell<usize>,
}

impl MemoryParameterStore {
    pub fn with(params: Parameters) -> Self {
        Self {
            stored: RefCell::new(Some(params)),
            writes: Cell::new(0),
        }
    }

    pub fn current(&self) -> Option<Parameters> {
        self.stored.borrow().clone()
    }
}

impl ParameterPort for MemoryParameterStore {
    fn read(&self) -> Result<Option<Parameters>, FinstreamError> {
        Ok(self.stored.borrow().clone())
    }

    fn write(&self, params: &Parameters) -> Result<(), FinstreamError> {
        self.writes.set(self.writes.get() + 1);
        *self.stored.borrow_mut() = Some(params.clone());
        Ok(())
    }
}

pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn make_point(timestamp: NaiveDateTime, close: f64) -> PricePoint {
    PricePoint {
        timestamp,
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

pub fn daily_series(symbol: &str, closes: &[f64]) -> PriceSeries {
    daily_series_from(symbol, 0, closes)
}

/// Daily bars starting `offset` days after [`start`].
pub fn daily_series_from(symbol: &str, offset: i64, closes: &[f64]) -> PriceSeries {
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_point(start() + Duration::days(offset + i as i64), c))
        .collect();
    PriceSeries::from_unordered(symbol, points)
}

pub fn intraday_series(symbol: &str, closes: &[f64]) -> PriceSeries {
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_point(start() + Duration::minutes(5 * i as i64), c))
        .collect();
    PriceSeries::from_unordered(symbol, points)
}

/// Linear ramp of `n` closes starting at `from`.
pub fn ramp(from: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| from + step * i as f64).collect()
}

/// Oscillating closes that keep RSI and CCI away from the extremes.
pub fn wave(base: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| base + (i as f64 * 0.9).sin() * 3.0)
        .collect()
}

pub fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
