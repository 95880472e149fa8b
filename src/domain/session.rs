//! Per-session cache of provider results.
//!
//! History is keyed by (ordered symbol list, period, interval) and quotes by
//! ordered symbol list. Nothing expires on its own; [`Session::invalidate`]
//! drops everything so the next request goes back to the provider.

use crate::domain::error::FinstreamError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::params::{HistoryPeriod, Interval};
use crate::domain::snapshot::RawQuote;
use crate::ports::market_data_port::MarketDataPort;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

type HistoryKey = (Vec<String>, HistoryPeriod, Interval);

pub struct Session<'a> {
    provider: &'a dyn MarketDataPort,
    histories: HashMap<HistoryKey, HashMap<String, PriceSeries>>,
    quotes: HashMap<Vec<String>, HashMap<String, RawQuote>>,
}

impl<'a> Session<'a> {
    pub fn new(provider: &'a dyn MarketDataPort) -> Self {
        Self {
            provider,
            histories: HashMap::new(),
            quotes: HashMap::new(),
        }
    }

    pub fn history(
        &mut self,
        symbols: &[String],
        period: HistoryPeriod,
        interval: Interval,
    ) -> Result<&HashMap<String, PriceSeries>, FinstreamError> {
        let provider = self.provider;
        match self.histories.entry((symbols.to_vec(), period, interval)) {
            Entry::Occupied(entry) => {
                tracing::debug!(symbols = symbols.len(), %period, %interval, "history cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                tracing::debug!(symbols = symbols.len(), %period, %interval, "history cache miss");
                let fetched = provider.fetch_history(symbols, period, interval)?;
                for symbol in symbols.iter().filter(|s| !fetched.contains_key(*s)) {
                    tracing::warn!(symbol = %symbol, %period, %interval, "provider returned no history");
                }
                Ok(entry.insert(fetched))
            }
        }
    }

    pub fn quotes(&mut self, symbols: &[String]) -> Result<&HashMap<String, RawQuote>, FinstreamError> {
        let provider = self.provider;
        match self.quotes.entry(symbols.to_vec()) {
            Entry::Occupied(entry) => {
                tracing::debug!(symbols = symbols.len(), "quote cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                tracing::debug!(symbols = symbols.len(), "quote cache miss");
                let fetched = provider.fetch_quotes(symbols)?;
                Ok(entry.insert(fetched))
            }
        }
    }

    pub fn invalidate(&mut self) {
        tracing::info!(
            histories = self.histories.len(),
            quotes = self.quotes.len(),
            "session cache invalidated"
        );
        self.histories.clear();
        self.quotes.clear();
    }

    pub fn cached_entries(&self) -> usize {
        self.histories.len() + self.quotes.len()
    }
}
