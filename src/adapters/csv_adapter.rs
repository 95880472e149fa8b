//! CSV file market data adapter.
//!
//! History lives in `{SYMBOL}_{interval}.csv` (`timestamp,open,high,low,close,volume`)
//! and quote snapshots in `quotes.csv` (`symbol` followed by one column per
//! provider field).

use crate::domain::error::FinstreamError;
use crate::domain::ohlcv::{PricePoint, PriceSeries};
use crate::domain::params::{HistoryPeriod, Interval};
use crate::domain::snapshot::RawQuote;
use crate::ports::market_data_port::MarketDataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub const QUOTES_FILE: &str = "quotes.csv";

pub struct CsvMarketDataAdapter {
    base_path: PathBuf,
}

impl CsvMarketDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, interval: Interval) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", symbol, interval.token()))
    }

    fn check_base(&self) -> Result<(), FinstreamError> {
        if self.base_path.is_dir() {
            Ok(())
        } else {
            Err(FinstreamError::Provider {
                reason: format!("data directory {} not found", self.base_path.display()),
            })
        }
    }

    fn read_series(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<Option<PriceSeries>, FinstreamError> {
        let path = self.csv_path(symbol, interval);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| FinstreamError::Provider {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;
            let bad = |column: &str, detail: String| FinstreamError::Provider {
                reason: format!("{} row {}: {} {}", path.display(), row + 1, column, detail),
            };

            let ts_str = record.get(0).ok_or_else(|| bad("timestamp", "missing".into()))?;
            let timestamp =
                parse_timestamp(ts_str).ok_or_else(|| bad("timestamp", format!("invalid: {:?}", ts_str)))?;

            let mut prices = [0.0_f64; 4];
            for (i, column) in ["open", "high", "low", "close"].iter().enumerate() {
                let raw = record.get(i + 1).ok_or_else(|| bad(column, "missing".into()))?;
                prices[i] = raw
                    .trim()
                    .parse()
                    .map_err(|e| bad(column, format!("invalid: {}", e)))?;
            }
            let volume: i64 = match record.get(5).map(str::trim) {
                None | Some("") => 0,
                Some(raw) => raw
                    .parse::<f64>()
                    .map(|v| v as i64)
                    .map_err(|e| bad("volume", format!("invalid: {}", e)))?,
            };

            points.push(PricePoint {
                timestamp,
                open: prices[0],
                high: prices[1],
                low: prices[2],
                close: prices[3],
                volume,
            });
        }

        Ok(Some(PriceSeries::from_unordered(symbol, points)))
    }
}

/// `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD` (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Keeps the bars no older than `period` before the latest bar.
fn within_period(series: PriceSeries, period: HistoryPeriod) -> PriceSeries {
    let Some(latest) = series.last().map(|p| p.timestamp) else {
        return series;
    };
    let cutoff = latest - period.span();
    let kept = series
        .points()
        .iter()
        .filter(|p| p.timestamp >= cutoff)
        .cloned()
        .collect();
    PriceSeries::from_unordered(series.symbol(), kept)
}

impl MarketDataPort for CsvMarketDataAdapter {
    fn fetch_history(
        &self,
        symbols: &[String],
        period: HistoryPeriod,
        interval: Interval,
    ) -> Result<HashMap<String, PriceSeries>, FinstreamError> {
        self.check_base()?;
        let mut out = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            match self.read_series(symbol, interval) {
                Ok(Some(series)) => {
                    out.insert(symbol.clone(), within_period(series, period));
                }
                Ok(None) => {
                    tracing::debug!(symbol = %symbol, %interval, "no history file");
                }
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "history file unreadable, skipped");
                }
            }
        }
        Ok(out)
    }

    fn fetch_quotes(&self, symbols: &[String]) -> Result<HashMap<String, RawQuote>, FinstreamError> {
        self.check_base()?;
        let path = self.base_path.join(QUOTES_FILE);
        if !path.exists() {
            tracing::warn!(path = %path.display(), "quotes file not found");
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| FinstreamError::Provider {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?
            .clone();

        let mut out = HashMap::new();
        for result in rdr.records() {
            let record = result.map_err(|e| FinstreamError::Provider {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;
            let Some(symbol) = record.get(0).map(str::trim) else {
                continue;
            };
            if !symbols.iter().any(|s| s == symbol) {
                continue;
            }

            let mut quote = RawQuote::new();
            for (field, raw) in headers.iter().zip(record.iter()).skip(1) {
                let raw = raw.trim();
                if raw.is_empty() {
                    continue;
                }
                match raw.parse::<f64>() {
                    Ok(value) => quote.insert(field.trim(), value),
                    Err(_) => {
                        tracing::warn!(symbol = %symbol, field = %field, value = %raw, "non-numeric quote field dropped");
                    }
                }
            }
            out.insert(symbol.to_string(), quote);
        }
        Ok(out)
    }
}
