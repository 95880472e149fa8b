//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values
//!
//! Every series is aligned bar-for-bar with its input. Bars inside an
//! indicator's warm-up carry no value at all, never a placeholder zero.

pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use bollinger::calculate_bollinger;
pub use cci::calculate_cci;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDateTime;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub timestamp: NaiveDateTime,
    pub value: Option<IndicatorValue>,
}

impl IndicatorPoint {
    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }

    pub fn simple(&self) -> Option<f64> {
        match self.value {
            Some(IndicatorValue::Simple(v)) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
    Cci(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

impl IndicatorType {
    pub const RSI_14: IndicatorType = IndicatorType::Rsi(14);
    pub const CCI_14: IndicatorType = IndicatorType::Cci(14);
    pub const MACD_DEFAULT: IndicatorType = IndicatorType::Macd {
        fast: macd::DEFAULT_FAST,
        slow: macd::DEFAULT_SLOW,
        signal: macd::DEFAULT_SIGNAL,
    };
    pub const BOLLINGER_DEFAULT: IndicatorType = IndicatorType::Bollinger {
        period: bollinger::DEFAULT_PERIOD,
        stddev_mult_x100: bollinger::DEFAULT_MULT_X100,
    };

    /// Bars needed before the first defined value appears.
    pub fn min_bars(&self) -> usize {
        match *self {
            IndicatorType::Sma(n) | IndicatorType::Cci(n) => n,
            IndicatorType::Rsi(n) => n + 1,
            IndicatorType::Macd { slow, signal, .. } => (slow + signal).saturating_sub(1),
            IndicatorType::Bollinger { period, .. } => period,
        }
    }

    pub fn calculate(&self, series: &PriceSeries) -> IndicatorSeries {
        match *self {
            IndicatorType::Sma(n) => calculate_sma(series, n),
            IndicatorType::Rsi(n) => calculate_rsi(series, n),
            IndicatorType::Cci(n) => calculate_cci(series, n),
            IndicatorType::Macd { fast, slow, signal } => {
                calculate_macd(series, fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => calculate_bollinger(series, period, stddev_mult_x100),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Builds a single-valued series from per-bar optional values.
    pub(crate) fn from_simple(
        indicator_type: IndicatorType,
        series: &PriceSeries,
        values: Vec<Option<f64>>,
    ) -> Self {
        let values = series
            .points()
            .iter()
            .zip(values)
            .map(|(p, v)| IndicatorPoint {
                timestamp: p.timestamp,
                value: v.map(IndicatorValue::Simple),
            })
            .collect();
        Self {
            indicator_type,
            values,
        }
    }

    /// Value at the most recent bar, absent while still warming up.
    pub fn latest(&self) -> Option<&IndicatorValue> {
        self.values.last().and_then(|p| p.value.as_ref())
    }

    pub fn latest_simple(&self) -> Option<f64> {
        self.values.last().and_then(IndicatorPoint::simple)
    }

    pub fn simple_values(&self) -> Vec<Option<f64>> {
        self.values.iter().map(IndicatorPoint::simple).collect()
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|p| p.is_defined()).count()
    }

    pub fn tail(&self, n: usize) -> &[IndicatorPoint] {
        &self.values[self.values.len().saturating_sub(n)..]
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Cci(period) => write!(f, "CCI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}

/// Rolling arithmetic mean of `data`, `None` for the first `period - 1` slots.
pub(crate) fn rolling_mean(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; data.len()];
    if period == 0 || data.len() < period {
        return out;
    }
    for i in (period - 1)..data.len() {
        let window = &data[i + 1 - period..=i];
        out[i] = Some(window.iter().sum::<f64>() / period as f64);
    }
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::ohlcv::{PricePoint, PriceSeries};
    use chrono::{Duration, NaiveDate};

    pub fn series_from_closes(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect();
        PriceSeries::from_unordered("TEST", points)
    }

    pub fn series_from_hlc(bars: &[(f64, f64, f64)]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let points = bars
            .iter()
            .enumerate()
            .map(|(i, &(high, low, close))| PricePoint {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high,
                low,
                close,
                volume: 1000,
            })
            .collect();
        PriceSeries::from_unordered("TEST", points)
    }
}
