//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are undefined.

use crate::domain::indicator::stddev::stddev_values;
use crate::domain::indicator::{
    calculate_sma, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::PriceSeries;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULT_X100: u32 = 200;

pub fn calculate_bollinger(
    series: &PriceSeries,
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let mult = stddev_mult_x100 as f64 / 100.0;
    let middle = calculate_sma(series, period);
    let stddev = stddev_values(&series.closes(), period);

    let values = middle
        .values
        .iter()
        .zip(stddev)
        .map(|(mid, dev)| {
            let value = match (mid.simple(), dev) {
                (Some(middle), Some(dev)) => Some(IndicatorValue::Bollinger {
                    upper: middle + mult * dev,
                    middle,
                    lower: middle - mult * dev,
                }),
                _ => None,
            };
            IndicatorPoint {
                timestamp: mid.timestamp,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::series_from_closes;

    fn bands(point: &IndicatorPoint) -> (f64, f64, f64) {
        match point.value {
            Some(IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            }) => (upper, middle, lower),
            _ => panic!("Expected Bollinger value"),
        }
    }

    #[test]
    fn bollinger_warmup() {
        let series = series_from_closes(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let boll = calculate_bollinger(&series, 3, 200);

        assert!(!boll.values[0].is_defined());
        assert!(!boll.values[1].is_defined());
        assert!(boll.values[2].is_defined());
        assert!(boll.values[4].is_defined());
    }

    #[test]
    fn bollinger_short_series_is_undefined() {
        let series = series_from_closes(&[100.0; 19]);
        let boll = calculate_bollinger(&series, DEFAULT_PERIOD, DEFAULT_MULT_X100);
        assert_eq!(boll.defined_count(), 0);
    }

    #[test]
    fn bollinger_constant_values() {
        let boll = calculate_bollinger(&series_from_closes(&[100.0; 5]), 3, 200);
        let (upper, middle, lower) = bands(&boll.values[2]);

        assert!((middle - 100.0).abs() < f64::EPSILON);
        assert!((upper - 100.0).abs() < f64::EPSILON);
        assert!((lower - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bollinger_basic_calculation() {
        let boll = calculate_bollinger(&series_from_closes(&[10.0, 20.0, 30.0]), 3, 200);
        let (upper, middle, lower) = bands(&boll.values[2]);

        let expected_middle: f64 = 20.0;
        let variance: f64 = (100.0 + 0.0 + 100.0) / 3.0;
        let stddev = variance.sqrt();

        assert!((middle - expected_middle).abs() < 1e-10);
        assert!((upper - (expected_middle + 2.0 * stddev)).abs() < 1e-10);
        assert!((lower - (expected_middle - 2.0 * stddev)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_symmetry() {
        let boll = calculate_bollinger(&series_from_closes(&[10.0, 20.0, 30.0]), 3, 100);
        let (upper, middle, lower) = bands(&boll.values[2]);
        assert!(((upper - middle) - (middle - lower)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_indicator_type() {
        let boll = calculate_bollinger(&series_from_closes(&[10.0]), 20, 200);
        assert_eq!(boll.indicator_type, IndicatorType::BOLLINGER_DEFAULT);
    }
}
