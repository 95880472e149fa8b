//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]).
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{rolling_mean, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub fn calculate_sma(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let values = rolling_mean(&series.closes(), period);
    IndicatorSeries::from_simple(IndicatorType::Sma(period), series, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::series_from_closes;
    use approx::assert_relative_eq;

    #[test]
    fn sma_warmup() {
        let series = series_from_closes(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let sma = calculate_sma(&series, 3);

        assert_eq!(sma.values.len(), 5);
        assert!(!sma.values[0].is_defined());
        assert!(!sma.values[1].is_defined());
        assert!(sma.values[2].is_defined());
        assert!(sma.values[4].is_defined());
    }

    #[test]
    fn sma20_of_linear_ramp() {
        let prices: Vec<f64> = (100..=120).map(f64::from).collect();
        let series = series_from_closes(&prices);
        let sma = calculate_sma(&series, 20);

        let expected = prices[1..].iter().sum::<f64>() / 20.0;
        assert_relative_eq!(sma.latest_simple().unwrap(), expected);
        assert_relative_eq!(expected, 110.5);
        assert_relative_eq!(sma.values[19].simple().unwrap(), 109.5);
        assert!(sma.values[18].simple().is_none());
    }

    #[test]
    fn sma_long_periods_supported() {
        let prices: Vec<f64> = (0..130).map(|i| 50.0 + i as f64).collect();
        let series = series_from_closes(&prices);

        for period in [20, 60, 120] {
            let sma = calculate_sma(&series, period);
            assert_eq!(sma.defined_count(), 130 - period + 1);
            assert_eq!(sma.indicator_type, IndicatorType::Sma(period));
        }
    }

    #[test]
    fn sma_short_series_is_undefined() {
        let series = series_from_closes(&[1.0; 19]);
        let sma = calculate_sma(&series, 20);
        assert_eq!(sma.values.len(), 19);
        assert_eq!(sma.defined_count(), 0);
    }
}
