//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over first n bars
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 * avg_gain / (avg_gain + avg_loss)
//! A flat window (no gains, no losses) yields 0.
//!
//! Warmup: first n bars are undefined (need n price changes to compute initial average).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub fn calculate_rsi(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let closes = series.closes();
    let mut values: Vec<Option<f64>> = vec![None; closes.len()];

    if period == 0 || closes.len() <= period {
        return IndicatorSeries::from_simple(IndicatorType::Rsi(period), series, values);
    }

    let mut gains: Vec<f64> = Vec::with_capacity(closes.len() - 1);
    let mut losses: Vec<f64> = Vec::with_capacity(closes.len() - 1);
    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;
    values[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    for gain_idx in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[gain_idx]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[gain_idx]) / period as f64;
        values[gain_idx + 1] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    IndicatorSeries::from_simple(IndicatorType::Rsi(period), series, values)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let total = avg_gain + avg_loss;
    if total == 0.0 {
        return 0.0;
    }
    (100.0 * avg_gain / total).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::series_from_closes;

    #[test]
    fn rsi_empty_series() {
        let series = series_from_closes(&[]);
        let rsi = calculate_rsi(&series, 14);
        assert_eq!(rsi.values.len(), 0);
    }

    #[test]
    fn rsi_single_bar() {
        let series = series_from_closes(&[100.0]);
        let rsi = calculate_rsi(&series, 14);
        assert_eq!(rsi.values.len(), 1);
        assert!(!rsi.values[0].is_defined());
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let rsi = calculate_rsi(&series_from_closes(&prices), 14);

        assert_eq!(rsi.values.len(), 15);
        for i in 0..14 {
            assert!(!rsi.values[i].is_defined(), "Bar {} should be undefined", i);
        }
        assert!(rsi.values[14].is_defined(), "Bar 14 should be defined");
    }

    #[test]
    fn rsi_fourteen_bars_is_all_undefined() {
        let prices: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        let rsi = calculate_rsi(&series_from_closes(&prices), 14);
        assert_eq!(rsi.defined_count(), 0);
        assert!(rsi.latest().is_none());
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let rsi = calculate_rsi(&series_from_closes(&prices), 14);

        let value = rsi.values[14].simple().unwrap();
        assert!((value - 100.0).abs() < f64::EPSILON, "RSI should be 100 when all gains");
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let rsi = calculate_rsi(&series_from_closes(&prices), 14);

        let value = rsi.values[14].simple().unwrap();
        assert!(value.abs() < f64::EPSILON, "RSI should be 0 when all losses");
    }

    #[test]
    fn rsi_flat_series_is_zero() {
        let rsi = calculate_rsi(&series_from_closes(&[50.0; 20]), 14);
        assert_eq!(rsi.latest_simple(), Some(0.0));
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (1..=40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let rsi = calculate_rsi(&series_from_closes(&prices), 14);

        for value in rsi.simple_values().into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value), "RSI {} out of range", value);
        }
    }

    #[test]
    fn rsi_zero_period() {
        let rsi = calculate_rsi(&series_from_closes(&[100.0, 101.0]), 0);
        assert_eq!(rsi.values.len(), 2);
        assert_eq!(rsi.defined_count(), 0);
    }

    #[test]
    fn rsi_known_calculation() {
        let prices = [
            44.0, 44.25, 44.50, 43.75, 44.50, 44.25, 44.75, 45.25, 45.50, 45.25, 45.50, 46.0,
            46.25, 46.0, 46.50,
        ];
        let rsi = calculate_rsi(&series_from_closes(&prices), 14);

        // gains sum 4.0, losses sum 1.5 over 14 changes
        let expected = 100.0 * 4.0 / (4.0 + 1.5);
        let value = rsi.values[14].simple().unwrap();
        assert!((value - expected).abs() < 1e-9);
    }

    #[test]
    fn rsi_wilder_smoothing_step() {
        let mut prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        prices.push(110.0);
        let rsi = calculate_rsi(&series_from_closes(&prices), 14);

        // seed: avg_gain 1, avg_loss 0; next change -4
        let avg_gain = 13.0 / 14.0;
        let avg_loss = 4.0 / 14.0;
        let expected = 100.0 * avg_gain / (avg_gain + avg_loss);
        assert!((rsi.values[15].simple().unwrap() - expected).abs() < 1e-9);
    }
}
