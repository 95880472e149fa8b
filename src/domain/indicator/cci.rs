//! Commodity Channel Index.
//!
//! CCI = (TP - SMA(TP, n)) / (0.015 * mean absolute deviation of TP over n),
//! where TP is the typical price (high + low + close) / 3. Unbounded.
//! A window with zero deviation yields 0.
//!
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{rolling_mean, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

const LAMBERT_CONSTANT: f64 = 0.015;

pub fn calculate_cci(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let tp: Vec<f64> = series.points().iter().map(|p| p.typical_price()).collect();
    let tp_sma = rolling_mean(&tp, period);

    let values = tp_sma
        .iter()
        .enumerate()
        .map(|(i, mean)| -> Option<f64> {
            let mean = (*mean)?;
            let window = &tp[i + 1 - period..=i];
            let mean_dev = window.iter().map(|x| (x - mean).abs()).sum::<f64>() / period as f64;
            Some(if mean_dev > 0.0 {
                (tp[i] - mean) / (LAMBERT_CONSTANT * mean_dev)
            } else {
                0.0
            })
        })
        .collect();

    IndicatorSeries::from_simple(IndicatorType::Cci(period), series, values)
}
