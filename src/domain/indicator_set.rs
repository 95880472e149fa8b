//! Per-symbol bundle of computed indicator series.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;
use std::collections::HashMap;

/// Indicators the snapshot table reports for every symbol.
pub const SNAPSHOT_INDICATORS: [IndicatorType; 2] = [IndicatorType::RSI_14, IndicatorType::CCI_14];

/// Moving-average periods offered on the stock chart.
pub const MA_PERIODS: [usize; 3] = [20, 60, 120];

#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    pub symbol: String,
    pub bars: usize,
    series: HashMap<IndicatorType, IndicatorSeries>,
}

impl IndicatorSet {
    pub fn get(&self, indicator: &IndicatorType) -> Option<&IndicatorSeries> {
        self.series.get(indicator)
    }

    pub fn latest_simple(&self, indicator: &IndicatorType) -> Option<f64> {
        self.get(indicator).and_then(IndicatorSeries::latest_simple)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Computes each requested indicator once over `series`.
pub fn compute_indicators(series: &PriceSeries, indicators: &[IndicatorType]) -> IndicatorSet {
    let mut computed = HashMap::with_capacity(indicators.len());
    for indicator in indicators {
        computed
            .entry(*indicator)
            .or_insert_with(|| indicator.calculate(series));
    }
    IndicatorSet {
        symbol: series.symbol().to_string(),
        bars: series.len(),
        series: computed,
    }
}

/// Every indicator the stock view can draw.
pub fn chart_indicators() -> Vec<IndicatorType> {
    let mut indicators = vec![
        IndicatorType::RSI_14,
        IndicatorType::CCI_14,
        IndicatorType::MACD_DEFAULT,
        IndicatorType::BOLLINGER_DEFAULT,
    ];
    indicators.extend(MA_PERIODS.iter().map(|&p| IndicatorType::Sma(p)));
    indicators
}
