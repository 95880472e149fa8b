//! Accumulated gain curves for benchmarks and an equal-weight portfolio.
//!
//! Each series is cut to its trailing window and rebased so the window's
//! first bar reads 0%. The portfolio curve is the bar-by-bar arithmetic mean
//! of its members' rebased curves; members must cover exactly the same
//! window timestamps or the aggregation is refused.

use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDateTime;

pub const PORTFOLIO_LABEL: &str = "Portfolio";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GainError {
    #[error("gain window must span at least one bar")]
    EmptyWindow,

    #[error("{symbol}: window of {window} bars exceeds the {bars} available")]
    ShortSeries {
        symbol: String,
        bars: usize,
        window: usize,
    },

    #[error("{symbol}: window start value {value} is not positive")]
    NonPositiveBase { symbol: String, value: f64 },

    #[error("portfolio has no symbols")]
    EmptyPortfolio,

    #[error("{symbol} does not share the window timestamps of {reference}")]
    Misaligned { symbol: String, reference: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainPoint {
    pub timestamp: NaiveDateTime,
    pub gain_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GainCurve {
    pub label: String,
    pub points: Vec<GainPoint>,
}

impl GainCurve {
    pub fn last_gain(&self) -> Option<f64> {
        self.points.last().map(|p| p.gain_pct)
    }
}

/// Percent gain of every bar in the trailing `num_points` window relative to
/// the window's first bar.
pub fn normalize_gain(series: &PriceSeries, num_points: usize) -> Result<GainCurve, GainError> {
    if num_points == 0 {
        return Err(GainError::EmptyWindow);
    }
    if series.len() < num_points {
        return Err(GainError::ShortSeries {
            symbol: series.symbol().to_string(),
            bars: series.len(),
            window: num_points,
        });
    }

    let window = series.tail(num_points);
    let base = window[0].close;
    if !(base > 0.0) {
        return Err(GainError::NonPositiveBase {
            symbol: series.symbol().to_string(),
            value: base,
        });
    }

    let points = window
        .iter()
        .map(|bar| GainPoint {
            timestamp: bar.timestamp,
            gain_pct: (bar.close / base - 1.0) * 100.0,
        })
        .collect();

    Ok(GainCurve {
        label: series.symbol().to_string(),
        points,
    })
}

/// Equal-weight mean of the members' rebased curves.
pub fn portfolio_curve(members: &[&PriceSeries], num_points: usize) -> Result<GainCurve, GainError> {
    let curves = members
        .iter()
        .map(|series| normalize_gain(series, num_points))
        .collect::<Result<Vec<_>, _>>()?;

    let (reference, rest) = curves.split_first().ok_or(GainError::EmptyPortfolio)?;
    for curve in rest {
        let aligned = curve
            .points
            .iter()
            .zip(&reference.points)
            .all(|(a, b)| a.timestamp == b.timestamp);
        if !aligned {
            return Err(GainError::Misaligned {
                symbol: curve.label.clone(),
                reference: reference.label.clone(),
            });
        }
    }

    let count = curves.len() as f64;
    let points = reference
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let sum: f64 = curves.iter().map(|c| c.points[i].gain_pct).sum();
            GainPoint {
                timestamp: point.timestamp,
                gain_pct: sum / count,
            }
        })
        .collect();

    Ok(GainCurve {
        label: PORTFOLIO_LABEL.to_string(),
        points,
    })
}

/// One curve per benchmark, followed by the portfolio curve.
pub fn aggregate_gains(
    benchmarks: &[&PriceSeries],
    portfolio: &[&PriceSeries],
    num_points: usize,
) -> Result<Vec<GainCurve>, GainError> {
    let mut curves = benchmarks
        .iter()
        .map(|series| normalize_gain(series, num_points))
        .collect::<Result<Vec<_>, _>>()?;
    curves.push(portfolio_curve(portfolio, num_points)?);
    Ok(curves)
}
