//! Renderer-neutral chart descriptions for the stock, market and gain views.
//!
//! Indicators are always computed over the full history and only then cut to
//! the view window, so a window never starts inside an indicator's warm-up
//! unless the whole history is that short.

use crate::domain::gain::GainCurve;
use crate::domain::indicator::{IndicatorPoint, IndicatorType, IndicatorValue};
use crate::domain::indicator_set::{chart_indicators, compute_indicators, IndicatorSet, MA_PERIODS};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::params::display_name;
use crate::domain::screening::Thresholds;
use chrono::NaiveDateTime;

pub const THRESHOLD_COLOR: &str = "#FFAA00";
pub const PRICE_COLOR: &str = "steelblue";
pub const SIGNAL_COLOR: &str = "orange";
pub const BOLLINGER_COLOR: &str = "gray";
pub const RSI_DOMAIN: (f64, f64) = (10.0, 90.0);
pub const CCI_DOMAIN: (f64, f64) = (-200.0, 200.0);

const MA_COLORS: [&str; 3] = ["red", "green", "orange"];
const GAIN_PALETTE: [&str; 6] = ["steelblue", "orange", "green", "purple", "brown", "gray"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub label: String,
    pub color: &'static str,
    pub style: LineStyle,
    pub points: Vec<(NaiveDateTime, Option<f64>)>,
}

impl LineSeries {
    pub fn last_defined(&self) -> Option<f64> {
        self.points.iter().rev().find_map(|(_, v)| *v)
    }

    pub fn defined_count(&self) -> usize {
        self.points.iter().filter(|(_, v)| v.is_some()).count()
    }
}

/// Horizontal rule at a fixed value.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarTone {
    Positive,
    Negative,
}

impl BarTone {
    /// Green strictly above zero, red otherwise.
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            BarTone::Positive
        } else {
            BarTone::Negative
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            BarTone::Positive => "green",
            BarTone::Negative => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub label: String,
    pub bars: Vec<(NaiveDateTime, Option<f64>)>,
}

impl BarSeries {
    pub fn tones(&self) -> Vec<Option<BarTone>> {
        self.bars.iter().map(|(_, v)| v.map(BarTone::of)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub y_domain: Option<(f64, f64)>,
    pub lines: Vec<LineSeries>,
    pub references: Vec<ReferenceLine>,
    pub bars: Option<BarSeries>,
}

impl Chart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            y_domain: None,
            lines: Vec::new(),
            references: Vec::new(),
            bars: None,
        }
    }

    pub fn line(&self, label: &str) -> Option<&LineSeries> {
        self.lines.iter().find(|l| l.label == label)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockChartOptions {
    pub bollinger: bool,
    pub ma20: bool,
    pub ma60: bool,
    pub ma120: bool,
}

impl StockChartOptions {
    fn ma_enabled(&self) -> [bool; 3] {
        [self.ma20, self.ma60, self.ma120]
    }
}

fn extract(
    window: &[IndicatorPoint],
    pick: impl Fn(&IndicatorValue) -> Option<f64>,
) -> Vec<(NaiveDateTime, Option<f64>)> {
    window
        .iter()
        .map(|p| (p.timestamp, p.value.as_ref().and_then(&pick)))
        .collect()
}

fn line(
    label: impl Into<String>,
    color: &'static str,
    style: LineStyle,
    points: Vec<(NaiveDateTime, Option<f64>)>,
) -> LineSeries {
    LineSeries {
        label: label.into(),
        color,
        style,
        points,
    }
}

fn simple(v: &IndicatorValue) -> Option<f64> {
    match v {
        IndicatorValue::Simple(x) => Some(*x),
        _ => None,
    }
}

fn indicator_window<'a>(
    set: &'a IndicatorSet,
    indicator: &IndicatorType,
    n: usize,
) -> &'a [IndicatorPoint] {
    set.get(indicator).map(|s| s.tail(n)).unwrap_or(&[])
}

fn price_line(series: &PriceSeries, n: usize) -> LineSeries {
    let points: Vec<_> = series
        .tail(n)
        .iter()
        .map(|p| (p.timestamp, Some(p.close)))
        .collect();
    line(series.symbol(), PRICE_COLOR, LineStyle::Solid, points)
}

fn threshold_pair(low: f64, high: f64) -> Vec<ReferenceLine> {
    vec![
        ReferenceLine {
            label: "low".to_string(),
            value: low,
            color: THRESHOLD_COLOR,
        },
        ReferenceLine {
            label: "high".to_string(),
            value: high,
            color: THRESHOLD_COLOR,
        },
    ]
}

/// Price (with optional overlays), RSI, CCI and MACD charts for one symbol.
pub fn stock_charts(
    series: &PriceSeries,
    num_points: usize,
    thresholds: &Thresholds,
    options: StockChartOptions,
) -> Vec<Chart> {
    let set = compute_indicators(series, &chart_indicators());
    let symbol = series.symbol();

    let mut price = Chart::new(format!("{} Price", symbol));
    price.lines.push(price_line(series, num_points));
    if options.bollinger {
        let window = indicator_window(&set, &IndicatorType::BOLLINGER_DEFAULT, num_points);
        let bands: [(&str, fn(&IndicatorValue) -> Option<f64>); 3] = [
            ("BB Upper", |v| match v {
                IndicatorValue::Bollinger { upper, .. } => Some(*upper),
                _ => None,
            }),
            ("BB Middle", |v| match v {
                IndicatorValue::Bollinger { middle, .. } => Some(*middle),
                _ => None,
            }),
            ("BB Lower", |v| match v {
                IndicatorValue::Bollinger { lower, .. } => Some(*lower),
                _ => None,
            }),
        ];
        for (label, pick) in bands {
            price.lines.push(line(
                label,
                BOLLINGER_COLOR,
                LineStyle::Dashed,
                extract(window, pick),
            ));
        }
    }
    for ((period, color), enabled) in MA_PERIODS
        .iter()
        .zip(MA_COLORS)
        .zip(options.ma_enabled())
    {
        if !enabled {
            continue;
        }
        let window = indicator_window(&set, &IndicatorType::Sma(*period), num_points);
        price.lines.push(line(
            format!("MA{}", period),
            color,
            LineStyle::Solid,
            extract(window, simple),
        ));
    }

    let mut rsi = Chart::new(format!("{} RSI(14)", symbol));
    rsi.y_domain = Some(RSI_DOMAIN);
    rsi.lines.push(line(
        "RSI(14)",
        PRICE_COLOR,
        LineStyle::Solid,
        extract(indicator_window(&set, &IndicatorType::RSI_14, num_points), simple),
    ));
    rsi.references = threshold_pair(thresholds.rsi_low, thresholds.rsi_high);

    let mut cci = Chart::new(format!("{} CCI(14)", symbol));
    cci.y_domain = Some(CCI_DOMAIN);
    cci.lines.push(line(
        "CCI(14)",
        PRICE_COLOR,
        LineStyle::Solid,
        extract(indicator_window(&set, &IndicatorType::CCI_14, num_points), simple),
    ));
    cci.references = threshold_pair(thresholds.cci_low, thresholds.cci_high);

    let macd_window = indicator_window(&set, &IndicatorType::MACD_DEFAULT, num_points);
    let mut macd = Chart::new(format!("{} MACD(12,26,9)", symbol));
    macd.lines.push(line(
        "MACD",
        PRICE_COLOR,
        LineStyle::Solid,
        extract(macd_window, |v| match v {
            IndicatorValue::Macd { line, .. } => Some(*line),
            _ => None,
        }),
    ));
    macd.lines.push(line(
        "Signal",
        SIGNAL_COLOR,
        LineStyle::Solid,
        extract(macd_window, |v| match v {
            IndicatorValue::Macd { signal, .. } => Some(*signal),
            _ => None,
        }),
    ));
    macd.bars = Some(BarSeries {
        label: "Histogram".to_string(),
        bars: extract(macd_window, |v| match v {
            IndicatorValue::Macd { histogram, .. } => Some(*histogram),
            _ => None,
        }),
    });

    vec![price, rsi, cci, macd]
}

/// Percent move of `last` from the previous close.
pub fn market_delta(last: f64, prev_close: f64) -> Option<f64> {
    if prev_close == 0.0 || !prev_close.is_finite() || !last.is_finite() {
        return None;
    }
    Some((last - prev_close) / prev_close * 100.0)
}

/// Intraday close line with a previous-close rule. Missing pieces degrade
/// the chart rather than failing it.
pub fn market_chart(
    symbol: &str,
    series: Option<&PriceSeries>,
    num_points: usize,
    prev_close: Option<f64>,
) -> Chart {
    let name = display_name(symbol);
    let last = series.and_then(|s| s.last()).map(|p| p.close);
    let delta = match (last, prev_close) {
        (Some(last), Some(prev)) => market_delta(last, prev),
        _ => None,
    };

    let mut chart = match delta {
        Some(delta) => Chart::new(format!("{} ({:.2}%)", name, delta)),
        None => Chart::new(name),
    };
    if let Some(series) = series {
        chart.lines.push(price_line(series, num_points));
    }
    if let Some(prev) = prev_close.filter(|p| p.is_finite()) {
        chart.references.push(ReferenceLine {
            label: "Previous Close".to_string(),
            value: prev,
            color: THRESHOLD_COLOR,
        });
    }
    chart
}

/// One line per curve, labels kept in curve order.
pub fn gain_chart(curves: &[GainCurve]) -> Chart {
    let mut chart = Chart::new("Accumulated Gain (%)");
    for (curve, color) in curves.iter().zip(GAIN_PALETTE.iter().cycle()) {
        let points = curve
            .points
            .iter()
            .map(|p| (p.timestamp, Some(p.gain_pct)))
            .collect();
        chart
            .lines
            .push(line(curve.label.clone(), *color, LineStyle::Solid, points));
    }
    chart.references.push(ReferenceLine {
        label: "0%".to_string(),
        value: 0.0,
        color: BOLLINGER_COLOR,
    });
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gain::GainPoint;
    use crate::domain::indicator::test_support::series_from_closes;
    use approx::assert_relative_eq;

    fn thresholds() -> Thresholds {
        Thresholds {
            rsi_low: 30.0,
            rsi_high: 70.0,
            cci_low: -100.0,
            cci_high: 100.0,
        }
    }

    fn zigzag(n: usize) -> PriceSeries {
        let prices: Vec<f64> = (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect();
        series_from_closes(&prices)
    }

    #[test]
    fn bar_tone_sign() {
        assert_eq!(BarTone::of(0.5), BarTone::Positive);
        assert_eq!(BarTone::of(0.0), BarTone::Negative);
        assert_eq!(BarTone::of(-0.1).color(), "red");
    }

    #[test]
    fn stock_charts_default_layout() {
        let charts = stock_charts(&zigzag(200), 21, &thresholds(), StockChartOptions::default());

        let titles: Vec<&str> = charts.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["TEST Price", "TEST RSI(14)", "TEST CCI(14)", "TEST MACD(12,26,9)"]
        );
        assert_eq!(charts[0].lines.len(), 1);
        assert_eq!(charts[0].lines[0].points.len(), 21);
        assert_eq!(charts[1].y_domain, Some(RSI_DOMAIN));
        assert_eq!(charts[2].y_domain, Some(CCI_DOMAIN));
        assert_eq!(charts[1].references[0].value, 30.0);
        assert_eq!(charts[2].references[1].value, 100.0);
        assert!(charts[1].references.iter().all(|r| r.color == THRESHOLD_COLOR));
    }

    #[test]
    fn overlays_are_opt_in() {
        let options = StockChartOptions {
            bollinger: true,
            ma20: true,
            ma60: false,
            ma120: true,
        };
        let charts = stock_charts(&zigzag(200), 21, &thresholds(), options);
        let price = &charts[0];

        assert!(price.line("BB Upper").is_some());
        assert_eq!(price.line("BB Lower").unwrap().style, LineStyle::Dashed);
        assert_eq!(price.line("MA20").unwrap().color, "red");
        assert!(price.line("MA60").is_none());
        assert_eq!(price.line("MA120").unwrap().color, "orange");
        assert_eq!(price.line("MA120").unwrap().defined_count(), 21);
    }

    #[test]
    fn window_inside_warmup_has_gaps() {
        let charts = stock_charts(
            &zigzag(30),
            30,
            &thresholds(),
            StockChartOptions {
                ma60: true,
                ..Default::default()
            },
        );
        assert_eq!(charts[0].line("MA60").unwrap().defined_count(), 0);

        let rsi = &charts[1].lines[0];
        assert_eq!(rsi.points.len(), 30);
        assert_eq!(rsi.defined_count(), 30 - 14);
        assert!(rsi.points[..14].iter().all(|(_, v)| v.is_none()));
    }

    #[test]
    fn macd_histogram_bars() {
        let charts = stock_charts(&zigzag(120), 40, &thresholds(), StockChartOptions::default());
        let macd = &charts[3];
        let bars = macd.bars.as_ref().unwrap();

        assert_eq!(bars.bars.len(), 40);
        let line = macd.line("MACD").unwrap();
        let signal = macd.line("Signal").unwrap();
        for i in 0..40 {
            let (_, h) = bars.bars[i];
            let expected = line.points[i].1.zip(signal.points[i].1).map(|(l, s)| l - s);
            match (h, expected) {
                (Some(h), Some(e)) => assert_relative_eq!(h, e, epsilon = 1e-9),
                (None, None) => {}
                other => panic!("histogram mismatch at {}: {:?}", i, other),
            }
        }
        assert!(bars.tones().iter().all(Option::is_some));
    }

    #[test]
    fn market_delta_percent() {
        assert_relative_eq!(market_delta(102.0, 100.0).unwrap(), 2.0);
        assert_eq!(market_delta(1.0, 0.0), None);
    }

    #[test]
    fn market_chart_title_and_reference() {
        let series = PriceSeries::from_unordered("NQ=F", zigzag(50).points().to_vec());
        let last = series.last().unwrap().close;
        let chart = market_chart("NQ=F", Some(&series), 10, Some(100.0));

        let expected = format!("NASDAQ Futures ({:.2}%)", (last - 100.0) / 100.0 * 100.0);
        assert_eq!(chart.title, expected);
        assert_eq!(chart.references[0].value, 100.0);
        assert_eq!(chart.lines[0].points.len(), 10);
    }

    #[test]
    fn market_chart_degrades() {
        let no_prev = market_chart("ES=F", Some(&zigzag(10)), 5, None);
        assert_eq!(no_prev.title, "S&P 500 Futures");
        assert!(no_prev.references.is_empty());

        let no_history = market_chart("GC=F", None, 5, Some(2000.0));
        assert_eq!(no_history.title, "GC=F");
        assert!(no_history.lines.is_empty());
        assert_eq!(no_history.references.len(), 1);
    }

    #[test]
    fn gain_chart_lines_follow_curves() {
        let ts = zigzag(2).timestamps();
        let curve = |label: &str, last: f64| GainCurve {
            label: label.to_string(),
            points: vec![
                GainPoint {
                    timestamp: ts[0],
                    gain_pct: 0.0,
                },
                GainPoint {
                    timestamp: ts[1],
                    gain_pct: last,
                },
            ],
        };
        let chart = gain_chart(&[curve("SPY", 1.5), curve("Portfolio", -2.0)]);

        assert_eq!(chart.lines.len(), 2);
        assert_eq!(chart.line("Portfolio").unwrap().last_defined(), Some(-2.0));
        assert_ne!(chart.lines[0].color, chart.lines[1].color);
    }
}
