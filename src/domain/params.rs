//! Durable dashboard parameters: symbol lists, screening thresholds and the
//! period selections of the three views.
//!
//! Also holds the boundary checks applied before any parameter change is
//! accepted, and the period vocabulary shared by the views.

use crate::domain::error::FinstreamError;
use crate::domain::screening::Thresholds;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PARAMS_PATH: &str = "param.ini";

pub const SECTION_SYMBOLS: &str = "symbols";
pub const SECTION_THRESHOLDS: &str = "thresholds";
pub const SECTION_VIEWS: &str = "views";

/// Span of history requested from the market data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryPeriod {
    FiveDays,
    OneYear,
}

impl HistoryPeriod {
    pub fn token(&self) -> &'static str {
        match self {
            HistoryPeriod::FiveDays => "5d",
            HistoryPeriod::OneYear => "1y",
        }
    }

    pub fn span(&self) -> chrono::Duration {
        match self {
            HistoryPeriod::FiveDays => chrono::Duration::days(5),
            HistoryPeriod::OneYear => chrono::Duration::days(365),
        }
    }
}

/// Bar size requested from the market data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    FiveMinutes,
    OneDay,
}

impl Interval {
    pub fn token(&self) -> &'static str {
        match self {
            Interval::FiveMinutes => "5m",
            Interval::OneDay => "1d",
        }
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown period {given:?}, expected one of {expected}")]
pub struct PeriodParseError {
    pub given: String,
    pub expected: String,
}

/// One year of daily bars: the snapshot history and the base of every
/// [`HistoryWindow`].
pub const DAILY_HISTORY: (HistoryPeriod, Interval) = (HistoryPeriod::OneYear, Interval::OneDay);

/// Five days of 5-minute bars, the base of every [`MarketWindow`].
pub const INTRADAY_HISTORY: (HistoryPeriod, Interval) = (HistoryPeriod::FiveDays, Interval::FiveMinutes);

/// A selectable view window: a fraction of a fixed history request.
pub trait ViewWindow: Copy {
    fn token(&self) -> &'static str;
    fn divisor(&self) -> usize;
    fn history(&self) -> (HistoryPeriod, Interval);

    /// Window length for a history of `len` bars.
    fn num_points(&self, len: usize) -> usize {
        len / self.divisor()
    }
}

/// Gain and stock view windows over one year of daily bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryWindow {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl HistoryWindow {
    pub const ALL: [HistoryWindow; 4] = [
        HistoryWindow::OneMonth,
        HistoryWindow::ThreeMonths,
        HistoryWindow::SixMonths,
        HistoryWindow::OneYear,
    ];
}

impl ViewWindow for HistoryWindow {
    fn token(&self) -> &'static str {
        match self {
            HistoryWindow::OneMonth => "1M",
            HistoryWindow::ThreeMonths => "3M",
            HistoryWindow::SixMonths => "6M",
            HistoryWindow::OneYear => "1Y",
        }
    }

    fn divisor(&self) -> usize {
        match self {
            HistoryWindow::OneMonth => 12,
            HistoryWindow::ThreeMonths => 4,
            HistoryWindow::SixMonths => 2,
            HistoryWindow::OneYear => 1,
        }
    }

    fn history(&self) -> (HistoryPeriod, Interval) {
        DAILY_HISTORY
    }
}

/// Market view windows over five days of 5-minute bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketWindow {
    SixHours,
    TwelveHours,
    OneDay,
    FiveDays,
}

impl MarketWindow {
    pub const ALL: [MarketWindow; 4] = [
        MarketWindow::SixHours,
        MarketWindow::TwelveHours,
        MarketWindow::OneDay,
        MarketWindow::FiveDays,
    ];
}

impl ViewWindow for MarketWindow {
    fn token(&self) -> &'static str {
        match self {
            MarketWindow::SixHours => "6H",
            MarketWindow::TwelveHours => "12H",
            MarketWindow::OneDay => "1D",
            MarketWindow::FiveDays => "5D",
        }
    }

    fn divisor(&self) -> usize {
        match self {
            MarketWindow::SixHours => 20,
            MarketWindow::TwelveHours => 10,
            MarketWindow::OneDay => 5,
            MarketWindow::FiveDays => 1,
        }
    }

    fn history(&self) -> (HistoryPeriod, Interval) {
        INTRADAY_HISTORY
    }
}

fn parse_window<W: ViewWindow>(s: &str, all: &[W]) -> Result<W, PeriodParseError> {
    let wanted = s.trim().to_uppercase();
    all.iter()
        .copied()
        .find(|w| w.token() == wanted)
        .ok_or_else(|| PeriodParseError {
            given: s.to_string(),
            expected: all.iter().map(|w| w.token()).collect::<Vec<_>>().join(", "),
        })
}

impl FromStr for HistoryWindow {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_window(s, &HistoryWindow::ALL)
    }
}

impl FromStr for MarketWindow {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_window(s, &MarketWindow::ALL)
    }
}

impl fmt::Display for HistoryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl fmt::Display for MarketWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolListError {
    #[error("no symbols given")]
    Empty,

    #[error("duplicate symbol: {0}")]
    Duplicate(String),

    #[error("invalid symbol: {0:?}")]
    Invalid(String),
}

/// Letters, digits and the punctuation used by futures (`NQ=F`), indices
/// (`^GSPC`) and share classes (`BRK-B`, `BF.B`).
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || ".=^-".contains(c))
}

/// Splits on commas and/or whitespace, uppercases, and rejects duplicates
/// and malformed symbols. Order is preserved.
pub fn parse_symbol_list(input: &str) -> Result<Vec<String>, SymbolListError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let symbol = token.to_uppercase();
        if !is_valid_symbol(&symbol) {
            return Err(SymbolListError::Invalid(token.to_string()));
        }
        if !seen.insert(symbol.clone()) {
            return Err(SymbolListError::Duplicate(symbol));
        }
        symbols.push(symbol);
    }

    if symbols.is_empty() {
        return Err(SymbolListError::Empty);
    }
    Ok(symbols)
}

pub fn format_symbol_list(symbols: &[String]) -> String {
    symbols.join(", ")
}

/// Human-readable name for the market view; unknown symbols show as-is.
pub fn display_name(symbol: &str) -> &str {
    match symbol {
        "NQ=F" => "NASDAQ Futures",
        "ES=F" => "S&P 500 Futures",
        "YM=F" => "DOW Futures",
        "KRW=X" => "USD/KRW",
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub portfolio: Vec<String>,
    pub market: Vec<String>,
    pub benchmark: Vec<String>,
    pub thresholds: Thresholds,
    pub market_period: MarketWindow,
    pub gain_period: HistoryWindow,
    pub stock_period: HistoryWindow,
    pub stock_ticker: String,
}

impl Default for Parameters {
    fn default() -> Self {
        fn owned(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }
        Self {
            portfolio: owned(&["SPY", "QQQ"]),
            market: owned(&["NQ=F", "ES=F", "YM=F", "KRW=X"]),
            benchmark: owned(&["SPY"]),
            thresholds: Thresholds {
                rsi_low: 30.0,
                rsi_high: 70.0,
                cci_low: -100.0,
                cci_high: 100.0,
            },
            market_period: MarketWindow::SixHours,
            gain_period: HistoryWindow::OneMonth,
            stock_period: HistoryWindow::OneMonth,
            stock_ticker: "SPY".to_string(),
        }
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.thresholds;
        writeln!(f, "[{}]", SECTION_SYMBOLS)?;
        writeln!(f, "portfolio = {}", format_symbol_list(&self.portfolio))?;
        writeln!(f, "market = {}", format_symbol_list(&self.market))?;
        writeln!(f, "benchmark = {}", format_symbol_list(&self.benchmark))?;
        writeln!(f, "[{}]", SECTION_THRESHOLDS)?;
        writeln!(f, "rsi_low = {}", t.rsi_low)?;
        writeln!(f, "rsi_high = {}", t.rsi_high)?;
        writeln!(f, "cci_low = {}", t.cci_low)?;
        writeln!(f, "cci_high = {}", t.cci_high)?;
        writeln!(f, "[{}]", SECTION_VIEWS)?;
        writeln!(f, "market_period = {}", self.market_period)?;
        writeln!(f, "gain_period = {}", self.gain_period)?;
        writeln!(f, "stock_period = {}", self.stock_period)?;
        write!(f, "stock_ticker = {}", self.stock_ticker)
    }
}

pub fn validate_parameters(params: &Parameters) -> Result<(), FinstreamError> {
    validate_symbols("portfolio", &params.portfolio)?;
    validate_symbols("market", &params.market)?;
    validate_symbols("benchmark", &params.benchmark)?;
    validate_thresholds(&params.thresholds)?;
    validate_stock_ticker(params)?;
    Ok(())
}

fn validate_symbols(key: &str, symbols: &[String]) -> Result<(), FinstreamError> {
    if symbols.is_empty() {
        return Err(FinstreamError::invalid(
            SECTION_SYMBOLS,
            key,
            "must list at least one symbol",
        ));
    }
    let mut seen = HashSet::new();
    for symbol in symbols {
        if !is_valid_symbol(symbol) {
            return Err(FinstreamError::invalid(
                SECTION_SYMBOLS,
                key,
                format!("invalid symbol {:?}", symbol),
            ));
        }
        if !seen.insert(symbol.as_str()) {
            return Err(FinstreamError::invalid(
                SECTION_SYMBOLS,
                key,
                format!("duplicate symbol {}", symbol),
            ));
        }
    }
    Ok(())
}

pub fn validate_thresholds(t: &Thresholds) -> Result<(), FinstreamError> {
    for (key, value) in [
        ("rsi_low", t.rsi_low),
        ("rsi_high", t.rsi_high),
        ("cci_low", t.cci_low),
        ("cci_high", t.cci_high),
    ] {
        if !value.is_finite() {
            return Err(FinstreamError::invalid(
                SECTION_THRESHOLDS,
                key,
                "must be a finite number",
            ));
        }
    }
    for (key, value) in [("rsi_low", t.rsi_low), ("rsi_high", t.rsi_high)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(FinstreamError::invalid(
                SECTION_THRESHOLDS,
                key,
                "must be within [0, 100]",
            ));
        }
    }
    if t.rsi_low >= t.rsi_high {
        return Err(FinstreamError::invalid(
            SECTION_THRESHOLDS,
            "rsi_low",
            format!("must be below rsi_high ({})", t.rsi_high),
        ));
    }
    if t.cci_low >= t.cci_high {
        return Err(FinstreamError::invalid(
            SECTION_THRESHOLDS,
            "cci_low",
            format!("must be below cci_high ({})", t.cci_high),
        ));
    }
    Ok(())
}

fn validate_stock_ticker(params: &Parameters) -> Result<(), FinstreamError> {
    if !params.portfolio.contains(&params.stock_ticker) {
        return Err(FinstreamError::invalid(
            SECTION_VIEWS,
            "stock_ticker",
            format!("{} is not in the portfolio", params.stock_ticker),
        ));
    }
    Ok(())
}
