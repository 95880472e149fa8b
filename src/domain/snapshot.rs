//! Snapshot records: live quote fields merged with the latest indicators.
//!
//! Each symbol is merged on its own. A field that cannot be produced is left
//! unset on the record and reported as a [`FieldFailure`], so one bad quote
//! or short history never removes the symbol or touches its neighbours.

use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_set::{compute_indicators, IndicatorSet, SNAPSHOT_INDICATORS};
use crate::domain::ohlcv::PriceSeries;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub const FIELD_PRICE: &str = "regularMarketPrice";
pub const FIELD_CHANGE_PERCENT: &str = "regularMarketChangePercent";
pub const FIELD_TRAILING_PE: &str = "trailingPE";
pub const FIELD_52W_HIGH: &str = "fiftyTwoWeekHigh";
pub const FIELD_52W_LOW: &str = "fiftyTwoWeekLow";
pub const FIELD_PREVIOUS_CLOSE: &str = "regularMarketPreviousClose";

/// Provider fields for one symbol, keyed by the provider's field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQuote {
    fields: HashMap<String, f64>,
}

impl RawQuote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: f64) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: f64) {
        self.fields.insert(field.to_string(), value);
    }

    pub fn get(&self, field: &str) -> Option<f64> {
        self.fields.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SnapshotField {
    Price,
    ChangePercent,
    PriceToEarnings,
    High52wDistance,
    Low52wDistance,
    Rsi14,
    Cci14,
}

impl SnapshotField {
    pub const ALL: [SnapshotField; 7] = [
        SnapshotField::Price,
        SnapshotField::ChangePercent,
        SnapshotField::PriceToEarnings,
        SnapshotField::High52wDistance,
        SnapshotField::Low52wDistance,
        SnapshotField::Rsi14,
        SnapshotField::Cci14,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SnapshotField::Price => "Price",
            SnapshotField::ChangePercent => "Change(%)",
            SnapshotField::PriceToEarnings => "P/E",
            SnapshotField::High52wDistance => "52W_H(%)",
            SnapshotField::Low52wDistance => "52W_L(%)",
            SnapshotField::Rsi14 => "RSI(14)",
            SnapshotField::Cci14 => "CCI(14)",
        }
    }
}

impl fmt::Display for SnapshotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotRecord {
    pub symbol: String,
    pub price: Option<f64>,
    pub change_pct: Option<f64>,
    pub pe: Option<f64>,
    pub high_52w_pct: Option<f64>,
    pub low_52w_pct: Option<f64>,
    pub rsi: Option<f64>,
    pub cci: Option<f64>,
}

impl SnapshotRecord {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: SnapshotField) -> Option<f64> {
        match field {
            SnapshotField::Price => self.price,
            SnapshotField::ChangePercent => self.change_pct,
            SnapshotField::PriceToEarnings => self.pe,
            SnapshotField::High52wDistance => self.high_52w_pct,
            SnapshotField::Low52wDistance => self.low_52w_pct,
            SnapshotField::Rsi14 => self.rsi,
            SnapshotField::Cci14 => self.cci,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// The provider returned nothing at all for the symbol.
    NoQuote,
    /// The provider's quote lacks this field.
    Missing { source: &'static str },
    NotFinite { source: &'static str, value: f64 },
    /// A 52-week level of zero cannot anchor a percent distance.
    ZeroLevel { source: &'static str },
    /// Distance fields need the current price.
    NoPrice,
    NoHistory,
    InsufficientHistory { bars: usize, minimum: usize },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoQuote => write!(f, "no quote returned"),
            FailureReason::Missing { source } => write!(f, "{} missing", source),
            FailureReason::NotFinite { source, value } => {
                write!(f, "{} is not finite ({})", source, value)
            }
            FailureReason::ZeroLevel { source } => write!(f, "{} is zero", source),
            FailureReason::NoPrice => write!(f, "current price unavailable"),
            FailureReason::NoHistory => write!(f, "no price history"),
            FailureReason::InsufficientHistory { bars, minimum } => {
                write!(f, "have {} bars, need {}", bars, minimum)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFailure {
    pub field: SnapshotField,
    pub reason: FailureReason,
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    Complete(SnapshotRecord),
    Partial {
        record: SnapshotRecord,
        failures: Vec<FieldFailure>,
    },
}

impl MergeOutcome {
    pub fn record(&self) -> &SnapshotRecord {
        match self {
            MergeOutcome::Complete(record) | MergeOutcome::Partial { record, .. } => record,
        }
    }

    pub fn failures(&self) -> &[FieldFailure] {
        match self {
            MergeOutcome::Complete(_) => &[],
            MergeOutcome::Partial { failures, .. } => failures,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, MergeOutcome::Complete(_))
    }
}

/// Signed percent distance of `price` from a reference `level`.
///
/// Negative while price sits below the level: price 100 against a 52-week
/// high of 120 gives -16.67.
pub fn percent_from_level(price: f64, level: f64) -> f64 {
    (price - level) / level * 100.0
}

/// Merges one symbol's quote fields and indicator values into a record.
pub fn merge_snapshot(
    symbol: &str,
    quote: Option<&RawQuote>,
    indicators: Option<&IndicatorSet>,
) -> MergeOutcome {
    let mut record = SnapshotRecord::new(symbol);
    let mut failures = Vec::new();
    let mut fail = |field: SnapshotField, reason: FailureReason| {
        failures.push(FieldFailure { field, reason });
    };

    match quote {
        Some(quote) => {
            let price = quote_field(quote, FIELD_PRICE);
            record.price = settle(SnapshotField::Price, price, &mut fail);

            // the provider reports change as a fraction
            let change = quote_field(quote, FIELD_CHANGE_PERCENT).map(|v| v * 100.0);
            record.change_pct = settle(SnapshotField::ChangePercent, change, &mut fail);

            let pe = quote_field(quote, FIELD_TRAILING_PE);
            record.pe = settle(SnapshotField::PriceToEarnings, pe, &mut fail);

            for (field, source) in [
                (SnapshotField::High52wDistance, FIELD_52W_HIGH),
                (SnapshotField::Low52wDistance, FIELD_52W_LOW),
            ] {
                let distance = quote_field(quote, source).and_then(|level| {
                    if level == 0.0 {
                        return Err(FailureReason::ZeroLevel { source });
                    }
                    let price = record.price.ok_or(FailureReason::NoPrice)?;
                    Ok(percent_from_level(price, level))
                });
                let value = settle(field, distance, &mut fail);
                match field {
                    SnapshotField::High52wDistance => record.high_52w_pct = value,
                    _ => record.low_52w_pct = value,
                }
            }
        }
        None => {
            for field in &SnapshotField::ALL[..5] {
                fail(*field, FailureReason::NoQuote);
            }
        }
    }

    for (field, indicator) in [
        (SnapshotField::Rsi14, IndicatorType::RSI_14),
        (SnapshotField::Cci14, IndicatorType::CCI_14),
    ] {
        let value = match indicators {
            None => Err(FailureReason::NoHistory),
            Some(set) => set
                .latest_simple(&indicator)
                .ok_or(FailureReason::InsufficientHistory {
                    bars: set.bars,
                    minimum: indicator.min_bars(),
                }),
        };
        let value = settle(field, value, &mut fail);
        match field {
            SnapshotField::Rsi14 => record.rsi = value,
            _ => record.cci = value,
        }
    }

    if failures.is_empty() {
        MergeOutcome::Complete(record)
    } else {
        MergeOutcome::Partial { record, failures }
    }
}

fn quote_field(quote: &RawQuote, source: &'static str) -> Result<f64, FailureReason> {
    match quote.get(source) {
        None => Err(FailureReason::Missing { source }),
        Some(value) if !value.is_finite() => Err(FailureReason::NotFinite { source, value }),
        Some(value) => Ok(value),
    }
}

fn settle(
    field: SnapshotField,
    value: Result<f64, FailureReason>,
    fail: &mut impl FnMut(SnapshotField, FailureReason),
) -> Option<f64> {
    match value {
        Ok(v) => Some(v),
        Err(reason) => {
            fail(field, reason);
            None
        }
    }
}

/// One merge outcome per symbol, keyed by symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotTable {
    entries: BTreeMap<String, MergeOutcome>,
}

impl SnapshotTable {
    pub fn insert(&mut self, outcome: MergeOutcome) {
        self.entries
            .insert(outcome.record().symbol.clone(), outcome);
    }

    pub fn get(&self, symbol: &str) -> Option<&MergeOutcome> {
        self.entries.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &SnapshotRecord> {
        self.entries.values().map(MergeOutcome::record)
    }

    pub fn degraded(&self) -> impl Iterator<Item = &MergeOutcome> {
        self.entries.values().filter(|o| !o.is_complete())
    }

    pub fn sorted_by_rsi(&self) -> Vec<&SnapshotRecord> {
        sort_by_rsi(self.records())
    }
}

/// Ascending RSI, records without RSI last, ties by symbol.
pub fn sort_by_rsi<'a>(records: impl Iterator<Item = &'a SnapshotRecord>) -> Vec<&'a SnapshotRecord> {
    let mut sorted: Vec<&SnapshotRecord> = records.collect();
    sorted.sort_by(|a, b| match (a.rsi, b.rsi) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.symbol.cmp(&b.symbol)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.symbol.cmp(&b.symbol),
    });
    sorted
}

/// Builds the snapshot table for `symbols` from whatever the provider
/// returned. Symbols absent from either map still get a (degraded) record.
pub fn merge_all(
    symbols: &[String],
    quotes: &HashMap<String, RawQuote>,
    histories: &HashMap<String, PriceSeries>,
) -> SnapshotTable {
    let mut table = SnapshotTable::default();
    for symbol in symbols {
        let indicators = histories
            .get(symbol)
            .map(|series| compute_indicators(series, &SNAPSHOT_INDICATORS));
        let outcome = merge_snapshot(symbol, quotes.get(symbol), indicators.as_ref());

        if !outcome.is_complete() {
            let reasons: Vec<String> = outcome.failures().iter().map(|f| f.to_string()).collect();
            tracing::warn!(symbol = %symbol, failures = %reasons.join("; "), "degraded snapshot record");
        }
        table.insert(outcome);
    }
    table
}
