//! Oversold / overbought screening on RSI(14) and CCI(14).
//!
//! A record qualifies only when both indicators are defined and both pass
//! their threshold (inclusive). Thresholds are taken as given; keeping them
//! sane is the job of [`crate::domain::params::validate_parameters`].

use crate::domain::snapshot::{sort_by_rsi, SnapshotRecord, SnapshotTable};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub rsi_low: f64,
    pub rsi_high: f64,
    pub cci_low: f64,
    pub cci_high: f64,
}

impl Thresholds {
    pub fn oversold_caption(&self) -> String {
        format!("RSI<={} and CCI<={}", self.rsi_low, self.cci_low)
    }

    pub fn overbought_caption(&self) -> String {
        format!("RSI>={} and CCI>={}", self.rsi_high, self.cci_high)
    }
}

pub fn is_oversold(record: &SnapshotRecord, rsi_low: f64, cci_low: f64) -> bool {
    match (record.rsi, record.cci) {
        (Some(rsi), Some(cci)) => rsi <= rsi_low && cci <= cci_low,
        _ => false,
    }
}

pub fn is_overbought(record: &SnapshotRecord, rsi_high: f64, cci_high: f64) -> bool {
    match (record.rsi, record.cci) {
        (Some(rsi), Some(cci)) => rsi >= rsi_high && cci >= cci_high,
        _ => false,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreeningResult {
    pub oversold: BTreeMap<String, SnapshotRecord>,
    pub overbought: BTreeMap<String, SnapshotRecord>,
}

impl ScreeningResult {
    pub fn oversold_by_rsi(&self) -> Vec<&SnapshotRecord> {
        sort_by_rsi(self.oversold.values())
    }

    pub fn overbought_by_rsi(&self) -> Vec<&SnapshotRecord> {
        sort_by_rsi(self.overbought.values())
    }
}

pub fn screen(table: &SnapshotTable, thresholds: &Thresholds) -> ScreeningResult {
    let mut result = ScreeningResult::default();
    for record in table.records() {
        if is_oversold(record, thresholds.rsi_low, thresholds.cci_low) {
            result.oversold.insert(record.symbol.clone(), record.clone());
        }
        if is_overbought(record, thresholds.rsi_high, thresholds.cci_high) {
            result.overbought.insert(record.symbol.clone(), record.clone());
        }
    }
    result
}
