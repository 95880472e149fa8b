//! Cell formatting shared by the renderers.

use crate::domain::snapshot::{SnapshotField, SnapshotRecord};

/// Two decimals, `-` when absent.
pub fn format_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

pub fn is_negative(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v < 0.0)
}

/// Column headers: the symbol followed by every snapshot field label.
pub fn table_header() -> Vec<&'static str> {
    let mut header = vec!["Symbol"];
    header.extend(SnapshotField::ALL.iter().map(SnapshotField::label));
    header
}

/// One row per record: `(text, negative)` per column after the symbol.
pub fn table_row(record: &SnapshotRecord) -> Vec<(String, bool)> {
    SnapshotField::ALL
        .iter()
        .map(|field| {
            let value = record.get(*field);
            (format_cell(value), is_negative(value))
        })
        .collect()
}
