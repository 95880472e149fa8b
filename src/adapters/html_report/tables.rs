//! HTML table markup for snapshot records.

use super::chart_svg::escape;
use crate::adapters::format::{table_header, table_row};
use crate::domain::snapshot::SnapshotRecord;

pub fn format_snapshot_table(records: &[&SnapshotRecord]) -> String {
    if records.is_empty() {
        return "<p class=\"empty\">No symbols.</p>\n".to_string();
    }

    let mut html = String::from("<table>\n  <thead><tr>");
    for label in table_header() {
        html.push_str(&format!("<th>{}</th>", escape(label)));
    }
    html.push_str("</tr></thead>\n  <tbody>\n");

    for record in records {
        html.push_str(&format!("    <tr><td>{}</td>", escape(&record.symbol)));
        for (text, negative) in table_row(record) {
            if negative {
                html.push_str(&format!("<td class=\"neg\">{}</td>", text));
            } else {
                html.push_str(&format!("<td>{}</td>", text));
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("  </tbody>\n</table>\n");
    html
}
