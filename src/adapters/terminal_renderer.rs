//! Plain-text renderer for any `io::Write`.
//!
//! Tables are printed column-aligned; charts are summarised per series
//! (point count and last defined value) since a terminal cannot draw them.

use crate::adapters::format::{format_cell, table_header, table_row};
use crate::domain::charts::Chart;
use crate::domain::error::FinstreamError;
use crate::domain::snapshot::SnapshotRecord;
use crate::ports::render_port::RenderPort;
use std::io::Write;

const SYMBOL_WIDTH: usize = 8;
const CELL_WIDTH: usize = 10;

pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderPort for TerminalRenderer<W> {
    fn render_table(&mut self, title: &str, records: &[&SnapshotRecord]) -> Result<(), FinstreamError> {
        writeln!(self.out, "{}", title)?;
        if records.is_empty() {
            writeln!(self.out, "  (none)")?;
            return Ok(());
        }

        let header = table_header();
        let mut line = format!("{:<width$}", header[0], width = SYMBOL_WIDTH);
        for label in &header[1..] {
            line.push_str(&format!("{:>width$}", label, width = CELL_WIDTH));
        }
        writeln!(self.out, "{}", line)?;

        for record in records {
            let mut line = format!("{:<width$}", record.symbol, width = SYMBOL_WIDTH);
            for (text, _) in table_row(record) {
                line.push_str(&format!("{:>width$}", text, width = CELL_WIDTH));
            }
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    fn render_chart(&mut self, chart: &Chart) -> Result<(), FinstreamError> {
        writeln!(self.out, "== {} ==", chart.title)?;
        for line in &chart.lines {
            writeln!(
                self.out,
                "  {}: {} points, last {}",
                line.label,
                line.points.len(),
                format_cell(line.last_defined())
            )?;
        }
        if let Some(bars) = &chart.bars {
            let last = bars.bars.iter().rev().find_map(|(_, v)| *v);
            writeln!(
                self.out,
                "  {}: {} bars, last {}",
                bars.label,
                bars.bars.len(),
                format_cell(last)
            )?;
        }
        for reference in &chart.references {
            writeln!(
                self.out,
                "  {} at {}",
                reference.label,
                format_cell(Some(reference.value))
            )?;
        }
        Ok(())
    }

    fn render_note(&mut self, text: &str) -> Result<(), FinstreamError> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), FinstreamError> {
        self.out.flush()?;
        Ok(())
    }
}
