//! Rendering port.

use crate::domain::charts::Chart;
use crate::domain::error::FinstreamError;
use crate::domain::snapshot::SnapshotRecord;

pub trait RenderPort {
    /// Records are drawn in the order given.
    fn render_table(&mut self, title: &str, records: &[&SnapshotRecord]) -> Result<(), FinstreamError>;

    fn render_chart(&mut self, chart: &Chart) -> Result<(), FinstreamError>;

    fn render_note(&mut self, text: &str) -> Result<(), FinstreamError>;

    /// Flushes buffered output. Renderers that write as they go need not override.
    fn finish(&mut self) -> Result<(), FinstreamError> {
        Ok(())
    }
}
