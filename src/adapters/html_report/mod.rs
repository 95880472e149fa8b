//! HTML renderer: collects tables, notes and inline SVG charts and writes a
//! single self-contained page on [`RenderPort::finish`].

pub mod chart_svg;
pub mod tables;

use crate::domain::charts::Chart;
use crate::domain::error::FinstreamError;
use crate::domain::snapshot::SnapshotRecord;
use crate::ports::render_port::RenderPort;
use chart_svg::{escape, generate_chart_svg};
use std::fs;
use std::path::PathBuf;

const STYLE: &str = "body { font-family: sans-serif; margin: 2em; }\n\
table { border-collapse: collapse; margin-bottom: 1.5em; }\n\
th, td { border: 1px solid #ddd; padding: 4px 10px; text-align: right; }\n\
td:first-child, th:first-child { text-align: left; }\n\
td.neg { color: red; }\n\
svg { display: block; margin-bottom: 1.5em; }\n";

pub struct HtmlRenderer {
    path: PathBuf,
    title: String,
    sections: Vec<String>,
}

impl HtmlRenderer {
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape(&self.title)));
        html.push_str(&format!("<style>\n{}</style>\n</head>\n<body>\n", STYLE));
        html.push_str(&format!("<h1>{}</h1>\n", escape(&self.title)));
        for section in &self.sections {
            html.push_str(section);
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}

impl RenderPort for HtmlRenderer {
    fn render_table(&mut self, title: &str, records: &[&SnapshotRecord]) -> Result<(), FinstreamError> {
        self.sections.push(format!(
            "<h2>{}</h2>\n{}",
            escape(title),
            tables::format_snapshot_table(records)
        ));
        Ok(())
    }

    fn render_chart(&mut self, chart: &Chart) -> Result<(), FinstreamError> {
        let svg = generate_chart_svg(chart);
        if svg.is_empty() {
            self.sections.push(format!(
                "<h3>{}</h3>\n<p class=\"empty\">No data available.</p>\n",
                escape(&chart.title)
            ));
        } else {
            self.sections.push(format!("{}\n", svg));
        }
        Ok(())
    }

    fn render_note(&mut self, text: &str) -> Result<(), FinstreamError> {
        self.sections.push(format!("<p>{}</p>\n", escape(text)));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), FinstreamError> {
        fs::write(&self.path, self.to_html())?;
        tracing::info!(path = %self.path.display(), sections = self.sections.len(), "HTML written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn finish_writes_one_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("portfolio.html");
        let mut renderer = HtmlRenderer::new(&path, "Portfolio");

        let record = SnapshotRecord::new("SPY");
        renderer.render_table("Snapshot", &[&record]).unwrap();
        renderer.render_chart(&Chart::new("Accumulated Gain (%)")).unwrap();
        renderer.render_note("Oversold: RSI<=30 & CCI<=-100").unwrap();
        assert!(!path.exists());

        renderer.finish().unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>Snapshot</h2>"));
        assert!(html.contains("No data available."));
        assert!(html.contains("RSI&lt;=30 &amp; CCI&lt;=-100"));
        assert!(html.contains("td.neg { color: red; }"));
    }

    #[test]
    fn finish_reports_io_errors() {
        let mut renderer = HtmlRenderer::new("/nonexistent/dir/out.html", "X");
        assert!(matches!(renderer.finish(), Err(FinstreamError::Io(_))));
    }
}
