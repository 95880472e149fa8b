//! Inline SVG rendering of [`Chart`] descriptions.

use crate::domain::charts::{BarTone, Chart, LineStyle};

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 300.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 40.0;

pub(crate) fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Vertical range of the chart: the fixed domain when one is set, otherwise
/// the extent of every defined value, bar and reference line.
fn y_range(chart: &Chart) -> Option<(f64, f64)> {
    if let Some(domain) = chart.y_domain {
        return Some(domain);
    }
    let values = chart
        .lines
        .iter()
        .flat_map(|l| l.points.iter().filter_map(|(_, v)| *v))
        .chain(
            chart
                .bars
                .iter()
                .flat_map(|b| b.bars.iter().filter_map(|(_, v)| *v)),
        )
        .chain(chart.references.iter().map(|r| r.value))
        .filter(|v| v.is_finite());

    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min > max {
        return None;
    }
    if chart.bars.is_some() {
        return Some((min.min(0.0), max.max(0.0)));
    }
    Some((min, max))
}

fn point_count(chart: &Chart) -> usize {
    let lines = chart.lines.iter().map(|l| l.points.len());
    let bars = chart.bars.iter().map(|b| b.bars.len());
    lines.chain(bars).max().unwrap_or(0)
}

pub fn generate_chart_svg(chart: &Chart) -> String {
    let Some((min_y, max_y)) = y_range(chart) else {
        return String::new();
    };
    let count = point_count(chart);
    let range = if max_y > min_y { max_y - min_y } else { 1.0 };

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    let x_scale =
        |i: usize| -> f64 { MARGIN_LEFT + (i as f64 / (count.max(2) - 1) as f64) * plot_width };
    let y_scale = |v: f64| -> f64 {
        let clamped = v.clamp(min_y, min_y + range);
        MARGIN_TOP + plot_height - ((clamped - min_y) / range) * plot_height
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"18\" font-size=\"13\" fill=\"#333\">{}</text>\n",
        MARGIN_LEFT,
        escape(&chart.title)
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        MARGIN_TOP,
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM,
        CHART_WIDTH - MARGIN_RIGHT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    for value in [max_y, (max_y + min_y) / 2.0, min_y] {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{:.2}</text>\n",
            MARGIN_LEFT - 5.0,
            y_scale(value) + 3.0,
            value
        ));
    }

    let timestamps = chart
        .lines
        .iter()
        .map(|l| l.points.iter().map(|(t, _)| *t).collect::<Vec<_>>())
        .chain(chart.bars.iter().map(|b| b.bars.iter().map(|(t, _)| *t).collect()))
        .max_by_key(Vec::len)
        .unwrap_or_default();
    if let (Some(first), Some(last)) = (timestamps.first(), timestamps.last()) {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"start\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            MARGIN_LEFT,
            CHART_HEIGHT - 10.0,
            first.format("%Y-%m-%d %H:%M")
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            CHART_WIDTH - MARGIN_RIGHT,
            CHART_HEIGHT - 10.0,
            last.format("%Y-%m-%d %H:%M")
        ));
    }

    if let Some(bars) = &chart.bars {
        let bar_width = (plot_width / count.max(1) as f64 * 0.8).max(1.0);
        let zero = y_scale(0.0);
        for (i, (_, value)) in bars.bars.iter().enumerate() {
            let Some(value) = value else { continue };
            let top = y_scale(*value).min(zero);
            let height = (y_scale(*value) - zero).abs();
            svg.push_str(&format!(
                "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>\n",
                x_scale(i) - bar_width / 2.0,
                top,
                bar_width,
                height,
                BarTone::of(*value).color()
            ));
        }
    }

    for reference in &chart.references {
        let y = y_scale(reference.value);
        svg.push_str(&format!(
            "  <line x1=\"{}\" y1=\"{:.1}\" x2=\"{}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1\"/>\n",
            MARGIN_LEFT,
            y,
            CHART_WIDTH - MARGIN_RIGHT,
            y,
            reference.color
        ));
    }

    for line in &chart.lines {
        let mut path_data = String::new();
        let mut pen_down = false;
        for (i, (_, value)) in line.points.iter().enumerate() {
            match value {
                Some(v) => {
                    let cmd = if pen_down { " L" } else { " M" };
                    path_data.push_str(&format!("{} {:.1} {:.1}", cmd, x_scale(i), y_scale(*v)));
                    pen_down = true;
                }
                None => pen_down = false,
            }
        }
        if path_data.is_empty() {
            continue;
        }
        let dash = match line.style {
            LineStyle::Solid => "",
            LineStyle::Dashed => " stroke-dasharray=\"6,4\"",
        };
        svg.push_str(&format!(
            "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"{}/>\n",
            path_data.trim_start(),
            line.color,
            dash
        ));
    }

    for (i, line) in chart.lines.iter().enumerate() {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\" fill=\"{}\">{}</text>\n",
            CHART_WIDTH - MARGIN_RIGHT,
            MARGIN_TOP + 12.0 * (i as f64 + 1.0),
            line.color,
            escape(&line.label)
        ));
    }

    svg.push_str("</svg>");
    svg
}
