//! Pie chart data for the budget breakdown, with terminal and SVG renderers.

use serde::Serialize;
use std::f64::consts::PI;
use std::fmt::Write as _;

const BAR_WIDTH: usize = 30;
const PALETTE: [&str; 4] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728"];

/// One labelled wedge of the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub label: String,
    pub value: f64,
}

/// Labelled non-negative values with a positive total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    slices: Vec<ChartSlice>,
    total: f64,
}

impl ChartData {
    /// Returns `None` when there is nothing to plot: the values sum to zero,
    /// or any value is negative or not finite.
    pub fn from_pairs<I, L>(pairs: I) -> Option<Self>
    where
        I: IntoIterator<Item = (L, f64)>,
        L: Into<String>,
    {
        let slices: Vec<ChartSlice> = pairs
            .into_iter()
            .map(|(label, value)| ChartSlice {
                label: label.into(),
                value,
            })
            .collect();

        if slices.iter().any(|s| !s.value.is_finite() || s.value < 0.0) {
            return None;
        }

        let total: f64 = slices.iter().map(|s| s.value).sum();
        if total <= 0.0 {
            return None;
        }

        Some(Self { slices, total })
    }

    pub fn slices(&self) -> &[ChartSlice] {
        &self.slices
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Share of each slice in percent, parallel to [`ChartData::slices`]
    pub fn percentages(&self) -> Vec<f64> {
        self.slices
            .iter()
            .map(|s| s.value / self.total * 100.0)
            .collect()
    }

    /// Horizontal bar rendering with `{:.1}%` annotations, one line per slice
    pub fn render_text(&self) -> String {
        let label_width = self
            .slices
            .iter()
            .map(|s| s.label.chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for (slice, pct) in self.slices.iter().zip(self.percentages()) {
            let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
            let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
            let _ = writeln!(
                out,
                "{:<width$}  {}  {:>5.1}%",
                slice.label,
                bar,
                pct,
                width = label_width
            );
        }
        out
    }

    /// Pie chart as an SVG document.
    ///
    /// Wedges start at 90 degrees and run counter-clockwise; each carries its
    /// percentage inside and its label outside.
    pub fn render_svg(&self, size: u32) -> String {
        let size = f64::from(size.max(100));
        let (cx, cy) = (size / 2.0, size / 2.0);
        let radius = size * 0.35;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}" font-family="sans-serif" font-size="{:.0}">"#,
            size / 30.0
        );

        let mut start = 90.0_f64;
        for (idx, (slice, pct)) in self.slices.iter().zip(self.percentages()).enumerate() {
            if slice.value == 0.0 {
                continue;
            }
            let color = PALETTE[idx % PALETTE.len()];
            let sweep = pct / 100.0 * 360.0;
            let end = start + sweep;

            if pct >= 100.0 {
                let _ = writeln!(
                    svg,
                    r#"  <circle cx="{cx:.2}" cy="{cy:.2}" r="{radius:.2}" fill="{color}"/>"#
                );
            } else {
                let (x1, y1) = polar(cx, cy, radius, start);
                let (x2, y2) = polar(cx, cy, radius, end);
                let large_arc = u8::from(sweep > 180.0);
                let _ = writeln!(
                    svg,
                    r#"  <path d="M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {radius:.2} {radius:.2} 0 {large_arc} 0 {x2:.2} {y2:.2} Z" fill="{color}"/>"#
                );
            }

            let mid = start + sweep / 2.0;
            let (px, py) = polar(cx, cy, radius * 0.6, mid);
            let _ = writeln!(
                svg,
                r#"  <text x="{px:.2}" y="{py:.2}" text-anchor="middle" dominant-baseline="middle">{pct:.1}%</text>"#
            );

            let (lx, ly) = polar(cx, cy, radius * 1.15, mid);
            let anchor = if lx < cx { "end" } else { "start" };
            let _ = writeln!(
                svg,
                r#"  <text x="{lx:.2}" y="{ly:.2}" text-anchor="{anchor}" dominant-baseline="middle">{}</text>"#,
                escape_xml(&slice.label)
            );

            start = end;
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// Point on a circle for an angle in degrees measured counter-clockwise from +x
fn polar(cx: f64, cy: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees * PI / 180.0;
    (cx + radius * radians.cos(), cy - radius * radians.sin())
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ChartData {
        ChartData::from_pairs([
            ("Transport", 2000.0),
            ("Food", 1000.0),
            ("Accommodation", 1000.0),
            ("Miscellaneous", 500.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_zero_total_has_no_chart() {
        assert!(ChartData::from_pairs([("Food", 0.0), ("Stay", 0.0)]).is_none());
        assert!(ChartData::from_pairs(Vec::<(&str, f64)>::new()).is_none());
    }

    #[test]
    fn test_negative_value_has_no_chart() {
        assert!(ChartData::from_pairs([("Food", 10.0), ("Stay", -1.0)]).is_none());
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let chart = sample();
        let pcts = chart.percentages();
        assert!((pcts.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        assert!((pcts[0] - 44.444).abs() < 1e-3);
    }

    #[test]
    fn test_text_rendering() {
        let text = sample().render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Transport"));
        assert!(lines[0].ends_with("44.4%"));
        assert!(lines[3].ends_with("11.1%"));
    }

    #[test]
    fn test_svg_rendering() {
        let svg = sample().render_svg(400);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<path").count(), 4);
        assert!(svg.contains("44.4%"));
        assert!(svg.contains(">Accommodation<"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_svg_single_slice_is_circle() {
        let chart = ChartData::from_pairs([("Food", 10.0), ("Stay", 0.0)]).unwrap();
        let svg = chart.render_svg(200);
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("<path"));
        assert!(svg.contains("100.0%"));
    }
}
