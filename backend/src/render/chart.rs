//! SVG bar charts: one panel per employee with four bars (Presente, Falta,
//! Atestado, Banco de Horas) and the value printed above each bar.
//!
//! Panels are stacked vertically in display order.

use svg::node::element::path::Data;
use svg::node::element::{Group, Line, Path, Rectangle, Text};
use svg::Document;

use crate::error::{ExportError, ExportResult};
use crate::models::{EmployeeSummary, Status};

/// Chart categories with their status and bar colour.
pub const CATEGORIES: [(&str, Status, &str); 4] = [
    ("Presente", Status::Present, "#3bcc2e"),
    ("Falta", Status::Absent, "#e76d3c"),
    ("Atestado", Status::MedicalCertificate, "#f1c40f"),
    ("Banco de Horas", Status::TimeBank, "#3498db"),
];

/// SVG chart renderer
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    /// Width of one panel in pixels
    pub panel_width: u32,
    /// Height of the bar area of one panel in pixels
    pub plot_height: u32,
    /// Space above the bars for title and value labels
    pub title_height: u32,
    /// Space below the bars for category labels
    pub axis_height: u32,
    /// Gap between panels
    pub gap: u32,
    /// Radius of the top corners of each bar
    pub bar_radius: u32,
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
    pub font_size: u32,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self {
            panel_width: 500,
            plot_height: 240,
            title_height: 48,
            axis_height: 28,
            gap: 16,
            bar_radius: 9,
            background_color: "#f6f8f9".into(),
            text_color: "#2c3e50".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn panel_height(&self) -> u32 {
        self.title_height + self.plot_height + self.axis_height
    }

    /// Render the rows as one SVG document.
    pub fn render(&self, rows: &[&EmployeeSummary]) -> ExportResult<String> {
        let width = self.panel_width;
        let height = (rows.len() as u32 * (self.panel_height() + self.gap)).max(self.gap);

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        for (i, row) in rows.iter().enumerate() {
            let top = i as u32 * (self.panel_height() + self.gap);
            document = document.add(self.render_panel(row, top));
        }

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| ExportError::Chart(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| ExportError::Chart(format!("Invalid UTF-8: {}", e)))
    }

    fn render_panel(&self, row: &EmployeeSummary, top: u32) -> Group {
        let mut group = Group::new()
            .set("class", "employee")
            .set("transform", format!("translate(0,{})", top));

        group = group.add(
            Rectangle::new()
                .set("width", self.panel_width)
                .set("height", self.panel_height())
                .set("fill", self.background_color.as_str()),
        );

        group = group.add(
            Text::new(row.employee_name.as_str())
                .set("x", self.panel_width / 2)
                .set("y", 20)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size + 2)
                .set("font-weight", "bold")
                .set("fill", self.text_color.as_str())
                .set("text-anchor", "middle"),
        );

        let values: Vec<u32> = CATEGORIES.iter().map(|(_, s, _)| row.status(*s)).collect();
        let max = values.iter().copied().max().unwrap_or(0).max(1);
        let baseline = self.title_height + self.plot_height;
        let slot = self.panel_width / CATEGORIES.len() as u32;
        let bar_width = slot * 3 / 5;

        for (i, ((label, _, color), value)) in CATEGORIES.iter().zip(&values).enumerate() {
            let bar_height = self.plot_height * value / max;
            let x = i as u32 * slot + (slot - bar_width) / 2;
            let center = x + bar_width / 2;

            group = group.add(
                Path::new()
                    .set("class", "bar")
                    .set("d", self.bar_outline(x, baseline, bar_width, bar_height))
                    .set("fill", *color),
            );
            group = group.add(
                Text::new(value.to_string())
                    .set("x", center)
                    .set("y", baseline - bar_height - 5)
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size + 2)
                    .set("font-weight", "bolder")
                    .set("fill", self.text_color.as_str())
                    .set("text-anchor", "middle"),
            );
            group = group.add(
                Text::new(*label)
                    .set("x", center)
                    .set("y", baseline + 18)
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size)
                    .set("fill", self.text_color.as_str())
                    .set("text-anchor", "middle"),
            );
        }

        group.add(
            Line::new()
                .set("x1", 0)
                .set("y1", baseline)
                .set("x2", self.panel_width)
                .set("y2", baseline)
                .set("stroke", self.text_color.as_str())
                .set("stroke-width", 1),
        )
    }

    /// Bar standing on `baseline`, rounded on the top corners only.
    fn bar_outline(&self, x: u32, baseline: u32, width: u32, height: u32) -> Data {
        let r = self.bar_radius.min(width / 2).min(height);
        let top = baseline - height;
        Data::new()
            .move_to((x, baseline))
            .line_to((x, top + r))
            .quadratic_curve_to((x, top, x + r, top))
            .line_to((x + width - r, top))
            .quadratic_curve_to((x + width, top, x + width, top + r))
            .line_to((x + width, baseline))
            .close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use svg::node::Value;

    /// Trimmed contents of every `<text>` node.
    fn texts(svg: &str) -> Vec<String> {
        svg.split("<text")
            .skip(1)
            .filter_map(|node| {
                let start = node.find('>')? + 1;
                let end = node.find("</text>")?;
                Some(node[start..end].trim().to_string())
            })
            .collect()
    }

    fn summary(name: &str, present: u32, absent: u32) -> EmployeeSummary {
        let status_count: BTreeMap<String, u32> = Status::ALL
            .iter()
            .map(|s| {
                let count = match s {
                    Status::Present => present,
                    Status::Absent => absent,
                    _ => 0,
                };
                (s.label().to_string(), count)
            })
            .collect();
        EmployeeSummary {
            employee_name: name.into(),
            status_count,
            total_days: present + absent,
            attendance_percent: None,
        }
    }

    #[test]
    fn test_one_panel_per_employee() {
        let ana = summary("Ana", 18, 2);
        let bruno = summary("Bruno", 20, 0);
        let svg = ChartRenderer::new().render(&[&ana, &bruno]).unwrap();

        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("class=\"employee\"").count(), 2);
        assert_eq!(svg.matches("class=\"bar\"").count(), 8);
        let texts = texts(&svg);
        assert!(texts.iter().any(|t| t == "Ana"));
        assert!(texts.iter().any(|t| t == "18"));
    }

    #[test]
    fn test_category_colors() {
        let ana = summary("Ana", 1, 1);
        let svg = ChartRenderer::new().render(&[&ana]).unwrap();
        let texts = texts(&svg);

        for (label, _, color) in CATEGORIES {
            assert!(svg.contains(color));
            assert!(texts.iter().any(|t| t == label));
        }
    }

    #[test]
    fn test_bars_round_top_corners_only() {
        let renderer = ChartRenderer::new();
        let outline = Value::from(renderer.bar_outline(10, 100, 40, 50)).to_string();
        // square bottom corners, curves only at the top
        assert!(outline.starts_with("M10,100 L10,59 Q10,50,19,50"));
        assert!(outline.ends_with("L50,100 z"));
        assert_eq!(outline.matches('Q').count(), 2);

        let svg = renderer.render(&[&summary("Ana", 3, 1)]).unwrap();
        assert!(!svg.contains("rx="));
    }

    #[test]
    fn test_zero_bar_is_flat() {
        let outline = Value::from(ChartRenderer::new().bar_outline(0, 100, 40, 0)).to_string();
        assert!(outline.starts_with("M0,100 L0,100 Q0,100,0,100"));
    }

    #[test]
    fn test_names_escaped() {
        let row = summary("A & B", 1, 0);
        let svg = ChartRenderer::new().render(&[&row]).unwrap();
        assert!(svg.contains("A &amp; B"));
    }

    #[test]
    fn test_empty_rows() {
        let svg = ChartRenderer::new().render(&[]).unwrap();
        assert!(svg.contains("<svg"));
    }
}
