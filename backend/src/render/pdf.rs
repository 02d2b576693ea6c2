//! PDF export of the full summary table.
//!
//! A4 landscape, title and generation time on the first page, then a grid
//! table whose header band is repeated at the top of every page. All text is
//! Helvetica and centred in its cell.

use chrono::Local;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
};

use crate::config;
use crate::error::{ExportError, ExportResult};
use crate::models::SummaryTable;
use crate::render::view::format_percent;

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 12.0;
const TITLE_SIZE: f32 = 18.0;
const TITLE_SPACE: f32 = 16.0;
const ROW_HEIGHT: f32 = 7.0;
const BODY_SIZE: f32 = 8.0;
const HEADER_SIZE: f32 = 7.0;

/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;
const PT_TO_MM: f32 = 0.3528;

const HEADER_FILL: (f32, f32, f32) = (11.0 / 255.0, 61.0 / 255.0, 145.0 / 255.0);
const HEADER_TEXT: (f32, f32, f32) = (245.0 / 255.0, 245.0 / 255.0, 245.0 / 255.0);
const GRID: (f32, f32, f32) = (223.0 / 255.0, 234.0 / 255.0, 246.0 / 255.0);
const BODY_TEXT: (f32, f32, f32) = (0.0, 0.0, 0.0);

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn pdf_error(e: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(e.to_string())
}

/// Column widths in mm; the identity column gets twice a status column.
fn column_widths(count: usize) -> Vec<f32> {
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    let unit = usable / (count as f32 + 1.0);
    (0..count).map(|i| if i == 0 { unit * 2.0 } else { unit }).collect()
}

/// Rows that fit on a page below `top`.
fn rows_per_page(top: f32) -> usize {
    let available = top - MARGIN - ROW_HEIGHT;
    ((available / ROW_HEIGHT).floor() as usize).max(1)
}

/// Cut `text` so it fits in `width` mm at `size` pt.
fn fit(text: &str, width: f32, size: f32) -> String {
    let max_chars = ((width - 1.0) / (size * GLYPH_WIDTH * PT_TO_MM)).floor().max(1.0) as usize;
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH * PT_TO_MM
}

/// Draws one table page at a time.
struct TableWriter<'a> {
    font: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
    widths: &'a [f32],
}

impl TableWriter<'_> {
    /// Centred text in the cell whose lower-left corner is `(x, y)`.
    fn cell_text(
        &self,
        layer: &PdfLayerReference,
        text: &str,
        (x, y): (f32, f32),
        width: f32,
        (size, font): (f32, &IndirectFontRef),
    ) {
        let text = fit(text, width, size);
        let offset = ((width - text_width(&text, size)) / 2.0).max(0.5);
        let baseline = y + (ROW_HEIGHT - size * PT_TO_MM) / 2.0;
        layer.use_text(text, size, Mm(x + offset), Mm(baseline), font);
    }

    fn header(&self, layer: &PdfLayerReference, headers: &[String], top: f32) {
        let total: f32 = self.widths.iter().sum();
        layer.set_fill_color(rgb(HEADER_FILL));
        layer.add_rect(
            Rect::new(Mm(MARGIN), Mm(top - ROW_HEIGHT), Mm(MARGIN + total), Mm(top))
                .with_mode(PaintMode::Fill),
        );

        layer.set_fill_color(rgb(HEADER_TEXT));
        let mut x = MARGIN;
        for (header, width) in headers.iter().zip(self.widths) {
            self.cell_text(layer, header, (x, top - ROW_HEIGHT), *width, (HEADER_SIZE, self.bold));
            x += width;
        }
    }

    fn row(&self, layer: &PdfLayerReference, cells: &[String], bottom: f32) {
        layer.set_fill_color(rgb(BODY_TEXT));
        let mut x = MARGIN;
        for (cell, width) in cells.iter().zip(self.widths) {
            self.cell_text(layer, cell, (x, bottom), *width, (BODY_SIZE, self.font));
            x += width;
        }
    }

    fn grid(&self, layer: &PdfLayerReference, top: f32, rows: usize) {
        let total: f32 = self.widths.iter().sum();
        let bottom = top - ROW_HEIGHT * (rows as f32 + 1.0);
        layer.set_outline_color(rgb(GRID));
        layer.set_outline_thickness(0.5);

        for i in 0..=rows + 1 {
            let y = top - ROW_HEIGHT * i as f32;
            layer.add_line(segment((MARGIN, y), (MARGIN + total, y)));
        }
        let mut x = MARGIN;
        for width in std::iter::once(&0.0).chain(self.widths) {
            x += width;
            layer.add_line(segment((x, top), (x, bottom)));
        }
    }
}

fn segment(from: (f32, f32), to: (f32, f32)) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(from.0), Mm(from.1)), false),
            (Point::new(Mm(to.0), Mm(to.1)), false),
        ],
        is_closed: false,
    }
}

/// Table cells of every summary row, as printed.
fn body_cells(table: &SummaryTable) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(table.status_columns.len() + 3);
            cells.push(row.employee_name.clone());
            cells.extend(table.status_columns.iter().map(|s| row.count(s).to_string()));
            cells.push(row.total_days.to_string());
            // blank cell when there is no percentage
            cells.push(
                row.attendance_percent
                    .map(|p| format_percent(Some(p)))
                    .unwrap_or_default(),
            );
            cells
        })
        .collect()
}

/// Build the PDF document in memory.
pub fn to_pdf_bytes(table: &SummaryTable) -> ExportResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        config::REPORT_TITLE,
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

    let headers = table.headers();
    let widths = column_widths(headers.len());
    let writer = TableWriter {
        font: &font,
        bold: &bold,
        widths: &widths,
    };
    let cells = body_cells(table);

    let first_layer = doc.get_page(page).get_layer(layer);
    first_layer.set_fill_color(rgb(HEADER_FILL));
    let title_x = (PAGE_WIDTH - text_width(config::REPORT_TITLE, TITLE_SIZE)) / 2.0;
    first_layer.use_text(
        config::REPORT_TITLE,
        TITLE_SIZE,
        Mm(title_x),
        Mm(PAGE_HEIGHT - MARGIN - TITLE_SIZE * PT_TO_MM),
        &bold,
    );
    first_layer.set_fill_color(rgb(BODY_TEXT));
    first_layer.use_text(
        format!("Gerado em {}", Local::now().format("%d/%m/%Y %H:%M")),
        BODY_SIZE,
        Mm(MARGIN),
        Mm(PAGE_HEIGHT - MARGIN - TITLE_SIZE * PT_TO_MM - 6.0),
        &font,
    );

    let mut current = first_layer;
    let mut top = PAGE_HEIGHT - MARGIN - TITLE_SPACE;
    let mut remaining: &[Vec<String>] = &cells;

    loop {
        let take = rows_per_page(top).min(remaining.len());
        let (chunk, rest) = remaining.split_at(take);

        writer.grid(&current, top, chunk.len());
        writer.header(&current, &headers, top);
        for (i, row) in chunk.iter().enumerate() {
            let bottom = top - ROW_HEIGHT * (i as f32 + 2.0);
            writer.row(&current, row, bottom);
        }

        remaining = rest;
        if remaining.is_empty() {
            break;
        }
        current = new_page(&doc);
        top = PAGE_HEIGHT - MARGIN;
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn new_page(doc: &PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    doc.get_page(page).get_layer(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DenominatorPolicy, EmployeeSummary};

    fn table(rows: usize) -> SummaryTable {
        SummaryTable {
            identity_column: "NOME".into(),
            status_columns: vec!["FALTA".into(), "PRESENTE".into()],
            rows: (0..rows)
                .map(|i| EmployeeSummary {
                    employee_name: format!("Funcionário {}", i),
                    status_count: [("FALTA".to_string(), 1), ("PRESENTE".to_string(), 3)]
                        .into_iter()
                        .collect(),
                    total_days: 4,
                    attendance_percent: Some(75.0),
                })
                .collect(),
            date_columns: 4,
            policy: DenominatorPolicy::Worked,
        }
    }

    #[test]
    fn test_pdf_magic() {
        let bytes = to_pdf_bytes(&table(3)).unwrap();
        assert_eq!(&bytes[..4], b"%PDF");
    }

    #[test]
    fn test_multi_page_table() {
        let short = to_pdf_bytes(&table(3)).unwrap();
        let long = to_pdf_bytes(&table(80)).unwrap();
        assert!(long.len() > short.len());
    }

    #[test]
    fn test_empty_table_still_renders() {
        let bytes = to_pdf_bytes(&table(0)).unwrap();
        assert_eq!(&bytes[..4], b"%PDF");
    }

    #[test]
    fn test_fit_truncates() {
        assert_eq!(fit("Ana", 40.0, 8.0), "Ana");
        let cut = fit(&"x".repeat(200), 20.0, 8.0);
        assert!(cut.ends_with('…'));
        assert!(cut.chars().count() < 200);
    }

    #[test]
    fn test_column_widths_fill_page() {
        let widths = column_widths(5);
        let total: f32 = widths.iter().sum();
        assert!((total - (PAGE_WIDTH - 2.0 * MARGIN)).abs() < 0.01);
        assert!((widths[0] - 2.0 * widths[1]).abs() < 0.01);
    }

    #[test]
    fn test_body_cells() {
        let cells = body_cells(&table(1));
        assert_eq!(cells[0], vec!["Funcionário 0", "1", "3", "4", "75.00%"]);
    }
}
