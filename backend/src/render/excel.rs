//! Spreadsheet export of the full summary table.
//!
//! One sheet, header row then one row per employee in table order. The
//! export is never filtered.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

use crate::config;
use crate::error::ExportResult;
use crate::models::SummaryTable;

/// Build the XLSX workbook in memory.
pub fn to_xlsx_bytes(table: &SummaryTable) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(config::SHEET_NAME)?;

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_background_color(Color::RGB(0x0B3D91))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);
    let integer = Format::new().set_num_format("0").set_border(FormatBorder::Thin);
    let percent = Format::new().set_num_format("0.00").set_border(FormatBorder::Thin);
    let text = Format::new().set_border(FormatBorder::Thin);

    let headers = table.headers();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
        let width = if col == 0 { 32 } else { header.chars().count().max(10) + 2 };
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    let total_col = (table.status_columns.len() + 1) as u16;
    let percent_col = total_col + 1;

    for (idx, summary) in table.rows.iter().enumerate() {
        let row = (idx + 1) as u32;

        worksheet.write_string_with_format(row, 0, &summary.employee_name, &text)?;
        for (i, status) in table.status_columns.iter().enumerate() {
            worksheet.write_number_with_format(
                row,
                (i + 1) as u16,
                f64::from(summary.count(status)),
                &integer,
            )?;
        }
        worksheet.write_number_with_format(row, total_col, f64::from(summary.total_days), &integer)?;
        match summary.attendance_percent {
            Some(p) => worksheet.write_number_with_format(row, percent_col, p, &percent)?,
            None => worksheet.write_blank(row, percent_col, &percent)?,
        };
    }

    if !table.rows.is_empty() {
        worksheet.autofilter(0, 0, table.rows.len() as u32, percent_col)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    Ok(workbook.save_to_buffer()?)
}
