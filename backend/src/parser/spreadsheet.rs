//! XLSX reader built on calamine.
//!
//! Only the first worksheet is read; its first non-empty row is the header.

use calamine::{Data, DataType, Reader, Xlsx};
use std::io::Cursor;

use super::Table;
use crate::error::{LoadError, LoadResult};

/// Parse the first worksheet of an XLSX workbook into a raw table.
pub fn parse_spreadsheet(bytes: &[u8]) -> LoadResult<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Spreadsheet("workbook has no worksheets".to_string()))?
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(LoadError::EmptyFile)?
        .iter()
        .map(cell_to_string)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::NoHeaders);
    }

    let data = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(Table::new(headers, data))
}

/// Render a cell the way it reads in the sheet: whole numbers without a
/// fractional part, dates as dd/mm/yyyy.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    fn workbook_bytes(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_reads_first_sheet() {
        let bytes = workbook_bytes(&[
            &["NOME", "01/01", "02/01"],
            &["Ana", "PRESENTE", "FALTA"],
            &["Bruno", "PRESENTE", ""],
        ]);

        let table = parse_spreadsheet(&bytes).unwrap();
        assert_eq!(table.headers, vec!["NOME", "01/01", "02/01"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["Bruno", "PRESENTE", ""]);
    }

    #[test]
    fn test_numeric_cells_have_no_fraction() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "NOME").unwrap();
        sheet.write_string(0, 1, "MATRICULA").unwrap();
        sheet.write_string(1, 0, "Ana").unwrap();
        sheet.write_number(1, 1, 1234.0).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = parse_spreadsheet(&bytes).unwrap();
        assert_eq!(table.rows[0], vec!["Ana", "1234"]);
    }

    #[test]
    fn test_date_headers_read_as_day_month_year() {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("dd/mm/yyyy");
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "NOME").unwrap();
        let date = ExcelDateTime::from_ymd(2025, 3, 1).unwrap();
        sheet.write_datetime_with_format(0, 1, &date, &date_format).unwrap();
        sheet.write_string(1, 0, "Ana").unwrap();
        sheet.write_string(1, 1, "PRESENTE").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = parse_spreadsheet(&bytes).unwrap();
        assert_eq!(table.headers, vec!["NOME", "01/03/2025"]);
        assert_eq!(table.rows[0], vec!["Ana", "PRESENTE"]);
    }

    #[test]
    fn test_garbage_is_spreadsheet_error() {
        let result = parse_spreadsheet(b"NOME;01/01\nAna;PRESENTE");
        assert!(matches!(result, Err(LoadError::Spreadsheet(_))));
    }
}
