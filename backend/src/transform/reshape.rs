//! Wide-to-long reshape of the attendance sheet.
//!
//! ```text
//! NOME  | 01/01    | 02/01          AttendanceRecord
//! ------+----------+--------   →    (Ana, 01/01, PRESENTE)
//! Ana   | PRESENTE | FALTA          (Ana, 02/01, FALTA)
//! ```
//!
//! Every column except the identity column is a date column. Column names are
//! opaque labels; no date parsing happens here.

use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::models::{AttendanceRecord, BLANK_STATUS};
use crate::parser::Table;
use crate::validation::require_column;

/// Long-format view of a table.
#[derive(Debug, Clone, Default)]
pub struct Reshaped {
    /// One record per (employee row, date column).
    pub records: Vec<AttendanceRecord>,
    /// Date column labels in source order.
    pub date_columns: Vec<String>,
    /// Source rows per employee name.
    pub occurrences: BTreeMap<String, usize>,
    /// 0-based data rows skipped because the identity cell was blank.
    pub skipped_rows: Vec<usize>,
}

/// Pivot `table` from one column per date to one record per employee × date.
pub fn melt(table: &Table, identity_column: &str) -> Result<Reshaped, ValidationError> {
    let identity = require_column(table, identity_column)?;

    let date_indices: Vec<usize> = (0..table.width()).filter(|&i| i != identity).collect();
    let date_columns: Vec<String> = date_indices
        .iter()
        .map(|&i| table.headers[i].clone())
        .collect();

    let mut reshaped = Reshaped {
        records: Vec::with_capacity(table.len() * date_indices.len()),
        date_columns,
        ..Default::default()
    };

    for (row_idx, row) in table.rows.iter().enumerate() {
        let employee = row[identity].trim();
        if employee.is_empty() {
            reshaped.skipped_rows.push(row_idx);
            continue;
        }

        *reshaped.occurrences.entry(employee.to_string()).or_insert(0) += 1;

        for &col in &date_indices {
            reshaped.records.push(AttendanceRecord {
                employee_name: employee.to_string(),
                date_column: table.headers[col].clone(),
                status: status_label(&row[col]),
            });
        }
    }

    Ok(reshaped)
}

/// Cell value as a status label; blank cells get their own bucket.
fn status_label(cell: &str) -> String {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        BLANK_STATUS.to_string()
    } else {
        trimmed.to_string()
    }
}
