//! High-level pipeline API: uploaded sheet to attendance report.
//!
//! This module combines every step: loading, reshaping, aggregating,
//! deriving metrics and checking the result.
//!
//! # Example
//!
//! ```rust,ignore
//! use frequencia::{summarize_file, AppConfig};
//!
//! let config = AppConfig::default();
//! let report = summarize_file("frequencia.csv", &config, Some("ana"))?;
//!
//! for row in report.display_rows() {
//!     println!("{}: {:?}", row.employee_name, row.attendance_percent);
//! }
//! ```

use serde::Serialize;
use std::path::Path;

use super::aggregate::count_statuses;
use super::derive::{build_summary, display_rows};
use super::reshape::melt;
use crate::api::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::config::AppConfig;
use crate::error::{ExportResult, PipelineResult, ValidationError};
use crate::models::{
    DenominatorPolicy, EmployeeSummary, ReportRequest, SourceFile, SummaryTable,
};
use crate::parser::{self, ParseResult, Table};
use crate::render::{excel, pdf};
use crate::validation::validate_summary;

/// Source file information
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub file_name: String,
    /// `None` for spreadsheets
    pub encoding: Option<String>,
    /// `None` for spreadsheets
    pub delimiter: Option<char>,
    /// Columns kept after redaction
    pub columns: Vec<String>,
    pub row_count: usize,
    pub redacted_columns: Vec<String>,
    /// 0-based data rows skipped for a blank identity cell
    pub skipped_rows: Vec<usize>,
}

/// Result of one pipeline run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub summary: SummaryTable,
    pub source: SourceInfo,
    pub name_filter: Option<String>,
}

impl Report {
    /// Filtered rows in display order.
    pub fn display_rows(&self) -> Vec<&EmployeeSummary> {
        display_rows(&self.summary, self.name_filter.as_deref())
    }

    /// Spreadsheet export of the full summary.
    pub fn to_xlsx(&self) -> ExportResult<Vec<u8>> {
        excel::to_xlsx_bytes(&self.summary)
    }

    /// PDF export of the full summary.
    pub fn to_pdf(&self) -> ExportResult<Vec<u8>> {
        pdf::to_pdf_bytes(&self.summary)
    }
}

/// Summary of a table plus the rows that were skipped.
#[derive(Debug, Clone)]
pub struct Summarized {
    pub summary: SummaryTable,
    pub skipped_rows: Vec<usize>,
}

/// Run one request end to end.
///
/// 1. Loads the file (decode, parse, normalize headers, redact)
/// 2. Reshapes to one record per employee × date
/// 3. Counts statuses per employee
/// 4. Derives total days and percentage
pub fn summarize(request: &ReportRequest) -> PipelineResult<Report> {
    let file = &request.file;
    log_info(format!("Reading {}...", file.name));

    let parsed = parser::load_bytes(&file.bytes, &file.format).map_err(|e| {
        log_error(e.to_string());
        e
    })?;
    log_source(&parsed);

    let Summarized {
        summary,
        skipped_rows,
    } = summarize_table(
        &parsed.table,
        &request.identity_column,
        request.denominator_policy,
    )
    .map_err(|e| {
        log_error(e.to_string());
        e
    })?;

    Ok(Report {
        source: SourceInfo {
            file_name: file.name.clone(),
            encoding: parsed.encoding,
            delimiter: parsed.delimiter,
            columns: parsed.table.headers.clone(),
            row_count: parsed.table.len(),
            redacted_columns: parsed.redacted_columns,
            skipped_rows,
        },
        summary,
        name_filter: request.name_filter.clone(),
    })
}

/// Summarize an already-loaded table.
pub fn summarize_table(
    table: &Table,
    identity_column: &str,
    policy: DenominatorPolicy,
) -> Result<Summarized, ValidationError> {
    let reshaped = melt(table, identity_column)?;
    if !reshaped.skipped_rows.is_empty() {
        log_warning(format!(
            "{} row(s) without {} skipped",
            reshaped.skipped_rows.len(),
            identity_column
        ));
    }
    log_info(format!(
        "{} attendance records across {} date columns",
        reshaped.records.len(),
        reshaped.date_columns.len()
    ));

    let aggregation = count_statuses(reshaped.occurrences.keys(), &reshaped.records);
    let summary = build_summary(
        aggregation,
        identity_column,
        reshaped.date_columns.len(),
        policy,
    );

    if let Err(errors) = validate_summary(&summary, &reshaped.occurrences) {
        for error in errors.iter().take(3) {
            log_warning(error.clone());
        }
    }

    log_success(format!(
        "{} employees, {} status columns",
        summary.len(),
        summary.status_columns.len()
    ));

    Ok(Summarized {
        summary,
        skipped_rows: reshaped.skipped_rows,
    })
}

/// Load a file from disk and summarize it with the configured settings.
pub fn summarize_file<P: AsRef<Path>>(
    path: P,
    config: &AppConfig,
    name_filter: Option<&str>,
) -> PipelineResult<Report> {
    let path = path.as_ref();
    let format = parser::format_for(path, config)?;
    let bytes = std::fs::read(path).map_err(crate::error::LoadError::from)?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    let mut request = ReportRequest::new(SourceFile {
        name,
        bytes,
        format,
    })
    .with_policy(config.report.denominator);
    if let Some(filter) = name_filter {
        request = request.with_filter(filter);
    }

    summarize(&request)
}

fn log_source(parsed: &ParseResult) {
    if let Some(encoding) = &parsed.encoding {
        log_success(format!("Encoding: {}", encoding));
    }
    if let Some(delimiter) = parsed.delimiter {
        log_success(format!("Separator: '{}'", format_delimiter(delimiter)));
    }
    log_success(format!("Read {} rows", parsed.table.len()));
    log_info(format!("{} columns:", parsed.table.width()));
    for (i, col) in parsed.table.headers.iter().enumerate() {
        log_info_indent(format!("[{:2}] {}", i + 1, col), 1);
    }
    if !parsed.redacted_columns.is_empty() {
        log_info(format!(
            "Removed columns: {}",
            parsed.redacted_columns.join(", ")
        ));
    }
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}
