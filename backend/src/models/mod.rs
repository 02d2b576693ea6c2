//! Domain models for the attendance pipeline.
//!
//! - [`Status`] - fixed status vocabulary
//! - [`DenominatorPolicy`] - which statuses count toward total days
//! - [`AttendanceRecord`] - one employee × date cell (long format)
//! - [`EmployeeSummary`] - per-employee counts and percentage
//! - [`SummaryTable`] - the aggregated table handed to every presenter
//! - [`ReportRequest`] - immutable input of one pipeline run

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config;

/// Bucket for date cells left blank in the source.
pub const BLANK_STATUS: &str = "SEM REGISTRO";

/// Header of the total-days column in exports.
pub const TOTAL_DAYS_COLUMN: &str = "TOTAL DIAS";

/// Header of the percentage column in exports.
pub const PERCENT_COLUMN: &str = "% PRESENÇA";

// =============================================================================
// Status vocabulary
// =============================================================================

/// Status labels every summary can address by name.
///
/// Labels are the literal cell values found in attendance sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// DSR - weekly paid rest day.
    RestDay,
    /// FÉRIAS
    Vacation,
    /// AFASTAMENTO MÉDICO - medical leave.
    MedicalLeave,
    /// SUSPENSO
    Suspended,
    /// PRESENTE
    Present,
    /// FALTA - unjustified absence.
    Absent,
    /// ATESTADO MÉDICO - absence covered by a medical certificate.
    MedicalCertificate,
    /// BANCO DE HORAS - day off against the hour bank.
    TimeBank,
}

impl Status {
    /// Full vocabulary, in the order missing columns are appended.
    pub const ALL: [Status; 8] = [
        Status::RestDay,
        Status::Vacation,
        Status::MedicalLeave,
        Status::Suspended,
        Status::Present,
        Status::Absent,
        Status::MedicalCertificate,
        Status::TimeBank,
    ];

    /// Cell value used in source sheets.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RestDay => "DSR",
            Self::Vacation => "FÉRIAS",
            Self::MedicalLeave => "AFASTAMENTO MÉDICO",
            Self::Suspended => "SUSPENSO",
            Self::Present => "PRESENTE",
            Self::Absent => "FALTA",
            Self::MedicalCertificate => "ATESTADO MÉDICO",
            Self::TimeBank => "BANCO DE HORAS",
        }
    }

    /// Look up a vocabulary status by its exact label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Denominator policy
// =============================================================================

/// Which status columns are summed into `total_days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenominatorPolicy {
    /// PRESENTE + FALTA + ATESTADO MÉDICO.
    #[default]
    Worked,
    /// Every vocabulary status.
    AllCategories,
}

impl DenominatorPolicy {
    /// Statuses summed by this policy.
    pub fn statuses(&self) -> &'static [Status] {
        const WORKED: [Status; 3] = [Status::Present, Status::Absent, Status::MedicalCertificate];
        match self {
            Self::Worked => &WORKED,
            Self::AllCategories => &Status::ALL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Worked => "worked",
            Self::AllCategories => "all_categories",
        }
    }
}

impl std::str::FromStr for DenominatorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "worked" => Ok(Self::Worked),
            "all_categories" | "all-categories" | "all" => Ok(Self::AllCategories),
            other => Err(format!(
                "unknown denominator policy '{}' (expected 'worked' or 'all_categories')",
                other
            )),
        }
    }
}

// =============================================================================
// Records and summaries
// =============================================================================

/// One employee × date cell after the wide-to-long reshape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub employee_name: String,
    pub date_column: String,
    pub status: String,
}

/// Aggregated attendance of one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub employee_name: String,
    /// Count per status label; holds every column of the owning table.
    pub status_count: BTreeMap<String, u32>,
    pub total_days: u32,
    /// `None` when `total_days` is zero.
    pub attendance_percent: Option<f64>,
}

impl EmployeeSummary {
    /// Count for a status label, 0 when the label is not a column.
    pub fn count(&self, label: &str) -> u32 {
        self.status_count.get(label).copied().unwrap_or(0)
    }

    /// Count for a vocabulary status.
    pub fn status(&self, status: Status) -> u32 {
        self.count(status.label())
    }

    /// Sum over every status column.
    pub fn cell_total(&self) -> u32 {
        self.status_count.values().sum()
    }
}

/// Per-employee summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    /// Name of the identity column ("NOME").
    pub identity_column: String,
    /// Status columns in display order.
    pub status_columns: Vec<String>,
    /// One row per distinct employee, sorted by name.
    pub rows: Vec<EmployeeSummary>,
    /// Number of date columns in the source table.
    pub date_columns: usize,
    /// Policy used to compute `total_days`.
    pub policy: DenominatorPolicy,
}

impl SummaryTable {
    /// Export headers: identity, statuses, total days, percentage.
    pub fn headers(&self) -> Vec<String> {
        let mut headers = Vec::with_capacity(self.status_columns.len() + 3);
        headers.push(self.identity_column.clone());
        headers.extend(self.status_columns.iter().cloned());
        headers.push(TOTAL_DAYS_COLUMN.to_string());
        headers.push(PERCENT_COLUMN.to_string());
        headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, employee_name: &str) -> Option<&EmployeeSummary> {
        self.rows.iter().find(|r| r.employee_name == employee_name)
    }
}

// =============================================================================
// Request
// =============================================================================

/// How the uploaded bytes are to be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceFormat {
    /// Delimited text with one-byte separator and character encoding
    /// (`utf-8`, `iso-8859-1`, `windows-1252` or `auto`).
    Delimited { delimiter: u8, encoding: String },
    /// XLSX workbook; the first worksheet is read.
    Spreadsheet,
}

impl SourceFormat {
    /// Infer the format from a file name, using the given text settings for
    /// delimited files.
    pub fn from_file_name(name: &str, delimiter: u8, encoding: &str) -> Option<Self> {
        let extension = std::path::Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())?;

        match extension.as_str() {
            "csv" | "txt" => Some(Self::Delimited {
                delimiter,
                encoding: encoding.to_string(),
            }),
            "xlsx" | "xlsm" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

/// An uploaded file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub format: SourceFormat,
}

/// Everything one pipeline run needs; nothing else is read.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub file: SourceFile,
    pub identity_column: String,
    pub name_filter: Option<String>,
    pub denominator_policy: DenominatorPolicy,
}

impl ReportRequest {
    pub fn new(file: SourceFile) -> Self {
        Self {
            file,
            identity_column: config::IDENTITY_COLUMN.to_string(),
            name_filter: None,
            denominator_policy: DenominatorPolicy::default(),
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.name_filter = if filter.trim().is_empty() { None } else { Some(filter) };
        self
    }

    pub fn with_policy(mut self, policy: DenominatorPolicy) -> Self {
        self.denominator_policy = policy;
        self
    }
}
