//! REST API types for frontend integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{PipelineError, ServerError};
use crate::models::{DenominatorPolicy, EmployeeSummary};
use crate::render::Band;
use crate::transform::pipeline::Report;

/// Response sent to the frontend after an upload.
/// `employees` holds the filtered rows in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Status: "ready", "warning", "error"
    pub status: String,

    pub employees: Vec<EmployeeRow>,

    pub metadata: ResponseMetadata,
}

/// One employee as sent to the frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRow {
    pub name: String,
    pub counts: BTreeMap<String, u32>,
    pub total_days: u32,
    pub attendance_percent: Option<f64>,
    pub band: Band,
}

impl From<&EmployeeSummary> for EmployeeRow {
    fn from(row: &EmployeeSummary) -> Self {
        Self {
            name: row.employee_name.clone(),
            counts: row.status_count.clone(),
            total_days: row.total_days,
            attendance_percent: row.attendance_percent,
            band: Band::from_percent(row.attendance_percent),
        }
    }
}

/// Metadata about the computation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Employees in the full summary
    pub total_employees: usize,

    /// Employees left after the name filter
    pub displayed: usize,

    pub name_filter: Option<String>,

    pub policy: DenominatorPolicy,

    /// Status columns in summary order
    pub status_columns: Vec<String>,

    pub date_columns: usize,

    pub source: SourceMetadata,
}

/// Uploaded file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    pub file_name: String,
    pub encoding: Option<String>,
    pub delimiter: Option<String>,
    pub row_count: usize,
    pub columns: Vec<String>,
    pub redacted_columns: Vec<String>,
    pub skipped_rows: Vec<usize>,
}

impl From<&Report> for UploadResponse {
    fn from(report: &Report) -> Self {
        let employees: Vec<EmployeeRow> = report
            .display_rows()
            .into_iter()
            .map(EmployeeRow::from)
            .collect();
        let source = &report.source;

        UploadResponse {
            job_id: Uuid::new_v4().to_string(),
            status: if source.skipped_rows.is_empty() { "ready" } else { "warning" }.to_string(),
            metadata: ResponseMetadata {
                total_employees: report.summary.len(),
                displayed: employees.len(),
                name_filter: report.name_filter.clone(),
                policy: report.summary.policy,
                status_columns: report.summary.status_columns.clone(),
                date_columns: report.summary.date_columns,
                source: SourceMetadata {
                    file_name: source.file_name.clone(),
                    encoding: source.encoding.clone(),
                    delimiter: source.delimiter.map(|d| d.to_string()),
                    row_count: source.row_count,
                    columns: source.columns.clone(),
                    redacted_columns: source.redacted_columns.clone(),
                    skipped_rows: source.skipped_rows.clone(),
                },
            },
            employees,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "employees": [],
    })
}

impl ServerError {
    /// HTTP status for this error: unreadable input is 400, a readable sheet
    /// without the identity column is 422.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Pipeline(PipelineError::Load(_)) => StatusCode::BAD_REQUEST,
            Self::Pipeline(PipelineError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Pipeline(PipelineError::Export(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, Json(error_response(&self.to_string()))).into_response()
    }
}
