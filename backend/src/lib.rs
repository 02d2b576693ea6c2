//! # Frequência - employee attendance summaries
//!
//! Frequência reads an attendance sheet (one row per employee, one column per
//! date, each cell a status such as PRESENTE or FALTA) and produces a
//! per-employee summary with counts per status and an attendance percentage,
//! plus HTML cards, SVG charts and Excel/PDF reports.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌────────────┐   ┌────────────┐   ┌────────────┐   ┌─────────────┐
//! │  CSV / XLSX │──▶│   Loader   │──▶│  Reshape   │──▶│ Aggregate  │──▶│   Derive    │
//! │  (ISO/UTF8) │   │ (+redact)  │   │ wide→long  │   │ counts     │   │ total, %    │
//! └─────────────┘   └────────────┘   └────────────┘   └────────────┘   └──────┬──────┘
//!                                                                            │
//!                        ┌───────────┬───────────┬───────────┬──────────────┘
//!                        ▼           ▼           ▼           ▼
//!                    HTML cards   SVG chart     XLSX        PDF
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use frequencia::{summarize_file, AppConfig};
//!
//! let report = summarize_file("frequencia.csv", &AppConfig::default(), None)?;
//! std::fs::write("relatorio_frequencia.xlsx", report.to_xlsx()?)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Status, EmployeeSummary, SummaryTable)
//! - [`config`] - Constants and TOML configuration
//! - [`parser`] - CSV / XLSX loading, header normalization, redaction
//! - [`transform`] - Reshape, aggregate, derive, and pipeline
//! - [`validation`] - Structural checks
//! - [`render`] - Cards, charts, Excel and PDF
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod logger;
pub mod models;

// Loading
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Presentation
pub mod render;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ExportError, LoadError, PipelineError, PipelineResult, ServerError,
    ValidationError,
};

// =============================================================================
// Re-exports - Models & config
// =============================================================================

pub use config::AppConfig;
pub use logger::init_cli_logger;
pub use models::{
    AttendanceRecord, DenominatorPolicy, EmployeeSummary, ReportRequest, SourceFile,
    SourceFormat, Status, SummaryTable,
};

// =============================================================================
// Re-exports - Loading
// =============================================================================

pub use parser::{decode_content, detect_encoding, load_bytes, load_file, ParseResult, Table};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{summarize, summarize_file, summarize_table, Report, SourceInfo};
pub use transform::{display_rows, matches_filter};

// =============================================================================
// Re-exports - Rendering
// =============================================================================

pub use render::{
    format_percent, paginate, to_pdf_bytes, to_xlsx_bytes, Band, CardRenderer, CardView,
    ChartRenderer, Page,
};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, EmployeeRow, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
