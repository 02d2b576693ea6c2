//! Error types for the attendance summary pipeline.
//!
//! One enum per layer:
//!
//! - [`LoadError`] - reading and decoding the uploaded file
//! - [`ValidationError`] - structural checks on the loaded table
//! - [`ExportError`] - XLSX / PDF / SVG rendering
//! - [`ConfigError`] - TOML configuration
//! - [`PipelineError`] - top-level orchestration
//! - [`ServerError`] - HTTP layer
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while turning raw bytes into a table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes could not be decoded with the declared encoding.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Malformed delimited text.
    #[error("Line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Spreadsheet could not be opened or read.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// File extension is neither delimited text nor spreadsheet.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Upload exceeds the size limit.
    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    /// Empty file.
    #[error("File is empty")]
    EmptyFile,

    /// No header row.
    #[error("No headers found")]
    NoHeaders,
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        LoadError::Parse {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Structural problems with a loaded table.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The employee-name column is missing after header normalization.
    #[error("Column '{column}' not found in the spreadsheet (available columns: {})", .available.join(", "))]
    MissingIdentityColumn {
        column: String,
        available: Vec<String>,
    },
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while rendering an export buffer.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Excel writer failure.
    #[error("Excel export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// PDF writer failure.
    #[error("PDF export failed: {0}")]
    Pdf(String),

    /// SVG serialization failure.
    #[error("Chart rendering failed: {0}")]
    Chart(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// TOML syntax or type error.
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::summarize`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Load error.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Export error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
