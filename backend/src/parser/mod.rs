//! Loader: raw upload bytes to a normalized table.
//!
//! Delimited text is decoded with the declared encoding (or detected with
//! `chardet` when the encoding is `auto`) and split with the `csv` reader.
//! Spreadsheets are read with `calamine` (see [`spreadsheet`]). Either way the
//! headers are then normalized and the administrative column block is
//! redacted (see [`columns`]).

pub mod columns;
pub mod spreadsheet;

use std::path::Path;

use crate::config::{self, AppConfig};
use crate::error::{LoadError, LoadResult};
use crate::models::SourceFormat;

pub use columns::{normalize_header, normalize_headers, redact_columns, redaction_range};
pub use spreadsheet::parse_spreadsheet;

/// Rectangular string table; every row has `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, padding short rows with blanks, cutting long ones and
    /// dropping rows where every cell is blank.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Index of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of loading with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Normalized, redacted table
    pub table: Table,
    /// Encoding used for delimited text (`None` for spreadsheets)
    pub encoding: Option<String>,
    /// Delimiter used for delimited text (`None` for spreadsheets)
    pub delimiter: Option<char>,
    /// Columns dropped by the redaction rule
    pub redacted_columns: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// `auto` runs [`detect_encoding`] first. A UTF-8 byte order mark is removed.
/// Invalid UTF-8 is an error rather than a lossy conversion.
pub fn decode_content(bytes: &[u8], encoding: &str) -> LoadResult<(String, String)> {
    let encoding = match encoding.to_lowercase().as_str() {
        "auto" => detect_encoding(bytes),
        other => other.to_string(),
    };

    let decoded = match encoding.as_str() {
        "utf-8" | "utf8" | "ascii" => {
            let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
            if had_errors {
                return Err(LoadError::Encoding(
                    "file is not valid UTF-8; try encoding 'iso-8859-1' or 'auto'".to_string(),
                ));
            }
            text.into_owned()
        }
        // WHATWG maps latin-1 labels onto windows-1252, a superset
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        other => {
            return Err(LoadError::Encoding(format!("unsupported encoding '{}'", other)));
        }
    };

    Ok((decoded, encoding))
}

/// Split decoded delimited text into a raw table (headers not yet normalized).
pub fn parse_delimited(content: &str, delimiter: u8) -> LoadResult<Table> {
    if content.trim().is_empty() {
        return Err(LoadError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::NoHeaders);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::new(headers, rows))
}

/// Load uploaded bytes: size check, parse, normalize headers, redact.
pub fn load_bytes(bytes: &[u8], format: &SourceFormat) -> LoadResult<ParseResult> {
    if bytes.len() > config::MAX_FILE_SIZE {
        return Err(LoadError::TooLarge {
            size: bytes.len(),
            limit: config::MAX_FILE_SIZE,
        });
    }
    if bytes.is_empty() {
        return Err(LoadError::EmptyFile);
    }

    let (mut table, encoding, delimiter) = match format {
        SourceFormat::Delimited {
            delimiter,
            encoding,
        } => {
            let (content, used) = decode_content(bytes, encoding)?;
            let table = parse_delimited(&content, *delimiter)?;
            (table, Some(used), Some(*delimiter as char))
        }
        SourceFormat::Spreadsheet => (parse_spreadsheet(bytes)?, None, None),
    };

    normalize_headers(&mut table);
    let redacted_columns = redact_columns(&mut table, config::REDACTION_START, config::REDACTION_END);

    tracing::debug!(
        columns = table.width(),
        rows = table.len(),
        redacted = redacted_columns.len(),
        "table loaded"
    );

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
        redacted_columns,
    })
}

/// Load a file from disk, inferring its format from the extension.
pub fn load_file<P: AsRef<Path>>(path: P, config: &AppConfig) -> LoadResult<ParseResult> {
    let path = path.as_ref();
    let format = format_for(path, config)?;
    let bytes = std::fs::read(path)?;
    load_bytes(&bytes, &format)
}

/// Format of a path according to its extension and the input settings.
pub fn format_for(path: &Path, config: &AppConfig) -> LoadResult<SourceFormat> {
    let name = path.to_string_lossy();
    SourceFormat::from_file_name(&name, config.delimiter_byte(), &config.input.encoding)
        .ok_or_else(|| LoadError::UnsupportedFormat(name.to_string()))
}
