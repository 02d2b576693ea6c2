//! Application configuration.
//!
//! Fixed names live here as constants. Tunable settings come from an optional
//! TOML file:
//!
//! ```toml
//! [input]
//! delimiter = ";"
//! encoding = "utf-8"      # utf-8 | iso-8859-1 | windows-1252 | auto
//!
//! [report]
//! denominator = "worked"  # worked | all_categories
//!
//! [display]
//! columns = 3
//! page_size = 24
//!
//! [server]
//! port = 3000
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::models::DenominatorPolicy;

/// Employee-name column every sheet must carry.
pub const IDENTITY_COLUMN: &str = "NOME";

/// First column of the administrative block dropped on load.
pub const REDACTION_START: &str = "FUNÇÃO";

/// Last column of the administrative block dropped on load.
pub const REDACTION_END: &str = "UNIDADE";

/// Upload size limit (50 MB).
pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// Title of the PDF report.
pub const REPORT_TITLE: &str = "Relatório de Frequência";

/// Worksheet name of the Excel export.
pub const SHEET_NAME: &str = "Relatório";

/// Download name of the Excel export.
pub const XLSX_FILE_NAME: &str = "relatorio_frequencia.xlsx";

/// Download name of the PDF export.
pub const PDF_FILE_NAME: &str = "relatorio_frequencia.pdf";

/// Environment variable pointing at the TOML file.
pub const CONFIG_ENV_VAR: &str = "FREQUENCIA_CONFIG";

/// Card grid columns allowed by the layout.
pub const MIN_CARD_COLUMNS: usize = 1;
pub const MAX_CARD_COLUMNS: usize = 6;

const SUPPORTED_ENCODINGS: [&str; 4] = ["utf-8", "iso-8859-1", "windows-1252", "auto"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub report: ReportConfig,
    pub display: DisplayConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub delimiter: char,
    pub encoding: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            encoding: "utf-8".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub denominator: DenominatorPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub columns: usize,
    pub page_size: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            page_size: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration: explicit path, then `FREQUENCIA_CONFIG`, then defaults.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.input.delimiter.is_ascii() {
            return Err(invalid(
                "input.delimiter",
                self.input.delimiter.to_string(),
                "delimiter must be a single ASCII character",
            ));
        }

        let encoding = self.input.encoding.to_lowercase();
        if !SUPPORTED_ENCODINGS.contains(&encoding.as_str()) {
            return Err(invalid(
                "input.encoding",
                self.input.encoding.clone(),
                &format!("supported encodings: {}", SUPPORTED_ENCODINGS.join(", ")),
            ));
        }

        validate_columns(self.display.columns)?;

        if self.display.page_size == 0 {
            return Err(invalid("display.page_size", "0".to_string(), "must be at least 1"));
        }

        Ok(())
    }

    /// Delimiter as the byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.input.delimiter as u8
    }
}

/// Check a card-grid column count.
pub fn validate_columns(columns: usize) -> ConfigResult<()> {
    if !(MIN_CARD_COLUMNS..=MAX_CARD_COLUMNS).contains(&columns) {
        return Err(invalid(
            "display.columns",
            columns.to_string(),
            &format!("must be between {} and {}", MIN_CARD_COLUMNS, MAX_CARD_COLUMNS),
        ));
    }
    Ok(())
}

fn invalid(field: &str, value: String, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.input.delimiter, ';');
        assert_eq!(config.input.encoding, "utf-8");
        assert_eq!(config.report.denominator, DenominatorPolicy::Worked);
        assert_eq!(config.display.columns, 3);
        assert_eq!(config.server.port, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
[report]
denominator = "all_categories"

[display]
columns = 4
"#,
        )
        .unwrap();

        assert_eq!(config.report.denominator, DenominatorPolicy::AllCategories);
        assert_eq!(config.display.columns, 4);
        assert_eq!(config.display.page_size, 24);
        assert_eq!(config.input.delimiter, ';');
    }

    #[test]
    fn test_rejects_out_of_range_columns() {
        let result = AppConfig::from_toml_str("[display]\ncolumns = 7\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_rejects_unknown_encoding() {
        let result = AppConfig::from_toml_str("[input]\nencoding = \"utf-16\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let result = AppConfig::from_toml_str("[report]\ndenominator = \"weekdays\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[input]\ndelimiter = \",\"\nencoding = \"auto\"").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.delimiter_byte(), b',');
        assert_eq!(config.input.encoding, "auto");
    }
}
