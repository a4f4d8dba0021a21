//! Output formatter trait for CLI results.

use anyhow::Result;
use quickzip_core::ExtractionReport;
use quickzip_core::WriteReport;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format archive creation result
    fn format_write_result(&self, report: &WriteReport) -> Result<()>;

    /// Format extraction result
    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()>;

    /// Format extension validity checks as `(extension, valid)` pairs
    fn format_extension_check(&self, results: &[(String, bool)]) -> Result<()>;

    /// Format built-in and custom extension lists
    fn format_extension_list(&self, defaults: &[&str], custom: &[String]) -> Result<()>;

    /// Format error message for a failed `operation`
    fn format_error(&self, operation: &str, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
