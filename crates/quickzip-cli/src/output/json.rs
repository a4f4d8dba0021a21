//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use quickzip_core::ExtractionReport;
use quickzip_core::WriteReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct WriteOutput {
    archive_path: String,
    entries_written: usize,
    bytes_read: u64,
    archive_size: u64,
    compression_ratio: f64,
    encrypted: bool,
    duration_ms: u128,
}

impl From<&WriteReport> for WriteOutput {
    fn from(report: &WriteReport) -> Self {
        Self {
            archive_path: report.archive_path.display().to_string(),
            entries_written: report.entries_written,
            bytes_read: report.bytes_read,
            archive_size: report.archive_size,
            compression_ratio: report.compression_ratio(),
            encrypted: report.encrypted,
            duration_ms: report.duration.as_millis(),
        }
    }
}

#[derive(Serialize)]
struct ExtractionOutput {
    destination: String,
    files_extracted: usize,
    directories_created: usize,
    skipped: Vec<String>,
    bytes_written: u64,
    duration_ms: u128,
}

impl From<&ExtractionReport> for ExtractionOutput {
    fn from(report: &ExtractionReport) -> Self {
        Self {
            destination: report.destination.display().to_string(),
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            skipped: report
                .skipped
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_write_result(&self, report: &WriteReport) -> Result<()> {
        Self::output(&JsonOutput::success("zip", WriteOutput::from(report)))
    }

    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        Self::output(&JsonOutput::success("unzip", ExtractionOutput::from(report)))
    }

    fn format_extension_check(&self, results: &[(String, bool)]) -> Result<()> {
        #[derive(Serialize)]
        struct ExtensionCheck<'a> {
            extension: &'a str,
            valid: bool,
        }

        let data: Vec<_> = results
            .iter()
            .map(|(extension, valid)| ExtensionCheck {
                extension,
                valid: *valid,
            })
            .collect();
        Self::output(&JsonOutput::success("ext-check", data))
    }

    fn format_extension_list(&self, defaults: &[&str], custom: &[String]) -> Result<()> {
        #[derive(Serialize)]
        struct ExtensionList<'a> {
            defaults: &'a [&'a str],
            custom: &'a [String],
        }

        Self::output(&JsonOutput::success(
            "ext-list",
            ExtensionList { defaults, custom },
        ))
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}
