//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use quickzip_core::ExtractionReport;
use quickzip_core::WriteReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn headline(&self, text: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {text}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(text);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_write_result(&self, report: &WriteReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!(
            "Archive created: {}",
            report.archive_path.display()
        ));
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "  Entries:          {}",
            Self::format_number(report.entries_written)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_read)
        ));
        let _ = self.term.write_line(&format!(
            "  Archive size:     {}",
            Self::format_size(report.archive_size)
        ));
        if report.encrypted {
            let _ = self.term.write_line("  Encrypted:        yes");
        }

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Ratio:            {:.2}",
                report.compression_ratio()
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        Ok(())
    }

    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!(
            "Extracted to {}",
            report.destination.display()
        ));
        let _ = self.term.write_line(&format!(
            "  Files extracted: {}",
            Self::format_number(report.files_extracted)
        ));
        let _ = self
            .term
            .write_line(&format!("  Directories: {}", report.directories_created));
        let _ = self.term.write_line(&format!(
            "  Total size: {}",
            Self::format_size(report.bytes_written)
        ));

        if report.has_skipped() {
            let _ = self.term.write_line(&format!(
                "  Skipped (already exist): {}",
                report.skipped.len()
            ));
            if self.verbose {
                for path in &report.skipped {
                    let _ = self.term.write_line(&format!("    - {}", path.display()));
                }
            }
        }

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", report.duration));
        }

        Ok(())
    }

    fn format_extension_check(&self, results: &[(String, bool)]) -> Result<()> {
        for (extension, valid) in results {
            let verdict = match (valid, self.use_colors) {
                (true, true) => style("valid").green().to_string(),
                (false, true) => style("invalid").red().to_string(),
                (true, false) => "valid".to_string(),
                (false, false) => "invalid".to_string(),
            };
            let _ = self.term.write_line(&format!("{extension}: {verdict}"));
        }
        Ok(())
    }

    fn format_extension_list(&self, defaults: &[&str], custom: &[String]) -> Result<()> {
        let _ = self
            .term
            .write_line(&format!("Built-in: {}", defaults.join(", ")));
        let custom = if custom.is_empty() {
            "(none)".to_string()
        } else {
            custom.join(", ")
        };
        let _ = self.term.write_line(&format!("Custom:   {custom}"));
        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let stderr = Term::stderr();
        if self.use_colors {
            let _ = stderr.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = stderr.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let stderr = Term::stderr();
        if self.use_colors {
            let _ = stderr.write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = stderr.write_line(&format!("WARNING: {message}"));
        }
    }
}
