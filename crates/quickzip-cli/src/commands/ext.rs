//! Extension registry inspection.

use crate::cli::ExtCommand;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use quickzip_core::DEFAULT_EXTENSIONS;
use quickzip_core::ExtensionRegistry;

pub fn execute(command: &ExtCommand, formatter: &dyn OutputFormatter) -> Result<()> {
    match command {
        ExtCommand::Check { extensions } => check(extensions, formatter),
        ExtCommand::List => formatter.format_extension_list(
            &DEFAULT_EXTENSIONS,
            &ExtensionRegistry::global().custom_extensions(),
        ),
    }
}

/// Prints a verdict per extension and fails if any is not recognized.
fn check(extensions: &[String], formatter: &dyn OutputFormatter) -> Result<()> {
    let results: Vec<(String, bool)> = extensions
        .iter()
        .map(|ext| (ext.clone(), quickzip_core::is_valid_file_extension(ext)))
        .collect();
    formatter.format_extension_check(&results)?;

    let invalid = results.iter().filter(|(_, valid)| !valid).count();
    if invalid > 0 {
        bail!(
            "{invalid} extension(s) not recognized\n\
             HINT: Register custom extensions with --extension."
        );
    }
    Ok(())
}
