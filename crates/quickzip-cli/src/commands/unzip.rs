//! Unzip command implementation.

use crate::cli::UnzipArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use quickzip_core::Archiver;
use quickzip_core::ExtractOptions;
use quickzip_core::NoopProgress;
use quickzip_core::ProgressCallback;

pub fn execute(args: &UnzipArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let options = ExtractOptions::new()
        .with_overwrite(args.force)
        .with_optional_password(args.password.clone())
        .with_preserve_permissions(!args.no_permissions);

    let archiver = Archiver::new();

    // Without OUTPUT_DIR the archive lands in <QUICKZIP_HOME>/<stem>
    let run = |progress: &mut dyn ProgressCallback| match &args.output_dir {
        Some(dir) => archiver.unzip(&args.archive, dir, &options, progress),
        None => archiver.quick_unzip_with(&args.archive, &options, progress),
    };

    let report = if show_progress {
        let mut progress = CliProgress::new("Extracting");
        add_archive_context(run(&mut progress), &args.archive)?
    } else {
        add_archive_context(run(&mut NoopProgress), &args.archive)?
    };

    formatter.format_extraction_result(&report)?;
    if report.has_skipped() {
        formatter.format_warning(&format!(
            "{} existing file(s) were left untouched; use --force to overwrite",
            report.skipped.len()
        ));
    }

    Ok(())
}
