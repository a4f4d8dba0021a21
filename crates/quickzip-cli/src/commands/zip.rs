//! Zip command implementation.

use crate::cli::ZipArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use anyhow::bail;
use quickzip_core::Archiver;
use quickzip_core::EncryptionMethod;
use quickzip_core::NamingPolicy;
use quickzip_core::NoopProgress;
use quickzip_core::ProgressCallback;
use quickzip_core::WriteOptions;
use std::path::Path;

pub fn execute(args: &ZipArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let mut options = WriteOptions::new()
        .with_optional_password(args.password.clone())
        .with_compression_level(args.level)
        .with_preserve_permissions(!args.no_permissions);
    if args.legacy_encryption {
        formatter.format_warning("ZipCrypto is weak; prefer the default AES-256 encryption");
        options = options.with_encryption(EncryptionMethod::ZipCrypto);
    }

    let archiver = Archiver::new();
    let sources = args.all_sources();
    let destination = match &args.quick {
        Some(name) => add_archive_context(archiver.quick_zip_destination(name), Path::new(name))?,
        None => args.output.clone(),
    };

    if destination.exists() && !args.force {
        bail!(
            "Output file '{}' already exists\n\
             HINT: Use --force to overwrite it.",
            destination.display()
        );
    }

    let exclude = |name: &str, _source: &Path| {
        (!args.exclude.iter().any(|suffix| name.ends_with(suffix.as_str())))
            .then(|| name.to_string())
    };
    let policy: Option<&dyn NamingPolicy> = if args.exclude.is_empty() {
        None
    } else {
        Some(&exclude)
    };

    let run = |progress: &mut dyn ProgressCallback| match &args.quick {
        Some(name) => archiver.quick_zip_with(&sources, name, policy, &options, progress),
        None => archiver.zip(&sources, &destination, policy, &options, progress),
    };

    let report = if show_progress {
        let mut progress = CliProgress::new("Adding");
        add_archive_context(run(&mut progress), &destination)?
    } else {
        add_archive_context(run(&mut NoopProgress), &destination)?
    };

    formatter.format_write_result(&report)?;

    Ok(())
}
