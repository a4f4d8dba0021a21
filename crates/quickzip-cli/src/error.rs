//! Error conversion utilities for CLI.
//!
//! Converts quickzip-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use quickzip_core::ArchiveError;
use quickzip_core::DEFAULT_EXTENSIONS;
use std::path::Path;

/// Converts `ArchiveError` to user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError, archive: &Path) -> anyhow::Error {
    match err {
        ArchiveError::InvalidExtension { path, extension } => {
            anyhow!(
                "'{}' is not a recognized archive ({})\n\
                 HINT: Recognized extensions are {} plus any passed with --extension.",
                path.display(),
                extension.map_or_else(|| "no extension".to_string(), |ext| format!(".{ext}")),
                DEFAULT_EXTENSIONS.join(", ")
            )
        }
        ArchiveError::SourceNotFound { path, source } => {
            anyhow!(
                "Cannot read source '{}': {}\n\
                 HINT: Check that the file exists and is readable.",
                path.display(),
                source
            )
        }
        ArchiveError::ArchiveOpen { path, reason } => {
            anyhow!(
                "Cannot open archive '{}': {}\n\
                 HINT: The file may be missing, unreadable, or not a zip archive.",
                path.display(),
                reason
            )
        }
        ArchiveError::PasswordRequired { entry } => {
            anyhow!(
                "Archive '{}' is encrypted (entry '{}')\n\
                 HINT: Pass the password with --password.",
                archive.display(),
                entry
            )
        }
        ArchiveError::InvalidPassword { entry } => {
            anyhow!(
                "Wrong password for '{}' (entry '{}')\n\
                 HINT: Check the password and try again.",
                archive.display(),
                entry
            )
        }
        ArchiveError::DestinationConflict { path } => {
            anyhow!(
                "Cannot write '{}': a directory or file is in the way\n\
                 HINT: Remove it or choose another output directory.",
                path.display()
            )
        }
        ArchiveError::DuplicateEntryName { name } => {
            anyhow!(
                "Two sources map to the same archive entry '{name}'\n\
                 HINT: Rename one of them or archive their parent directory instead."
            )
        }
        ArchiveError::EntryRead { entry, reason } => {
            anyhow!(
                "Failed to read entry '{}' from '{}': {}\n\
                 HINT: The archive may be corrupted or malformed.",
                entry,
                archive.display(),
                reason
            )
        }
        ArchiveError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                archive.display(),
                io_err
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}

/// Adds context to a core result about archive operations
pub fn add_archive_context<T>(
    result: Result<T, ArchiveError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, archive))
}
