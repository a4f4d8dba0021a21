//! ZIP archive extraction.
//!
//! Every entry is materialized beneath the destination directory, with
//! intermediate directories created on demand. Each file is streamed into
//! a temporary sibling and renamed over its final path once complete, so
//! a failing entry never leaves a truncated file behind.

use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use std::time::SystemTime;

use zip::ZipArchive;
use zip::result::ZipError;

use crate::ArchiveError;
use crate::Result;
use crate::config::ExtractOptions;
use crate::copy::CopyBuffer;
use crate::copy::CopyError;
use crate::copy::copy_with_buffer;
use crate::copy::staging_file;
use crate::progress::ProgressCallback;
use crate::progress::ProgressTracker;
use crate::progress::check_cancelled;
use crate::report::ExtractionReport;
use crate::timestamp::from_zip_time;

/// Extracts every entry of `archive` into `destination`.
///
/// The archive is opened before anything is created on disk, so a missing
/// or malformed archive leaves no destination directory behind. The
/// destination is created if needed, including when the archive is empty.
///
/// With `overwrite` disabled, files that already exist are skipped and
/// listed in [`ExtractionReport::skipped`]. Skipped entries still count
/// towards progress.
///
/// # Errors
///
/// Returns an error if:
/// - The archive cannot be opened or parsed (`ArchiveOpen`)
/// - An encrypted entry is met without a password (`PasswordRequired`)
/// - The password does not decrypt an entry (`InvalidPassword`)
/// - An entry is corrupt or names a path outside the destination
///   (`EntryRead`)
/// - An existing directory blocks a file, or an existing file blocks a
///   directory (`DestinationConflict`)
/// - The operation is cancelled between entries (`Cancelled`)
///
/// Entries extracted before a failure remain on disk.
///
/// # Examples
///
/// ```no_run
/// use quickzip_core::ExtractOptions;
/// use quickzip_core::NoopProgress;
/// use quickzip_core::reader::extract_archive;
/// use std::path::Path;
///
/// let report = extract_archive(
///     Path::new("photos.zip"),
///     Path::new("/tmp/photos"),
///     &ExtractOptions::default().with_overwrite(true),
///     &mut NoopProgress,
/// )?;
/// println!("extracted {} files", report.files_extracted);
/// # Ok::<(), quickzip_core::ArchiveError>(())
/// ```
pub fn extract_archive(
    archive: &Path,
    destination: &Path,
    options: &ExtractOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let open_error = |reason: String| ArchiveError::ArchiveOpen {
        path: archive.to_path_buf(),
        reason,
    };
    let file = File::open(archive).map_err(|e| open_error(e.to_string()))?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(|e| open_error(e.to_string()))?;

    if destination.exists() && !destination.is_dir() {
        return Err(ArchiveError::DestinationConflict {
            path: destination.to_path_buf(),
        });
    }

    let start = Instant::now();
    tracing::info!(
        archive = %archive.display(),
        destination = %destination.display(),
        entries = zip.len(),
        "extracting archive"
    );
    create_dir_all(destination)?;

    let mut report = ExtractionReport::new(destination);
    let mut tracker = ProgressTracker::new(progress, zip.len());
    extract_entries(&mut zip, destination, options, &mut tracker, &mut report)?;
    tracker.on_complete();

    report.duration = start.elapsed();
    tracing::info!(
        destination = %destination.display(),
        files = report.files_extracted,
        skipped = report.skipped.len(),
        bytes = report.bytes_written,
        "extraction complete"
    );
    Ok(report)
}

fn extract_entries<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    destination: &Path,
    options: &ExtractOptions,
    tracker: &mut ProgressTracker<'_>,
    report: &mut ExtractionReport,
) -> Result<()> {
    let mut buffer = CopyBuffer::new();

    for index in 0..zip.len() {
        check_cancelled(options.cancellation.as_ref())?;

        let name = zip
            .name_for_index(index)
            .map_or_else(|| format!("#{index}"), str::to_string);
        tracker.on_entry_start(&name);

        let opened = match options.password.as_deref() {
            Some(password) => zip.by_index_decrypt(index, password.as_bytes()),
            None => zip.by_index(index),
        };
        let mut entry = opened.map_err(|e| map_open_error(e, &name))?;

        let relative = entry.enclosed_name().ok_or_else(|| ArchiveError::EntryRead {
            entry: name.clone(),
            reason: "path escapes the destination directory".to_string(),
        })?;
        let target = destination.join(relative);

        if entry.is_dir() {
            if target.exists() && !target.is_dir() {
                return Err(ArchiveError::DestinationConflict { path: target });
            }
            create_dir_all(&target)?;
            report.directories_created += 1;
            tracing::debug!(entry = %name, "directory created");
        } else if let Some(skipped) = check_existing(&target, options.overwrite)? {
            tracing::warn!(path = %skipped.display(), "file exists, skipping");
            report.skipped.push(skipped);
        } else {
            let mode = if options.preserve_permissions {
                entry.unix_mode()
            } else {
                None
            };
            let modified = entry.last_modified().and_then(from_zip_time);
            let written = write_file(&mut entry, &name, &target, mode, modified, &mut buffer)?;
            report.files_extracted += 1;
            report.bytes_written = report.bytes_written.saturating_add(written);
            tracing::debug!(entry = %name, bytes = written, "file extracted");
        }

        tracker.on_entry_complete();
    }

    Ok(())
}

/// Decides what to do with an existing file at `target`.
///
/// Returns `Some(target)` when the entry must be skipped.
fn check_existing(target: &Path, overwrite: bool) -> Result<Option<PathBuf>> {
    let Ok(metadata) = std::fs::symlink_metadata(target) else {
        return Ok(None);
    };
    if metadata.is_dir() {
        return Err(ArchiveError::DestinationConflict {
            path: target.to_path_buf(),
        });
    }
    if overwrite {
        return Ok(None);
    }
    Ok(Some(target.to_path_buf()))
}

/// Streams one entry into `target` through a temporary sibling file.
fn write_file<R: Read + ?Sized>(
    reader: &mut R,
    name: &str,
    target: &Path,
    mode: Option<u32>,
    modified: Option<SystemTime>,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    let parent = target.parent().unwrap_or(target);
    create_dir_all(parent)?;

    let mut staging = staging_file(parent)?;

    let written = {
        let mut writer = BufWriter::new(staging.as_file_mut());
        let written = copy_with_buffer(reader, &mut writer, buffer).map_err(|e| match e {
            CopyError::Read(e) => ArchiveError::EntryRead {
                entry: name.to_string(),
                reason: e.to_string(),
            },
            CopyError::Write(e) => ArchiveError::Io(e),
        })?;
        writer.flush()?;
        written
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Some(mode) = mode.map(|mode| mode & 0o777).filter(|mode| *mode != 0) {
            staging
                .as_file()
                .set_permissions(std::fs::Permissions::from_mode(mode))?;
        }
    }
    #[cfg(not(unix))]
    let _ = mode;

    if let Some(modified) = modified {
        staging.as_file().set_modified(modified)?;
    }

    staging.persist(target).map_err(|e| ArchiveError::Io(e.error))?;
    Ok(written)
}

/// Maps an entry open failure onto the password-aware error variants.
fn map_open_error(err: ZipError, name: &str) -> ArchiveError {
    match err {
        ZipError::UnsupportedArchive(detail) if detail == ZipError::PASSWORD_REQUIRED => {
            ArchiveError::PasswordRequired {
                entry: name.to_string(),
            }
        }
        ZipError::InvalidPassword => ArchiveError::InvalidPassword {
            entry: name.to_string(),
        },
        other => ArchiveError::EntryRead {
            entry: name.to_string(),
            reason: other.to_string(),
        },
    }
}
