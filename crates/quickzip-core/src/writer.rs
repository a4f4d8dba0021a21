//! ZIP archive creation from resolved entries.
//!
//! The archive is streamed into a hidden temporary file next to the
//! destination and renamed into place only after the container has been
//! finalized. On any failure the temporary file is removed and the
//! destination keeps whatever it held before the call.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use zip::AesMode;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::unstable::write::FileOptionsExt;
use zip::write::FileOptions;
use zip::write::SimpleFileOptions;

use crate::ArchiveError;
use crate::Result;
use crate::config::EncryptionMethod;
use crate::config::WriteOptions;
use crate::copy::CopyBuffer;
use crate::copy::CopyError;
use crate::copy::copy_with_buffer;
use crate::copy::staging_file;
use crate::progress::ProgressCallback;
use crate::progress::ProgressTracker;
use crate::progress::check_cancelled;
use crate::report::WriteReport;
use crate::resolve::NameOrigin;
use crate::resolve::ResolvedPath;
use crate::timestamp::to_zip_time;

/// Writes `entries` into a new ZIP archive at `destination`.
///
/// Entries are written one at a time in list order. Progress is reported
/// after every entry as `written / total`; an empty list produces a valid
/// empty archive and no progress events.
///
/// # Errors
///
/// Returns an error if:
/// - An entry name is empty, absolute, contains `..` or is duplicated
///   (checked before any I/O)
/// - The temporary archive cannot be created next to `destination`
/// - A source file cannot be opened (`SourceNotFound`)
/// - The codec fails while streaming an entry (`EntryWrite`)
/// - The operation is cancelled between entries (`Cancelled`)
/// - The archive cannot be finalized or moved into place
///
/// # Examples
///
/// ```no_run
/// use quickzip_core::NoopProgress;
/// use quickzip_core::WriteOptions;
/// use quickzip_core::resolve;
/// use quickzip_core::writer::write_archive;
/// use std::path::Path;
///
/// let entries = resolve(&[Path::new("photos")], None);
/// let report = write_archive(
///     &entries,
///     Path::new("photos.zip"),
///     &WriteOptions::default(),
///     &mut NoopProgress,
/// )?;
/// println!("wrote {} entries", report.entries_written);
/// # Ok::<(), quickzip_core::ArchiveError>(())
/// ```
pub fn write_archive(
    entries: &[ResolvedPath],
    destination: &Path,
    options: &WriteOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<WriteReport> {
    options.validate()?;
    validate_entry_names(entries)?;

    let start = Instant::now();
    tracing::info!(
        archive = %destination.display(),
        entries = entries.len(),
        encrypted = options.password.is_some(),
        "creating archive"
    );

    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staging = staging_file(parent).map_err(|e| ArchiveError::ArchiveOpen {
        path: destination.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut tracker = ProgressTracker::new(progress, entries.len());
    let bytes_read = write_entries(
        BufWriter::new(staging.as_file_mut()),
        entries,
        options,
        &mut tracker,
    )?;
    staging.as_file().sync_all()?;

    staging
        .persist(destination)
        .map_err(|e| ArchiveError::ArchiveOpen {
            path: destination.to_path_buf(),
            reason: format!("cannot move finished archive into place: {}", e.error),
        })?;
    tracker.on_complete();

    let report = WriteReport {
        archive_path: destination.to_path_buf(),
        entries_written: entries.len(),
        bytes_read,
        archive_size: std::fs::metadata(destination)?.len(),
        encrypted: options.password.is_some(),
        duration: start.elapsed(),
    };
    tracing::info!(
        archive = %destination.display(),
        entries = report.entries_written,
        size = report.archive_size,
        "archive created"
    );
    Ok(report)
}

/// Streams every entry into a ZIP container over `writer`.
fn write_entries<W: Write + Seek>(
    writer: W,
    entries: &[ResolvedPath],
    options: &WriteOptions,
    tracker: &mut ProgressTracker<'_>,
) -> Result<u64> {
    let mut zip = ZipWriter::new(writer);
    let base = base_options(options)?;
    let mut buffer = CopyBuffer::new();
    let mut bytes_read = 0u64;

    for entry in entries {
        check_cancelled(options.cancellation.as_ref())?;
        tracker.on_entry_start(entry.entry_name());
        bytes_read += write_entry(&mut zip, entry, base, options, &mut buffer)?;
        tracker.on_entry_complete();
    }
    check_cancelled(options.cancellation.as_ref())?;

    let mut writer = zip
        .finish()
        .map_err(|e| std::io::Error::other(format!("failed to finish ZIP archive: {e}")))?;
    writer.flush()?;
    Ok(bytes_read)
}

/// Adds one source file as one entry.
fn write_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    entry: &ResolvedPath,
    base: FileOptions<'_, ()>,
    options: &WriteOptions,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    let name = entry.entry_name();
    let mut file = File::open(entry.source()).map_err(|source| ArchiveError::SourceNotFound {
        path: entry.source().to_path_buf(),
        source,
    })?;
    let metadata = file.metadata()?;
    if metadata.is_dir() {
        return Err(ArchiveError::SourceNotFound {
            path: entry.source().to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "expected a file, found a directory",
            ),
        });
    }

    let mut file_options = base.large_file(metadata.len() >= u64::from(u32::MAX));
    if let Some(modified) = metadata.modified().ok().and_then(to_zip_time) {
        file_options = file_options.last_modified_time(modified);
    }
    if options.preserve_permissions {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file_options = file_options.unix_permissions(metadata.permissions().mode());
        }
    }

    zip.start_file(name, file_options)
        .map_err(|e| ArchiveError::EntryWrite {
            entry: name.to_string(),
            reason: e.to_string(),
        })?;

    let written = copy_with_buffer(&mut file, zip, buffer).map_err(|e| match e {
        CopyError::Read(e) => ArchiveError::EntryWrite {
            entry: name.to_string(),
            reason: format!("cannot read {}: {e}", entry.source().display()),
        },
        CopyError::Write(e) => ArchiveError::EntryWrite {
            entry: name.to_string(),
            reason: e.to_string(),
        },
    })?;

    tracing::debug!(entry = name, bytes = written, "entry written");
    Ok(written)
}

/// Builds per-archive entry options from the configuration.
fn base_options(options: &WriteOptions) -> Result<FileOptions<'_, ()>> {
    let method = if options.compression_level == Some(0) {
        SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
    } else {
        let level = options.compression_level.unwrap_or(6);
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(level)))
    };

    match (options.password.as_deref(), options.encryption) {
        (Some(password), EncryptionMethod::Aes256) => {
            Ok(method.with_aes_encryption(AesMode::Aes256, password))
        }
        (Some(password), EncryptionMethod::ZipCrypto) => method
            .with_deprecated_encryption(password.as_bytes())
            .map_err(|e| ArchiveError::InvalidConfiguration {
                reason: format!("cannot set up ZipCrypto encryption: {e}"),
            }),
        (None, _) => Ok(method),
    }
}

/// Rejects names that are unsafe or ambiguous before anything is written.
///
/// Names taken from the filesystem only need to be relative; names a
/// policy or caller supplied get the full [`validate_entry_name`] check.
fn validate_entry_names(entries: &[ResolvedPath]) -> Result<()> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        let name = entry.entry_name();
        match entry.origin() {
            NameOrigin::NonUtf8 => {
                return Err(ArchiveError::InvalidEntryName {
                    name: name.to_string(),
                    reason: format!(
                        "file name of {} is not valid UTF-8",
                        entry.source().display()
                    ),
                });
            }
            NameOrigin::Derived => validate_relative_name(name)?,
            NameOrigin::Supplied => validate_entry_name(name)?,
        }
        if !seen.insert(name) {
            return Err(ArchiveError::DuplicateEntryName {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn invalid_name(name: &str, reason: &str) -> ArchiveError {
    ArchiveError::InvalidEntryName {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Checks that `name` is a non-empty relative file path without `..`.
fn validate_relative_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid_name(name, "name is empty"));
    }
    if name.starts_with('/') {
        return Err(invalid_name(name, "name is absolute"));
    }
    if name.ends_with('/') {
        return Err(invalid_name(name, "name denotes a directory"));
    }
    if name.split('/').any(|segment| segment == "..") {
        return Err(invalid_name(name, "name contains a '..' segment"));
    }
    Ok(())
}

/// Checks that `name` is a relative, forward-slash separated file path.
///
/// On top of the relative-path rules, backslashes and NUL bytes are
/// rejected since other tools read them as separators or terminators.
pub fn validate_entry_name(name: &str) -> Result<()> {
    validate_relative_name(name)?;
    if name.contains('\\') {
        return Err(invalid_name(name, "name contains a backslash"));
    }
    if name.contains('\0') {
        return Err(invalid_name(name, "name contains a NUL byte"));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::progress::NoopProgress;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    fn read_entries(archive: &Path) -> Vec<(String, Vec<u8>)> {
        let mut zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
        (0..zip.len())
            .map(|i| {
                let mut entry = zip.by_index(i).unwrap();
                let mut data = Vec::new();
                entry.read_to_end(&mut data).unwrap();
                (entry.name().to_string(), data)
            })
            .collect()
    }

    #[test]
    fn test_write_single_entry() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "alpha").unwrap();
        let output = temp.path().join("out.zip");

        let report = write_archive(
            &[ResolvedPath::new(&source, "a.txt")],
            &output,
            &WriteOptions::default(),
            &mut NoopProgress,
        )
        .unwrap();

        assert_eq!(report.entries_written, 1);
        assert_eq!(report.bytes_read, 5);
        assert!(report.archive_size > 0);
        assert_eq!(read_entries(&output), vec![("a.txt".to_string(), b"alpha".to_vec())]);
    }

    #[test]
    fn test_write_preserves_entry_order() {
        let temp = TempDir::new().unwrap();
        let mut entries = Vec::new();
        for name in ["c.txt", "a.txt", "b.txt"] {
            let path = temp.path().join(name);
            fs::write(&path, name).unwrap();
            entries.push(ResolvedPath::new(path, format!("dir/{name}")));
        }
        let output = temp.path().join("ordered.zip");

        write_archive(&entries, &output, &WriteOptions::default(), &mut NoopProgress).unwrap();

        let names: Vec<_> = read_entries(&output).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["dir/c.txt", "dir/a.txt", "dir/b.txt"]);
    }

    #[test]
    fn test_write_empty_archive_without_progress() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("empty.zip");
        let mut calls = 0usize;
        let mut sink = |_: f64| calls += 1;

        let report = write_archive(&[], &output, &WriteOptions::default(), &mut sink).unwrap();

        assert_eq!(report.entries_written, 0);
        assert_eq!(calls, 0);
        assert!(read_entries(&output).is_empty());
    }

    #[test]
    fn test_write_stored_entries() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("plain.txt");
        fs::write(&source, "a".repeat(4096)).unwrap();
        let output = temp.path().join("stored.zip");

        write_archive(
            &[ResolvedPath::new(&source, "plain.txt")],
            &output,
            &WriteOptions::default().with_compression_level(0),
            &mut NoopProgress,
        )
        .unwrap();

        let mut zip = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
        assert_eq!(
            zip.by_index(0).unwrap().compression(),
            CompressionMethod::Stored
        );
    }

    #[test]
    fn test_missing_source_leaves_no_archive() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good.txt");
        fs::write(&good, "ok").unwrap();
        let output = temp.path().join("out.zip");

        let result = write_archive(
            &[
                ResolvedPath::new(&good, "good.txt"),
                ResolvedPath::new(temp.path().join("missing.txt"), "missing.txt"),
            ],
            &output,
            &WriteOptions::default(),
            &mut NoopProgress,
        );

        assert!(matches!(result, Err(ArchiveError::SourceNotFound { .. })));
        assert!(!output.exists());
        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
            .collect();
        assert!(leftovers.is_empty(), "temporary archive must be cleaned up");
    }

    #[test]
    fn test_failure_keeps_previous_destination() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("existing.zip");
        fs::write(&output, b"previous contents").unwrap();

        let result = write_archive(
            &[ResolvedPath::new(temp.path().join("nope"), "nope")],
            &output,
            &WriteOptions::default(),
            &mut NoopProgress,
        );

        assert!(result.is_err());
        assert_eq!(fs::read(&output).unwrap(), b"previous contents");
    }

    #[test]
    fn test_directory_source_rejected() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out.zip");

        let result = write_archive(
            &[ResolvedPath::new(temp.path(), "dir")],
            &output,
            &WriteOptions::default(),
            &mut NoopProgress,
        );
        assert!(matches!(result, Err(ArchiveError::SourceNotFound { .. })));
    }

    #[test]
    fn test_duplicate_names_rejected_before_io() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "a").unwrap();
        let output = temp.path().join("dup.zip");

        let result = write_archive(
            &[
                ResolvedPath::new(&source, "same.txt"),
                ResolvedPath::new(&source, "same.txt"),
            ],
            &output,
            &WriteOptions::default(),
            &mut NoopProgress,
        );
        assert!(matches!(
            result,
            Err(ArchiveError::DuplicateEntryName { ref name }) if name == "same.txt"
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_parent_is_open_failure() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("no/such/dir/out.zip");

        let result = write_archive(&[], &output, &WriteOptions::default(), &mut NoopProgress);
        assert!(matches!(result, Err(ArchiveError::ArchiveOpen { .. })));
    }

    #[test]
    fn test_cancelled_before_first_entry() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "a").unwrap();
        let output = temp.path().join("cancelled.zip");
        let token = crate::CancellationToken::new();
        token.cancel();

        let result = write_archive(
            &[ResolvedPath::new(&source, "a.txt")],
            &output,
            &WriteOptions::default().with_cancellation(token),
            &mut NoopProgress,
        );
        assert!(matches!(result, Err(ArchiveError::Cancelled)));
        assert!(!output.exists());
    }

    #[test]
    fn test_encrypted_entries_flagged() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("secret.txt");
        fs::write(&source, "classified").unwrap();

        for method in [EncryptionMethod::Aes256, EncryptionMethod::ZipCrypto] {
            let output = temp.path().join(format!("{method:?}.zip"));
            let report = write_archive(
                &[ResolvedPath::new(&source, "secret.txt")],
                &output,
                &WriteOptions::default()
                    .with_password("pw")
                    .with_encryption(method),
                &mut NoopProgress,
            )
            .unwrap();
            assert!(report.encrypted);

            let mut zip = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
            assert!(zip.by_index(0).is_err(), "{method:?} entry must need a password");
            let mut data = String::new();
            zip.by_index_decrypt(0, b"pw")
                .unwrap()
                .read_to_string(&mut data)
                .unwrap();
            assert_eq!(data, "classified");
        }
    }

    #[test]
    fn test_validate_entry_name() {
        assert!(validate_entry_name("a.txt").is_ok());
        assert!(validate_entry_name("dir/sub/a.txt").is_ok());
        assert!(validate_entry_name("..hidden/a.txt").is_ok());

        for bad in ["", "/abs.txt", "dir/", "a\\b.txt", "a\0b", "../up.txt", "a/../b.txt"] {
            assert!(
                matches!(
                    validate_entry_name(bad),
                    Err(ArchiveError::InvalidEntryName { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_cancelled_at_entry_boundary() {
        let temp = TempDir::new().unwrap();
        let entries: Vec<_> = ["a.txt", "b.txt", "c.txt"]
            .into_iter()
            .map(|name| {
                let path = temp.path().join(name);
                fs::write(&path, name).unwrap();
                ResolvedPath::new(path, name)
            })
            .collect();
        let output = temp.path().join("partial.zip");
        let token = crate::CancellationToken::new();
        let remote = token.clone();
        let mut fractions = Vec::new();
        let mut sink = |fraction: f64| {
            fractions.push(fraction);
            remote.cancel();
        };

        let result = write_archive(
            &entries,
            &output,
            &WriteOptions::default().with_cancellation(token),
            &mut sink,
        );

        assert!(matches!(result, Err(ArchiveError::Cancelled)));
        assert_eq!(fractions, vec![1.0 / 3.0]);
        assert!(!output.exists());
        let leftovers = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_backslash_in_file_name_is_kept() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("docs");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("ok.txt"), "ok").unwrap();
        fs::write(dir.join("a\\b.txt"), "odd").unwrap();
        let output = temp.path().join("odd.zip");

        let entries = crate::resolve(&[&dir], None);
        write_archive(&entries, &output, &WriteOptions::default(), &mut NoopProgress).unwrap();

        let mut names: Vec<_> = read_entries(&output).into_iter().map(|(n, _)| n).collect();
        names.sort();
        assert_eq!(names, vec!["docs/a\\b.txt", "docs/ok.txt"]);
    }

    #[test]
    fn test_supplied_backslash_rejected() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "a").unwrap();

        let result = write_archive(
            &[ResolvedPath::new(&source, "dir\\a.txt")],
            &temp.path().join("out.zip"),
            &WriteOptions::default(),
            &mut NoopProgress,
        );
        assert!(matches!(result, Err(ArchiveError::InvalidEntryName { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_rejected_before_io() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("docs");
        fs::create_dir(&dir).unwrap();
        let first = OsString::from_vec(b"caf\xe9.txt".to_vec());
        let second = OsString::from_vec(b"caf\xe8.txt".to_vec());
        if fs::write(dir.join(&first), "1").is_err() {
            // Some filesystems only accept UTF-8 names.
            return;
        }
        fs::write(dir.join(&second), "2").unwrap();
        let output = temp.path().join("names.zip");

        let entries = crate::resolve(&[&dir], None);
        let result = write_archive(&entries, &output, &WriteOptions::default(), &mut NoopProgress);

        assert!(matches!(
            result,
            Err(ArchiveError::InvalidEntryName { ref reason, .. }) if reason.contains("UTF-8")
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_entries_keep_modification_time() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("dated.txt");
        fs::write(&source, "old news").unwrap();
        let modified = crate::timestamp::from_zip_time(
            zip::DateTime::from_date_and_time(2020, 6, 15, 12, 30, 44).unwrap(),
        )
        .unwrap();
        File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(modified)
            .unwrap();
        let output = temp.path().join("dated.zip");

        write_archive(
            &[ResolvedPath::new(&source, "dated.txt")],
            &output,
            &WriteOptions::default(),
            &mut NoopProgress,
        )
        .unwrap();

        let mut zip = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let stamp = zip.by_index(0).unwrap().last_modified().unwrap();
        assert_eq!((stamp.year(), stamp.month(), stamp.day()), (2020, 6, 15));
        assert_eq!((stamp.hour(), stamp.minute(), stamp.second()), (12, 30, 44));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_stores_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let source = temp.path().join("run.sh");
        fs::write(&source, "#!/bin/sh").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o755)).unwrap();
        let output = temp.path().join("perm.zip");

        write_archive(
            &[ResolvedPath::new(&source, "run.sh")],
            &output,
            &WriteOptions::default(),
            &mut NoopProgress,
        )
        .unwrap();

        let mut zip = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let mode = zip.by_index(0).unwrap().unix_mode().unwrap();
        assert_eq!(mode & 0o777, 0o755);
    }
}
