//! Reports returned by archive operations.

use std::path::PathBuf;
use std::time::Duration;

/// Report of an archive creation.
///
/// # Examples
///
/// ```
/// use quickzip_core::WriteReport;
///
/// let mut report = WriteReport::default();
/// report.bytes_read = 1000;
/// report.archive_size = 250;
/// assert_eq!(report.compression_ratio(), 4.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WriteReport {
    /// Final location of the archive.
    pub archive_path: PathBuf,

    /// Number of entries written to the archive.
    pub entries_written: usize,

    /// Total bytes read from source files.
    pub bytes_read: u64,

    /// Size of the finished archive on disk.
    pub archive_size: u64,

    /// Whether entries were encrypted.
    pub encrypted: bool,

    /// Duration of the operation.
    pub duration: Duration,
}

impl WriteReport {
    /// Returns uncompressed / compressed size, or `0.0` when either is zero.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.archive_size == 0 || self.bytes_read == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.archive_size as f64
    }
}

/// Report of an archive extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Directory the archive was expanded into.
    pub destination: PathBuf,

    /// Number of files written.
    pub files_extracted: usize,

    /// Number of directory entries materialized.
    pub directories_created: usize,

    /// Files left untouched because they already existed and overwrite was
    /// disabled.
    pub skipped: Vec<PathBuf>,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the operation.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates an empty report for `destination`.
    #[must_use]
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::default()
        }
    }

    /// Returns the number of entries that were processed, skipped included.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created + self.skipped.len()
    }

    /// Returns whether any entry was skipped.
    #[must_use]
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }
}
