//! Buffered copy between entry streams and files.
//!
//! Unlike `std::io::copy`, failures are tagged with the side that failed so
//! callers can report a corrupt entry separately from a full disk.

use std::io::Read;
use std::io::Write;
use std::io::{self};
use std::path::Path;

use tempfile::NamedTempFile;

/// Buffer size for streaming entries (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable heap buffer for entry copies within one operation.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a zeroed 64KB buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a hidden `.part` file in `dir` that is later persisted over its
/// final path.
///
/// On Unix the file is created with mode `0o666` minus the umask, like a
/// regular `File::create`.
pub(crate) fn staging_file(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".quickzip-").suffix(".part");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

/// Side of a copy that failed.
#[derive(Debug)]
pub enum CopyError {
    /// Reading from the source failed.
    Read(io::Error),
    /// Writing to the sink failed.
    Write(io::Error),
}

impl CopyError {
    /// Returns the underlying I/O error.
    #[must_use]
    pub fn into_inner(self) -> io::Error {
        match self {
            Self::Read(e) | Self::Write(e) => e,
        }
    }
}

/// Copies `reader` into `writer` through `buffer`, returning bytes copied.
///
/// Interrupted reads are retried.
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64, CopyError> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };

        writer
            .write_all(&buffer.buf[..bytes_read])
            .map_err(CopyError::Write)?;
        total = total.saturating_add(bytes_read as u64);
    }

    Ok(total)
}
