//! Test utilities for building fixture archives and source trees.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use zip::AesMode;
use zip::write::SimpleFileOptions;

/// Creates an in-memory ZIP archive from `(name, content)` pairs.
///
/// Files are stored uncompressed with mode 0o644.
///
/// # Examples
///
/// ```
/// use quickzip_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(&[("file.txt", b"hello"), ("dir/nested.txt", b"world")]);
/// assert!(!zip_data.is_empty());
/// ```
#[must_use]
pub fn create_test_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    entries
        .iter()
        .fold(ZipBuilder::new(), |builder, (name, data)| builder.file(name, data))
        .build()
}

/// Writes `(relative path, content)` pairs below `root`, creating parents.
///
/// Returns the absolute path of every file written, in input order.
pub fn write_tree(root: &Path, files: &[(&str, &[u8])]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(relative, data)| {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, data).unwrap();
            path
        })
        .collect()
}

/// Builder for fixture ZIP archives.
///
/// A password set with [`password`](Self::password) applies AES-256 to the
/// files added after it.
///
/// # Examples
///
/// ```
/// use quickzip_core::test_utils::ZipBuilder;
///
/// let zip_data = ZipBuilder::new()
///     .directory("dir/")
///     .file("dir/file.txt", b"content")
///     .password("secret")
///     .file("locked.txt", b"hidden")
///     .build();
/// assert!(!zip_data.is_empty());
/// ```
pub struct ZipBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
    password: Option<String>,
}

impl ZipBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
            password: None,
        }
    }

    /// Encrypts subsequently added files with `password`.
    #[must_use]
    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Adds a regular file with mode 0o644.
    #[must_use]
    pub fn file(self, name: &str, data: &[u8]) -> Self {
        self.file_with_mode(name, data, 0o644)
    }

    /// Adds a regular file with a custom mode.
    #[must_use]
    pub fn file_with_mode(self, name: &str, data: &[u8], mode: u32) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(mode);
        self.add_file(name, data, options)
    }

    /// Adds a regular file stamped with `modified`.
    #[must_use]
    pub fn file_with_time(self, name: &str, data: &[u8], modified: zip::DateTime) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o644)
            .last_modified_time(modified);
        self.add_file(name, data, options)
    }

    fn add_file(mut self, name: &str, data: &[u8], options: SimpleFileOptions) -> Self {
        match self.password.as_deref() {
            Some(password) => self
                .zip
                .start_file(name, options.with_aes_encryption(AesMode::Aes256, password))
                .unwrap(),
            None => self.zip.start_file(name, options).unwrap(),
        }
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn directory(mut self, name: &str) -> Self {
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(name, options).unwrap();
        self
    }

    /// Returns the finished archive bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }

    /// Writes the finished archive to `path` and returns it.
    pub fn write_to(self, path: impl Into<PathBuf>) -> PathBuf {
        let path = path.into();
        fs::write(&path, self.build()).unwrap();
        path
    }
}

impl Default for ZipBuilder {
    fn default() -> Self {
        Self::new()
    }
}
