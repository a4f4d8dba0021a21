//! Error types for archive creation and extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while zipping or unzipping.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The archive path does not carry a recognized archive extension.
    #[error("invalid archive extension for {path}: {}", .extension.as_deref().unwrap_or("<none>"))]
    InvalidExtension {
        /// The rejected archive path.
        path: PathBuf,
        /// The extension found on the path, if any.
        extension: Option<String>,
    },

    /// A file listed for inclusion could not be opened for reading.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The source path.
        path: PathBuf,
        /// Underlying open failure.
        source: std::io::Error,
    },

    /// The archive container could not be created or parsed.
    #[error("cannot open archive {path}: {reason}")]
    ArchiveOpen {
        /// The archive path.
        path: PathBuf,
        /// Why the container could not be opened.
        reason: String,
    },

    /// Streaming bytes into an archive entry failed.
    #[error("failed to write entry '{entry}': {reason}")]
    EntryWrite {
        /// Entry name inside the archive.
        entry: String,
        /// Codec or I/O failure description.
        reason: String,
    },

    /// Reading an archive entry failed (corruption, CRC mismatch, I/O).
    #[error("failed to read entry '{entry}': {reason}")]
    EntryRead {
        /// Entry name inside the archive.
        entry: String,
        /// Codec or I/O failure description.
        reason: String,
    },

    /// An encrypted entry was found but no password was supplied.
    #[error("password required to decrypt entry '{entry}'")]
    PasswordRequired {
        /// Entry name inside the archive.
        entry: String,
    },

    /// The supplied password does not decrypt the entry.
    #[error("invalid password for entry '{entry}'")]
    InvalidPassword {
        /// Entry name inside the archive.
        entry: String,
    },

    /// An existing filesystem object blocks extraction of an entry.
    #[error("destination conflict: {path} already exists and cannot be replaced")]
    DestinationConflict {
        /// The blocking destination path.
        path: PathBuf,
    },

    /// An entry name is not a safe relative archive path.
    #[error("invalid entry name '{name}': {reason}")]
    InvalidEntryName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Two resolved entries share the same archive name.
    #[error("duplicate entry name '{name}'")]
    DuplicateEntryName {
        /// The colliding name.
        name: String,
    },

    /// Options are inconsistent or out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the problem.
        reason: String,
    },

    /// The operation was cancelled at an entry boundary.
    #[error("operation cancelled")]
    Cancelled,

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    /// Returns `true` if the failure is caused by a missing or wrong password.
    ///
    /// # Examples
    ///
    /// ```
    /// use quickzip_core::ArchiveError;
    ///
    /// let err = ArchiveError::InvalidPassword {
    ///     entry: "secret.txt".to_string(),
    /// };
    /// assert!(err.is_password_error());
    /// assert!(!ArchiveError::Cancelled.is_password_error());
    /// ```
    #[must_use]
    pub const fn is_password_error(&self) -> bool {
        matches!(
            self,
            Self::PasswordRequired { .. } | Self::InvalidPassword { .. }
        )
    }

    /// Returns `true` if the error is raised before any destination state is
    /// created.
    ///
    /// Callers can rely on these errors leaving the filesystem untouched.
    #[must_use]
    pub const fn is_pre_io(&self) -> bool {
        matches!(
            self,
            Self::InvalidExtension { .. }
                | Self::ArchiveOpen { .. }
                | Self::InvalidEntryName { .. }
                | Self::DuplicateEntryName { .. }
                | Self::InvalidConfiguration { .. }
        )
    }

    /// Returns the archive entry name the error refers to, if any.
    #[must_use]
    pub fn entry(&self) -> Option<&str> {
        match self {
            Self::EntryWrite { entry, .. }
            | Self::EntryRead { entry, .. }
            | Self::PasswordRequired { entry }
            | Self::InvalidPassword { entry } => Some(entry),
            Self::InvalidEntryName { name, .. } | Self::DuplicateEntryName { name } => Some(name),
            _ => None,
        }
    }
}
