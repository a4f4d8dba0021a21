//! Quick zip and unzip with predictable archive layouts.
//!
//! `quickzip-core` turns a list of files and directories into a ZIP archive
//! and back. Directories always appear as top-level folders inside the
//! archive, a [`NamingPolicy`] can rename or drop files while they are
//! collected, and an [`ExtensionRegistry`] decides which file extensions
//! are treated as archives.
//!
//! # Examples
//!
//! ```no_run
//! use quickzip_core::ExtractOptions;
//! use quickzip_core::NoopProgress;
//! use quickzip_core::WriteOptions;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut on_progress = |fraction: f64| println!("{:.0}%", fraction * 100.0);
//! quickzip_core::zip(
//!     &["photos", "notes.txt"],
//!     "backup.zip",
//!     None,
//!     &WriteOptions::default(),
//!     &mut on_progress,
//! )?;
//!
//! let report = quickzip_core::unzip(
//!     "backup.zip",
//!     "/tmp/restored",
//!     &ExtractOptions::default(),
//!     &mut NoopProgress,
//! )?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod copy;
pub mod error;
pub mod extension;
pub mod policy;
pub mod progress;
pub mod reader;
pub mod report;
pub mod resolve;
pub mod test_utils;
mod timestamp;
pub mod writer;

// Re-export main API types
pub use api::Archiver;
pub use api::add_custom_file_extension;
pub use api::file_extension_is_invalid;
pub use api::is_valid_file_extension;
pub use api::quick_unzip;
pub use api::quick_zip;
pub use api::remove_custom_file_extension;
pub use api::unzip;
pub use api::zip;
pub use config::EncryptionMethod;
pub use config::ExtractOptions;
pub use config::WriteOptions;
pub use error::ArchiveError;
pub use error::Result;
pub use extension::DEFAULT_EXTENSIONS;
pub use extension::ExtensionRegistry;
pub use policy::KeepNames;
pub use policy::NamingPolicy;
pub use progress::CancellationToken;
pub use progress::NoopProgress;
pub use progress::ProgressCallback;
pub use report::ExtractionReport;
pub use report::WriteReport;
pub use resolve::NameOrigin;
pub use resolve::ResolvedPath;
pub use resolve::resolve;
