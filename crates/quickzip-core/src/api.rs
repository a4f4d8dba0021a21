//! High-level public API for zipping and unzipping.
//!
//! The free functions operate on the process-wide [`ExtensionRegistry`] and
//! the default output root. [`Archiver`] carries both explicitly, so callers
//! that need isolated extension sets or a custom root can hold their own.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use crate::ArchiveError;
use crate::ExtensionRegistry;
use crate::ExtractOptions;
use crate::ExtractionReport;
use crate::NamingPolicy;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::WriteOptions;
use crate::WriteReport;
use crate::config::default_output_root;
use crate::reader::extract_archive;
use crate::resolve::resolve;
use crate::writer::write_archive;

/// Facade tying path resolution, extension checks and the archive codec
/// together.
///
/// # Examples
///
/// ```no_run
/// use quickzip_core::Archiver;
/// use quickzip_core::ExtensionRegistry;
/// use std::sync::Arc;
///
/// let registry = Arc::new(ExtensionRegistry::new());
/// registry.add("cstm");
///
/// let archiver = Archiver::with_registry(registry).with_output_root("/tmp/quickzip");
/// let archive = archiver.quick_zip(&["notes.txt"], "notes")?;
/// assert_eq!(archive, std::path::Path::new("/tmp/quickzip/notes.zip"));
/// # Ok::<(), quickzip_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Archiver {
    registry: Arc<ExtensionRegistry>,
    output_root: PathBuf,
}

impl Default for Archiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Archiver {
    /// Creates an archiver over the global registry and default output root.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(ExtensionRegistry::global())
    }

    /// Creates an archiver over `registry` and the default output root.
    #[must_use]
    pub fn with_registry(registry: Arc<ExtensionRegistry>) -> Self {
        Self {
            registry,
            output_root: default_output_root(),
        }
    }

    /// Sets the root directory used by quick operations.
    #[must_use]
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Extension registry consulted before any I/O.
    #[must_use]
    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// Root directory used by quick operations.
    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Zips `paths` into `destination`.
    ///
    /// Directories become top-level folders in the archive; see
    /// [`resolve`](crate::resolve::resolve) for the naming rules.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidExtension` before touching the filesystem when
    /// `destination` does not carry a registered extension. Otherwise
    /// returns whatever [`write_archive`] reports.
    pub fn zip<P: AsRef<Path>>(
        &self,
        paths: &[P],
        destination: impl AsRef<Path>,
        policy: Option<&dyn NamingPolicy>,
        options: &WriteOptions,
        progress: &mut dyn ProgressCallback,
    ) -> Result<WriteReport> {
        let destination = destination.as_ref();
        self.check_extension(destination)?;
        let entries = resolve(paths, policy);
        write_archive(&entries, destination, options, progress)
    }

    /// Unzips `archive` into `destination`.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidExtension` before touching the filesystem when
    /// `archive` does not carry a registered extension. Otherwise returns
    /// whatever [`extract_archive`] reports.
    pub fn unzip(
        &self,
        archive: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        options: &ExtractOptions,
        progress: &mut dyn ProgressCallback,
    ) -> Result<ExtractionReport> {
        let archive = archive.as_ref();
        self.check_extension(archive)?;
        extract_archive(archive, destination.as_ref(), options, progress)
    }

    /// Zips `paths` into `<output root>/<name>.zip` and returns that path.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidConfiguration` when `name` is not a plain file
    /// name, and otherwise as [`zip`](Self::zip) does.
    pub fn quick_zip<P: AsRef<Path>>(&self, paths: &[P], name: &str) -> Result<PathBuf> {
        self.quick_zip_with(paths, name, None, &WriteOptions::default(), &mut NoopProgress)
            .map(|report| report.archive_path)
    }

    /// Like [`quick_zip`](Self::quick_zip) with a naming policy, explicit
    /// options and progress.
    pub fn quick_zip_with<P: AsRef<Path>>(
        &self,
        paths: &[P],
        name: &str,
        policy: Option<&dyn NamingPolicy>,
        options: &WriteOptions,
        progress: &mut dyn ProgressCallback,
    ) -> Result<WriteReport> {
        let destination = self.quick_zip_destination(name)?;
        std::fs::create_dir_all(&self.output_root)?;
        tracing::debug!(archive = %destination.display(), "quick zip destination");
        self.zip(paths, &destination, policy, options, progress)
    }

    /// Unzips `archive` into `<output root>/<archive stem>` and returns that
    /// directory.
    ///
    /// Existing files in that directory are replaced.
    pub fn quick_unzip(
        &self,
        archive: impl AsRef<Path>,
        progress: &mut dyn ProgressCallback,
    ) -> Result<PathBuf> {
        let options = ExtractOptions::default().with_overwrite(true);
        self.quick_unzip_with(archive, &options, progress)
            .map(|report| report.destination)
    }

    /// Like [`quick_unzip`](Self::quick_unzip) with explicit options.
    pub fn quick_unzip_with(
        &self,
        archive: impl AsRef<Path>,
        options: &ExtractOptions,
        progress: &mut dyn ProgressCallback,
    ) -> Result<ExtractionReport> {
        let archive = archive.as_ref();
        self.check_extension(archive)?;
        let destination = self.quick_unzip_destination(archive);
        tracing::debug!(destination = %destination.display(), "quick unzip destination");
        extract_archive(archive, &destination, options, progress)
    }

    /// Path [`quick_zip`](Self::quick_zip) writes to for `name`.
    ///
    /// `.zip` is appended unless `name` already ends in a registered
    /// extension.
    pub fn quick_zip_destination(&self, name: &str) -> Result<PathBuf> {
        let trimmed = name.trim();
        let is_plain = !trimmed.is_empty()
            && trimmed != "."
            && trimmed != ".."
            && !trimmed.contains(['/', '\\']);
        if !is_plain {
            return Err(ArchiveError::InvalidConfiguration {
                reason: format!("archive name must be a plain file name, got {name:?}"),
            });
        }

        let file_name = if self.registry.path_is_invalid(Path::new(trimmed)) {
            format!("{trimmed}.zip")
        } else {
            trimmed.to_string()
        };
        Ok(self.output_root.join(file_name))
    }

    /// Directory [`quick_unzip`](Self::quick_unzip) extracts `archive` into.
    pub fn quick_unzip_destination(&self, archive: &Path) -> PathBuf {
        let stem = archive
            .file_stem()
            .map_or_else(|| "archive".into(), |stem| stem.to_os_string());
        self.output_root.join(stem)
    }

    fn check_extension(&self, path: &Path) -> Result<()> {
        if self.registry.path_is_invalid(path) {
            return Err(ArchiveError::InvalidExtension {
                path: path.to_path_buf(),
                extension: path
                    .extension()
                    .map(|ext| ext.to_string_lossy().into_owned()),
            });
        }
        Ok(())
    }
}

/// Zips `paths` into `destination` using the global registry.
///
/// # Examples
///
/// ```no_run
/// use quickzip_core::NoopProgress;
/// use quickzip_core::WriteOptions;
///
/// quickzip_core::zip(
///     &["photos", "notes.txt"],
///     "backup.zip",
///     None,
///     &WriteOptions::default().with_password("secret"),
///     &mut NoopProgress,
/// )?;
/// # Ok::<(), quickzip_core::ArchiveError>(())
/// ```
pub fn zip<P: AsRef<Path>>(
    paths: &[P],
    destination: impl AsRef<Path>,
    policy: Option<&dyn NamingPolicy>,
    options: &WriteOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<WriteReport> {
    Archiver::new().zip(paths, destination, policy, options, progress)
}

/// Unzips `archive` into `destination` using the global registry.
pub fn unzip(
    archive: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    Archiver::new().unzip(archive, destination, options, progress)
}

/// Zips `paths` into `<default output root>/<name>.zip`.
pub fn quick_zip<P: AsRef<Path>>(paths: &[P], name: &str) -> Result<PathBuf> {
    Archiver::new().quick_zip(paths, name)
}

/// Unzips `archive` into `<default output root>/<archive stem>`.
pub fn quick_unzip(
    archive: impl AsRef<Path>,
    progress: &mut dyn ProgressCallback,
) -> Result<PathBuf> {
    Archiver::new().quick_unzip(archive, progress)
}

/// Returns `true` if `extension` is recognized by the global registry.
#[must_use]
pub fn is_valid_file_extension(extension: &str) -> bool {
    ExtensionRegistry::global().is_valid(extension)
}

/// Adds `extension` to the global registry.
pub fn add_custom_file_extension(extension: &str) {
    ExtensionRegistry::global().add(extension);
}

/// Removes `extension` from the global registry. Defaults are unaffected.
pub fn remove_custom_file_extension(extension: &str) {
    ExtensionRegistry::global().remove(extension);
}

/// Returns `true` when `extension` is absent or not recognized.
#[must_use]
pub fn file_extension_is_invalid(extension: Option<&str>) -> bool {
    ExtensionRegistry::global().file_extension_is_invalid(extension)
}
