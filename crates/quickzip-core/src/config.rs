//! Options for writing and extracting archives.

use std::path::PathBuf;

use crate::ArchiveError;
use crate::Result;
use crate::progress::CancellationToken;

/// Environment variable overriding the root used by quick operations.
pub const OUTPUT_ROOT_ENV: &str = "QUICKZIP_HOME";

/// Entry encryption used when a password is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptionMethod {
    /// WinZip AES with a 256-bit key.
    #[default]
    Aes256,
    /// Traditional PKWARE encryption, readable by legacy tools but weak.
    ZipCrypto,
}

/// Configuration for archive creation.
///
/// # Examples
///
/// ```
/// use quickzip_core::WriteOptions;
///
/// let options = WriteOptions::default()
///     .with_password("hunter2")
///     .with_compression_level(9);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Password used to encrypt every entry. `None` writes plain entries.
    pub password: Option<String>,

    /// Encryption applied when `password` is set.
    ///
    /// Default: `EncryptionMethod::Aes256`.
    pub encryption: EncryptionMethod,

    /// Compression level: `0` stores entries, `1..=9` deflates them.
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,

    /// Store Unix permission bits of source files.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,

    /// Token checked before each entry.
    pub cancellation: Option<CancellationToken>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            password: None,
            encryption: EncryptionMethod::default(),
            compression_level: Some(6),
            preserve_permissions: true,
            cancellation: None,
        }
    }
}

impl WriteOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets or clears the password.
    #[must_use]
    pub fn with_optional_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    /// Sets the encryption method.
    #[must_use]
    pub fn with_encryption(mut self, encryption: EncryptionMethod) -> Self {
        self.encryption = encryption;
        self
    }

    /// Sets the compression level.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Sets whether permission bits are stored.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && level > 9
        {
            return Err(ArchiveError::InvalidConfiguration {
                reason: format!("compression level must be 0-9, got {level}"),
            });
        }
        if self.password.as_deref() == Some("") {
            return Err(ArchiveError::InvalidConfiguration {
                reason: "password must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration for archive extraction.
///
/// # Examples
///
/// ```
/// use quickzip_core::ExtractOptions;
///
/// let options = ExtractOptions::default().with_overwrite(true);
/// assert!(options.overwrite);
/// assert!(options.password.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Replace files that already exist at the destination.
    ///
    /// When `false`, colliding file entries are skipped.
    ///
    /// Default: `false`.
    pub overwrite: bool,

    /// Password for encrypted entries.
    pub password: Option<String>,

    /// Restore Unix permission bits stored in the archive.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,

    /// Token checked before each entry.
    pub cancellation: Option<CancellationToken>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            password: None,
            preserve_permissions: true,
            cancellation: None,
        }
    }
}

impl ExtractOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether existing files are replaced.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets or clears the password.
    #[must_use]
    pub fn with_optional_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    /// Sets whether permission bits are restored.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Root directory for quick zip/unzip output.
///
/// `$QUICKZIP_HOME` when set and non-empty, otherwise `<temp dir>/quickzip`.
#[must_use]
pub fn default_output_root() -> PathBuf {
    std::env::var_os(OUTPUT_ROOT_ENV)
        .filter(|value| !value.is_empty())
        .map_or_else(|| std::env::temp_dir().join("quickzip"), PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_defaults() {
        let options = WriteOptions::default();
        assert_eq!(options.compression_level, Some(6));
        assert_eq!(options.encryption, EncryptionMethod::Aes256);
        assert!(options.password.is_none());
        assert!(options.preserve_permissions);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_write_builder() {
        let options = WriteOptions::new()
            .with_password("secret")
            .with_encryption(EncryptionMethod::ZipCrypto)
            .with_compression_level(0)
            .with_preserve_permissions(false);
        assert_eq!(options.password.as_deref(), Some("secret"));
        assert_eq!(options.encryption, EncryptionMethod::ZipCrypto);
        assert_eq!(options.compression_level, Some(0));
        assert!(!options.preserve_permissions);
    }

    #[test]
    fn test_write_rejects_bad_level() {
        let options = WriteOptions::default().with_compression_level(10);
        assert!(matches!(
            options.validate(),
            Err(ArchiveError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_write_rejects_empty_password() {
        let options = WriteOptions::default().with_password("");
        assert!(options.validate().is_err());
        let options = WriteOptions::default().with_optional_password(None);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_extract_defaults() {
        let options = ExtractOptions::default();
        assert!(!options.overwrite);
        assert!(options.password.is_none());
        assert!(options.preserve_permissions);
        assert!(options.cancellation.is_none());
    }

    #[test]
    fn test_extract_builder() {
        let token = CancellationToken::new();
        let options = ExtractOptions::new()
            .with_overwrite(true)
            .with_password("pw")
            .with_cancellation(token.clone());
        assert!(options.overwrite);
        assert_eq!(options.password.as_deref(), Some("pw"));
        token.cancel();
        assert!(options.cancellation.is_some_and(|t| t.is_cancelled()));
    }

    #[test]
    fn test_default_output_root_is_absolute() {
        assert!(default_output_root().is_absolute() || std::env::var_os(OUTPUT_ROOT_ENV).is_some());
    }
}
