//! Recognized archive file extensions.
//!
//! The registry keeps the built-in extensions (`zip`, `cbz`) apart from the
//! ones added at runtime, so removing a built-in never affects validity.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::RwLock;

/// Extensions that are always accepted, regardless of `add`/`remove` calls.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["zip", "cbz"];

static GLOBAL: LazyLock<Arc<ExtensionRegistry>> =
    LazyLock::new(|| Arc::new(ExtensionRegistry::new()));

/// Set of file extensions treated as valid archive extensions.
///
/// Comparisons are case-insensitive and ignore a single leading dot.
/// Mutation follows "last write wins"; readers always see a consistent set.
///
/// # Examples
///
/// ```
/// use quickzip_core::ExtensionRegistry;
///
/// let registry = ExtensionRegistry::new();
/// assert!(registry.is_valid("ZIP"));
///
/// registry.add("cstm");
/// assert!(registry.is_valid("cstm"));
///
/// registry.remove("zip");
/// assert!(registry.is_valid("zip"));
/// ```
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    custom: RwLock<BTreeSet<String>>,
}

impl ExtensionRegistry {
    /// Creates a registry containing only the default extensions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry used by the free facade functions.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Returns `true` if `extension` is a default or custom archive extension.
    pub fn is_valid(&self, extension: &str) -> bool {
        let key = normalize(extension);
        if key.is_empty() {
            return false;
        }
        if DEFAULT_EXTENSIONS.contains(&key.as_str()) {
            return true;
        }
        self.custom
            .read()
            .map_or_else(|poisoned| poisoned.into_inner().contains(&key), |set| set.contains(&key))
    }

    /// Registers a custom extension.
    ///
    /// Empty extensions are ignored.
    pub fn add(&self, extension: &str) {
        let key = normalize(extension);
        if key.is_empty() {
            return;
        }
        tracing::debug!(extension = %key, "registering custom archive extension");
        match self.custom.write() {
            Ok(mut set) => {
                set.insert(key);
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(key);
            }
        }
    }

    /// Unregisters a custom extension.
    ///
    /// Removing a default extension has no effect on its validity.
    pub fn remove(&self, extension: &str) {
        let key = normalize(extension);
        tracing::debug!(extension = %key, "removing custom archive extension");
        match self.custom.write() {
            Ok(mut set) => {
                set.remove(&key);
            }
            Err(poisoned) => {
                poisoned.into_inner().remove(&key);
            }
        }
    }

    /// Returns `true` when `candidate` is absent or not a valid extension.
    ///
    /// Used as an early guard before a path is treated as an archive.
    pub fn file_extension_is_invalid(&self, candidate: Option<&str>) -> bool {
        candidate.is_none_or(|ext| !self.is_valid(ext))
    }

    /// Checks the extension of `path`.
    pub fn path_is_invalid(&self, path: &Path) -> bool {
        self.file_extension_is_invalid(path.extension().and_then(|ext| ext.to_str()))
    }

    /// Returns the custom extensions currently registered, sorted.
    pub fn custom_extensions(&self) -> Vec<String> {
        self.custom.read().map_or_else(
            |poisoned| poisoned.into_inner().iter().cloned().collect(),
            |set| set.iter().cloned().collect(),
        )
    }
}

fn normalize(extension: &str) -> String {
    extension
        .trim()
        .strip_prefix('.')
        .unwrap_or_else(|| extension.trim())
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults_valid() {
        let registry = ExtensionRegistry::new();
        assert!(registry.is_valid("zip"));
        assert!(registry.is_valid("cbz"));
    }

    #[test]
    fn test_case_insensitive_and_leading_dot() {
        let registry = ExtensionRegistry::new();
        assert!(registry.is_valid("Zip"));
        assert!(registry.is_valid("CBZ"));
        assert!(registry.is_valid(".zip"));

        registry.add(".CsTm");
        assert!(registry.is_valid("cstm"));
        assert_eq!(registry.custom_extensions(), vec!["cstm".to_string()]);
    }

    #[test]
    fn test_unknown_invalid() {
        let registry = ExtensionRegistry::new();
        assert!(!registry.is_valid("xyz"));
        assert!(!registry.is_valid(""));
        assert!(!registry.is_valid("."));
    }

    #[test]
    fn test_custom_lifecycle() {
        let registry = ExtensionRegistry::new();
        registry.add("cstm");
        assert!(registry.is_valid("cstm"));
        registry.remove("cstm");
        assert!(!registry.is_valid("cstm"));
    }

    #[test]
    fn test_defaults_survive_removal() {
        let registry = ExtensionRegistry::new();
        registry.remove("zip");
        registry.remove("cbz");
        assert!(registry.is_valid("zip"));
        assert!(registry.is_valid("cbz"));
    }

    #[test]
    fn test_file_extension_is_invalid() {
        let registry = ExtensionRegistry::new();
        assert!(!registry.file_extension_is_invalid(Some("cbz")));
        assert!(registry.file_extension_is_invalid(Some("xyz")));
        assert!(registry.file_extension_is_invalid(None));
    }

    #[test]
    fn test_path_is_invalid() {
        let registry = ExtensionRegistry::new();
        assert!(!registry.path_is_invalid(Path::new("/tmp/archive.zip")));
        assert!(registry.path_is_invalid(Path::new("/tmp/image.gif")));
        assert!(registry.path_is_invalid(Path::new("/tmp/noext")));
    }

    #[test]
    fn test_global_is_shared() {
        let a = ExtensionRegistry::global();
        let b = ExtensionRegistry::global();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_valid("zip"));
    }
}
