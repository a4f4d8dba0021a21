//! Naming policies applied to resolved entries.

use std::path::Path;

/// Renames or excludes files while their archive entries are being resolved.
///
/// `candidate` is the entry name computed so far (for files found inside an
/// input directory it includes that directory's own name as first segment).
/// `containing_dir` is the absolute path of the directory that directly
/// contains the file. Returning `None` excludes the file from the archive.
///
/// Any `Fn(&str, &Path) -> Option<String>` closure is a policy:
///
/// ```
/// use quickzip_core::NamingPolicy;
/// use std::path::Path;
///
/// let skip_logs = |name: &str, _dir: &Path| {
///     (!name.ends_with(".log")).then(|| name.to_string())
/// };
/// assert_eq!(skip_logs.apply("a/b.txt", Path::new("/x/a")), Some("a/b.txt".to_string()));
/// assert_eq!(skip_logs.apply("a/b.log", Path::new("/x/a")), None);
/// ```
pub trait NamingPolicy {
    /// Returns the final entry name, or `None` to exclude the file.
    fn apply(&self, candidate: &str, containing_dir: &Path) -> Option<String>;
}

impl<F> NamingPolicy for F
where
    F: Fn(&str, &Path) -> Option<String>,
{
    fn apply(&self, candidate: &str, containing_dir: &Path) -> Option<String> {
        self(candidate, containing_dir)
    }
}

/// Policy that keeps every candidate name unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepNames;

impl NamingPolicy for KeepNames {
    fn apply(&self, candidate: &str, _containing_dir: &Path) -> Option<String> {
        Some(candidate.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_names() {
        assert_eq!(
            KeepNames.apply("dir/file.txt", Path::new("/tmp/dir")),
            Some("dir/file.txt".to_string())
        );
    }

    #[test]
    fn test_closure_policy_rename() {
        let policy = |name: &str, _: &Path| {
            name.strip_suffix(".txt").map(|stem| format!("{stem}_b.txt"))
        };
        assert_eq!(
            policy.apply("files/file1.txt", Path::new("/tmp/files")),
            Some("files/file1_b.txt".to_string())
        );
        assert_eq!(policy.apply("files/image.gif", Path::new("/tmp/files")), None);
    }

    #[test]
    fn test_policy_as_trait_object() {
        let policy: &dyn NamingPolicy = &|name: &str, dir: &Path| {
            dir.ends_with("keep").then(|| name.to_string())
        };
        assert!(policy.apply("keep/a", Path::new("/x/keep")).is_some());
        assert!(policy.apply("drop/a", Path::new("/x/drop")).is_none());
    }
}
