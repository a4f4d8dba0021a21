//! Expansion of input paths into archive entries.
//!
//! Files map to their last path component. Directories are walked and every
//! descendant file maps to `<directory name>/<path relative to directory>`,
//! so the chosen directory always appears as a top-level folder in the
//! archive. Sub-directories never become entries of their own.

use std::ffi::OsStr;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::policy::NamingPolicy;

/// Where an entry name came from.
///
/// The writer validates names differently depending on their origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameOrigin {
    /// Computed from the file's path.
    Derived,
    /// Computed from a path with components that are not valid UTF-8. The
    /// stored name is a lossy rendering and can never be written as-is.
    NonUtf8,
    /// Returned by a naming policy or given by the caller.
    Supplied,
}

/// One file destined to become one archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    source: PathBuf,
    entry_name: String,
    origin: NameOrigin,
}

impl ResolvedPath {
    /// Pairs a source file with the name it gets inside the archive.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, entry_name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            entry_name: entry_name.into(),
            origin: NameOrigin::Supplied,
        }
    }

    /// Absolute filesystem path of the file to read.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Forward-slash separated name inside the archive.
    #[must_use]
    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    /// How [`entry_name`](Self::entry_name) was produced.
    #[must_use]
    pub fn origin(&self) -> NameOrigin {
        self.origin
    }
}

/// Resolves `paths` into a flat, ordered list of archive entries.
///
/// Input order is preserved. Files inside a directory follow the order the
/// filesystem reports them in, which is unspecified. When `policy` returns
/// `None` the file is left out entirely.
///
/// File names that are not valid UTF-8 still resolve, marked with
/// [`NameOrigin::NonUtf8`]; the writer rejects them before any I/O unless
/// a policy renamed them.
///
/// Missing paths do not fail here: a missing directory cannot be told apart
/// from a missing file, so it resolves to a single entry whose source fails
/// to open when the archive is written.
///
/// # Examples
///
/// ```no_run
/// use quickzip_core::resolve;
/// use std::path::Path;
///
/// let entries = resolve(&[Path::new("photos"), Path::new("notes.txt")], None);
/// for entry in &entries {
///     println!("{} -> {}", entry.source().display(), entry.entry_name());
/// }
/// ```
pub fn resolve<P: AsRef<Path>>(paths: &[P], policy: Option<&dyn NamingPolicy>) -> Vec<ResolvedPath> {
    let mut resolved = Vec::new();

    for path in paths {
        let path = absolute(path.as_ref());
        if path.is_dir() {
            expand_directory(&path, policy, &mut resolved);
        } else {
            let mut utf8 = true;
            let candidate = path
                .file_name()
                .map(|name| name_text(name, &mut utf8))
                .unwrap_or_default();
            let containing_dir = path.parent().unwrap_or(&path).to_path_buf();
            push_entry(
                &mut resolved,
                path,
                Candidate::new(candidate, utf8),
                &containing_dir,
                policy,
            );
        }
    }

    tracing::debug!(inputs = paths.len(), entries = resolved.len(), "resolved input paths");
    resolved
}

/// Walks `dir` without recursion on the call stack.
fn expand_directory(
    dir: &Path,
    policy: Option<&dyn NamingPolicy>,
    resolved: &mut Vec<ResolvedPath>,
) {
    let mut prefix_utf8 = true;
    let prefix = dir
        .file_name()
        .map(|name| name_text(name, &mut prefix_utf8));

    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        // Follows symlinks, so links to directories are neither walked nor emitted.
        if entry.path().is_dir() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let mut utf8 = prefix_utf8;
        let relative = to_entry_name(relative, &mut utf8);
        let candidate = match &prefix {
            Some(prefix) => format!("{prefix}/{relative}"),
            None => relative,
        };
        let containing_dir = entry.path().parent().unwrap_or(dir).to_path_buf();
        push_entry(
            resolved,
            entry.path().to_path_buf(),
            Candidate::new(candidate, utf8),
            &containing_dir,
            policy,
        );
    }
}

/// Name computed from the filesystem, before any policy runs.
struct Candidate {
    name: String,
    origin: NameOrigin,
}

impl Candidate {
    fn new(name: String, utf8: bool) -> Self {
        let origin = if utf8 {
            NameOrigin::Derived
        } else {
            NameOrigin::NonUtf8
        };
        Self { name, origin }
    }
}

fn push_entry(
    resolved: &mut Vec<ResolvedPath>,
    source: PathBuf,
    candidate: Candidate,
    containing_dir: &Path,
    policy: Option<&dyn NamingPolicy>,
) {
    let (entry_name, origin) = match policy {
        Some(policy) => match policy.apply(&candidate.name, containing_dir) {
            // A policy that keeps the name does not vouch for it.
            Some(name) if name == candidate.name => (name, candidate.origin),
            Some(name) => (name, NameOrigin::Supplied),
            None => {
                tracing::debug!(entry = %candidate.name, "excluded by naming policy");
                return;
            }
        },
        None => (candidate.name, candidate.origin),
    };
    if origin == NameOrigin::NonUtf8 {
        tracing::debug!(source = %source.display(), "file name is not valid UTF-8");
    }
    resolved.push(ResolvedPath {
        source,
        entry_name,
        origin,
    });
}

/// Returns `part` as text, clearing `utf8` if it had to be rendered lossily.
fn name_text(part: &OsStr, utf8: &mut bool) -> String {
    part.to_str().map_or_else(
        || {
            *utf8 = false;
            part.to_string_lossy().into_owned()
        },
        str::to_string,
    )
}

/// Joins the components of a relative path with forward slashes.
fn to_entry_name(relative: &Path, utf8: &mut bool) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(name_text(part, utf8)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Makes `path` absolute and drops `.`/`..` components lexically.
///
/// Symlinks are not resolved, so an input directory keeps the name the
/// caller gave it.
fn absolute(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
