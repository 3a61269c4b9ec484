use std::fs;
use std::io;
use std::path::Path;

use logging::trace_ignore;

use crate::flat_ignore::FlatIgnore;
use crate::{IgnoreError, PatternSet, repo_ignore};

/// Default name of the flat ignore file at the repository root.
pub const DEFAULT_FLAT_IGNORE_FILE: &str = ".bazelignore";

/// Default name of the repo-metadata file at the repository root.
pub const DEFAULT_REPO_FILE: &str = "REPO.bazel";

/// Repository-wide ignore predicate.
///
/// The union of the flat ignore file (exact paths and their subtrees) and the
/// `ignore_directories` globs declared in the repo-metadata file. Built once
/// per walk and shared read-only afterwards.
///
/// # Examples
///
/// ```
/// use filters::IgnoreSet;
///
/// let ignored = IgnoreSet::from_sources("./dir3/\n", "ignore_directories([\"**/out\"])")
///     .unwrap();
/// assert!(ignored.is_ignored("dir3/x.go"));
/// assert!(ignored.is_ignored("pkg/out"));
/// assert!(!ignored.is_ignored("pkg/src"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct IgnoreSet {
    flat: FlatIgnore,
    directories: PatternSet,
}

impl IgnoreSet {
    /// Returns a set that ignores nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads both sources from `repo_root` using the default file names.
    pub fn load(repo_root: &Path) -> Result<Self, IgnoreError> {
        Self::load_with(repo_root, DEFAULT_FLAT_IGNORE_FILE, DEFAULT_REPO_FILE)
    }

    /// Loads both sources from `repo_root` using the given file names.
    ///
    /// A missing file contributes nothing. A file that exists but cannot be
    /// read, or a malformed repo-metadata file, is an error.
    pub fn load_with(
        repo_root: &Path,
        flat_name: &str,
        repo_name: &str,
    ) -> Result<Self, IgnoreError> {
        let flat_path = repo_root.join(flat_name);
        let flat = read_optional(&flat_path)?
            .map(|contents| FlatIgnore::parse(&contents))
            .unwrap_or_default();

        let repo_path = repo_root.join(repo_name);
        let directories = match read_optional(&repo_path)? {
            Some(contents) => repo_ignore::parse(&repo_path, &contents)?,
            None => PatternSet::new(),
        };

        trace_ignore!(
            "ignore set for {}: {} paths, {} directory patterns",
            repo_root.display(),
            flat.len(),
            directories.len()
        );
        Ok(Self { flat, directories })
    }

    /// Builds the set from in-memory source text.
    pub fn from_sources(flat: &str, repo: &str) -> Result<Self, IgnoreError> {
        Ok(Self {
            flat: FlatIgnore::parse(flat),
            directories: repo_ignore::parse(Path::new(DEFAULT_REPO_FILE), repo)?,
        })
    }

    /// Returns true if the repo-relative path `rel` is ignored.
    pub fn is_ignored(&self, rel: &str) -> bool {
        self.flat.is_ignored(rel) || self.directories.is_match(rel)
    }

    /// Returns true if neither source contributed anything.
    pub fn is_empty(&self) -> bool {
        self.flat.is_empty() && self.directories.is_empty()
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, IgnoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(IgnoreError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
