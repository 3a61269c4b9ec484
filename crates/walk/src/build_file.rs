//! Build-file descriptor and the loader interface that produces it.

use std::path::{Path, PathBuf};

use crate::{BuildFileError, Directive};

/// Output attribute declared by a rule in a build file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeclaredOutput {
    /// `out = "name"`
    Single(String),
    /// `outs = ["a", "b"]`
    Multiple(Vec<String>),
}

impl DeclaredOutput {
    /// Output names in declaration order.
    pub fn names(&self) -> &[String] {
        match self {
            Self::Single(name) => std::slice::from_ref(name),
            Self::Multiple(names) => names,
        }
    }
}

/// Parsed view of a directory's build file.
///
/// Only what the walker needs is kept: directives in file order and the
/// declared outputs of the file's rules.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildFile {
    /// Storage path the file was read from.
    pub path: PathBuf,
    /// Package (repo-relative directory) the file belongs to.
    pub pkg: String,
    /// Directives in file order.
    pub directives: Vec<Directive>,
    /// Declared outputs in file order.
    pub outputs: Vec<DeclaredOutput>,
}

impl BuildFile {
    /// Creates an empty descriptor.
    pub fn new(path: impl Into<PathBuf>, pkg: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            pkg: pkg.into(),
            directives: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Every declared output name in file order, duplicates included.
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.outputs
            .iter()
            .flat_map(DeclaredOutput::names)
            .map(String::as_str)
    }
}

/// What a [`BuildFileLoader`] is asked to load.
#[derive(Clone, Copy, Debug)]
pub struct BuildFileRequest<'a> {
    /// Directory to look in.
    pub dir: &'a Path,
    /// Repo-relative package path.
    pub rel: &'a str,
    /// Candidate file names in priority order.
    pub names: &'a [String],
    /// Names of the non-directory entries of `dir`, sorted.
    pub entries: &'a [String],
}

impl BuildFileRequest<'_> {
    /// First candidate name present among the entries.
    pub fn matching_name(&self) -> Option<&str> {
        self.names
            .iter()
            .find(|&name| self.entries.binary_search(name).is_ok())
            .map(String::as_str)
    }
}

/// Source of build-file descriptors.
///
/// Called from prefetch workers, so implementations must be thread safe.
pub trait BuildFileLoader: Send + Sync {
    /// Loads the build file for `request`.
    ///
    /// Returns `Ok(None)` when the directory has no build file.
    fn load(&self, request: &BuildFileRequest<'_>) -> Result<Option<BuildFile>, BuildFileError>;
}
