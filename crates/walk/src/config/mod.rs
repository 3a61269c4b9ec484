//! Per-run and per-directory configuration.
//!
//! [`RepoRootConfig`] is fixed for a run. [`Config`] is the per-directory
//! view handed to configurers and visitors: it shares the root settings,
//! carries the directory's resolved [`WalkConfig`] and a typed extension map
//! that other configurers may extend copy-on-write.

mod configurer;
mod directive;
mod walk_config;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use configurer::{Configurer, EXCLUDE_FLAG, WalkConfigurer};
pub use directive::{Directive, GenerationMode, WALK_DIRECTIVES, WalkDirective};
pub use walk_config::WalkConfig;

/// Build-file names looked up when nothing else is configured.
pub const DEFAULT_BUILD_FILE_NAMES: [&str; 2] = ["BUILD.bazel", "BUILD"];

/// Comment prefix that marks a directive, as in `# gazelle:exclude x`.
pub const DEFAULT_DIRECTIVE_PREFIX: &str = "gazelle";

/// Settings fixed for the whole run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepoRootConfig {
    /// Absolute path of the repository root.
    pub repo_root: PathBuf,
    /// Build-file names looked up at the repository root, in priority order.
    pub build_file_names: Vec<String>,
    /// Whether existing build files are read at all.
    pub read_build_files: bool,
    /// Alternative tree to read build files from, mirroring the repository
    /// layout.
    pub read_build_files_dir: Option<PathBuf>,
    /// Directive comment prefix.
    pub directive_prefix: String,
    /// Name of the flat ignore file at the repository root.
    pub flat_ignore_file: String,
    /// Name of the repo-metadata file at the repository root.
    pub repo_file: String,
}

impl RepoRootConfig {
    /// Creates the default settings for `repo_root`.
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            build_file_names: DEFAULT_BUILD_FILE_NAMES.map(str::to_owned).to_vec(),
            read_build_files: true,
            read_build_files_dir: None,
            directive_prefix: DEFAULT_DIRECTIVE_PREFIX.to_owned(),
            flat_ignore_file: filters::DEFAULT_FLAT_IGNORE_FILE.to_owned(),
            repo_file: filters::DEFAULT_REPO_FILE.to_owned(),
        }
    }

    /// Replaces the build-file names.
    pub fn with_build_file_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.build_file_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables reading existing build files.
    pub fn with_read_build_files(mut self, read: bool) -> Self {
        self.read_build_files = read;
        self
    }

    /// Reads build files from `dir` instead of the repository.
    pub fn with_read_build_files_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.read_build_files_dir = Some(dir.into());
        self
    }

    /// Replaces the directive comment prefix.
    pub fn with_directive_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.directive_prefix = prefix.into();
        self
    }
}

#[derive(Clone, Default)]
struct Extensions {
    values: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

/// Configuration of one directory.
///
/// Cloning is cheap; a child directory starts from a clone of its parent's
/// `Config`, so extension values set by a configurer are inherited until a
/// descendant replaces them.
#[derive(Clone)]
pub struct Config {
    root: Arc<RepoRootConfig>,
    walk: Arc<WalkConfig>,
    extensions: Extensions,
}

impl Config {
    /// Creates the root configuration for a run.
    pub fn new(root: RepoRootConfig) -> Self {
        let walk = WalkConfig::new(root.build_file_names.iter().cloned());
        Self {
            root: Arc::new(root),
            walk: Arc::new(walk),
            extensions: Extensions::default(),
        }
    }

    /// Shared per-run settings.
    pub fn root(&self) -> &RepoRootConfig {
        &self.root
    }

    /// Repository root path.
    pub fn repo_root(&self) -> &Path {
        &self.root.repo_root
    }

    /// Walker settings of this directory.
    pub fn walk(&self) -> &WalkConfig {
        &self.walk
    }

    /// Shared handle to the walker settings.
    pub fn walk_arc(&self) -> Arc<WalkConfig> {
        Arc::clone(&self.walk)
    }

    /// Mutable walker settings, copied first if shared.
    pub fn walk_mut(&mut self) -> &mut WalkConfig {
        Arc::make_mut(&mut self.walk)
    }

    pub(crate) fn set_walk(&mut self, walk: Arc<WalkConfig>) {
        self.walk = walk;
    }

    /// Returns the extension value of type `T`, if one was set.
    pub fn ext<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.extensions
            .values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Sets the extension value of type `T` for this directory and, through
    /// cloning, its descendants.
    pub fn set_ext<T: Any + Send + Sync>(&mut self, value: T) {
        self.extensions
            .values
            .insert(TypeId::of::<T>(), Arc::new(value));
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("repo_root", &self.root.repo_root)
            .field("walk", &self.walk)
            .field("extensions", &self.extensions.values.len())
            .finish()
    }
}
