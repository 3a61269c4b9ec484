use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use filters::{IgnoreSet, path};
use logging::trace_walk;

use crate::cache::DirCache;
use crate::dir_info::DirLoader;
use crate::error::WalkError;
use crate::mode::UpdatePolicy;
use crate::walker::{Driver, WalkSummary};
use crate::{BuildFileLoader, Config, Configurer, DirectiveScanner, Mode, Visitor};

/// Number of prefetch workers used unless configured otherwise.
pub const DEFAULT_PREFETCH_WORKERS: usize = 6;

/// Configures and runs a walk over a repository.
///
/// The builder owns the root [`Config`], usually produced by running the
/// configurers' [`check_flags`](Configurer::check_flags) over parsed
/// command-line flags.
///
/// ```no_run
/// use walk::{Config, DirVisit, Mode, RepoRootConfig, WalkBuilder, WalkConfigurer};
///
/// # fn demo() -> Result<(), walk::WalkError> {
/// let config = Config::new(RepoRootConfig::new("/path/to/repo"));
/// let summary = WalkBuilder::new(config)
///     .configurer(&WalkConfigurer)
///     .root("pkg")
///     .mode(Mode::UpdateSubdirs)
///     .walk(&mut |visit: DirVisit<'_>| {
///         println!("{} update={}", visit.rel, visit.update);
///     })?;
/// assert!(summary.visited > 0);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub struct WalkBuilder<'a> {
    config: Config,
    configurers: Vec<&'a dyn Configurer>,
    roots: Vec<PathBuf>,
    mode: Mode,
    prefetch_workers: usize,
    build_files: Option<&'a dyn BuildFileLoader>,
}

impl<'a> WalkBuilder<'a> {
    /// Creates a builder that walks the whole repository of `config`.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            configurers: Vec::new(),
            roots: Vec::new(),
            mode: Mode::default(),
            prefetch_workers: DEFAULT_PREFETCH_WORKERS,
            build_files: None,
        }
    }

    /// Appends a configurer to the chain.
    pub fn configurer(mut self, configurer: &'a dyn Configurer) -> Self {
        self.configurers.push(configurer);
        self
    }

    /// Appends several configurers to the chain, in order.
    pub fn configurers<I>(mut self, configurers: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn Configurer>,
    {
        self.configurers.extend(configurers);
        self
    }

    /// Adds a requested root.
    ///
    /// Absolute paths must lie under the repository root; relative paths are
    /// taken relative to it. Without any root the repository root itself is
    /// requested.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Adds several requested roots.
    pub fn roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.roots.extend(roots.into_iter().map(Into::into));
        self
    }

    /// Selects which directories are entered and updated.
    pub const fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the number of prefetch workers; zero disables prefetching.
    ///
    /// Without the `parallel` feature there is no prefetch phase and this
    /// setting has no effect.
    pub const fn prefetch_workers(mut self, workers: usize) -> Self {
        self.prefetch_workers = workers;
        self
    }

    /// Replaces the default [`DirectiveScanner`].
    pub fn build_file_loader(mut self, loader: &'a dyn BuildFileLoader) -> Self {
        self.build_files = Some(loader);
        self
    }

    /// Runs the walk, calling `visitor` for each reported directory.
    ///
    /// # Errors
    ///
    /// Fails before any visitor call if a root is outside the repository, an
    /// ignore source is unusable, or an entered directory declares an
    /// unknown generation mode. Other problems are reported per directory.
    pub fn walk<V>(self, visitor: &mut V) -> Result<WalkSummary, WalkError>
    where
        V: Visitor + ?Sized,
    {
        let Self {
            mut config,
            configurers,
            roots,
            mode,
            prefetch_workers,
            build_files,
        } = self;

        let roots = resolve_roots(config.repo_root(), &roots)?;
        let ignored = IgnoreSet::load_with(
            config.repo_root(),
            &config.root().flat_ignore_file,
            &config.root().repo_file,
        )?;
        config.walk_mut().set_ignored(Arc::new(ignored));
        trace_walk!(
            "walking {} in {mode} mode from {roots:?}",
            config.repo_root().display()
        );

        let scanner = DirectiveScanner::new(config.root().directive_prefix.clone());
        let loader = DirLoader {
            root: config.root(),
            root_walk: config.walk_arc(),
            build_files: match build_files {
                Some(build_files) => build_files,
                None => &scanner,
            },
            cache: DirCache::new(),
        };
        let policy = UpdatePolicy::new(mode, roots);

        prefetch(&loader, &policy, prefetch_workers);

        Driver {
            loader: &loader,
            policy: &policy,
            configurers: &configurers,
        }
        .run(&config, visitor)
    }
}

/// Walks the repository of `config` with the default settings for `roots`.
///
/// Shorthand for [`WalkBuilder`] with the given configurers, roots and mode.
///
/// # Errors
///
/// See [`WalkBuilder::walk`].
pub fn walk<V, P>(
    config: Config,
    configurers: &[&dyn Configurer],
    roots: impl IntoIterator<Item = P>,
    mode: Mode,
    visitor: &mut V,
) -> Result<WalkSummary, WalkError>
where
    V: Visitor + ?Sized,
    P: Into<PathBuf>,
{
    WalkBuilder::new(config)
        .configurers(configurers.iter().copied())
        .roots(roots)
        .mode(mode)
        .walk(visitor)
}

#[cfg(feature = "parallel")]
fn prefetch(loader: &DirLoader<'_>, policy: &UpdatePolicy, workers: usize) {
    if workers > 0 {
        crate::prefetch::prefetch(loader, policy, workers);
    }
}

#[cfg(not(feature = "parallel"))]
fn prefetch(_loader: &DirLoader<'_>, _policy: &UpdatePolicy, _workers: usize) {}

/// Converts requested roots to sorted, distinct repo-relative paths.
fn resolve_roots(repo_root: &Path, roots: &[PathBuf]) -> Result<Vec<String>, WalkError> {
    let mut resolved = roots
        .iter()
        .map(|root| resolve_root(repo_root, root))
        .collect::<Result<Vec<_>, _>>()?;
    if resolved.is_empty() {
        resolved.push(String::new());
    }
    resolved.sort();
    resolved.dedup();
    Ok(resolved)
}

fn resolve_root(repo_root: &Path, root: &Path) -> Result<String, WalkError> {
    let outside = || WalkError::RootOutsideRepo {
        root: root.to_path_buf(),
        repo_root: repo_root.to_path_buf(),
    };
    let relative = if root.is_absolute() {
        root.strip_prefix(repo_root).map_err(|_| outside())?
    } else {
        root
    };

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
            Component::ParentDir => segments.push("..".to_owned()),
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return Err(outside()),
        }
    }
    let rel = path::join("", &segments.join("/"));
    if rel == ".." || rel.starts_with("../") {
        return Err(outside());
    }
    Ok(rel)
}
