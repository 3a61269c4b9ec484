#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` traverses a repository on behalf of a build-file generator. It
//! decides which directories are entered, resolves each directory's
//! configuration from its ancestors' build-file directives, and hands every
//! reported directory to a [`Visitor`] together with its files, its build
//! file and whether the generator may update it.
//!
//! # Design
//!
//! - [`WalkBuilder`] collects the root [`Config`], the [`Configurer`] chain,
//!   the requested roots and the [`Mode`], then runs the walk.
//! - Directories are loaded at most once into a single-flight [`DirCache`].
//!   With the `parallel` feature (on by default) a bounded rayon pool fills
//!   the cache before the serial passes start.
//! - The configure pass resolves configurations top-down; the visit pass
//!   calls the visitor bottom-up. Both run on the calling thread.
//! - Directive effects live in [`WalkConfig`]; ignore sources and glob
//!   matching come from the `filters` crate.
//!
//! # Invariants
//!
//! - A directory's configuration is resolved after its parent's and never
//!   changes afterwards.
//! - The visitor sees each reported directory once, after all of its entered
//!   subdirectories, siblings in name order.
//! - The configure and visit passes read the same cache slots, so prefetching
//!   never changes what the visitor observes.
//!
//! # Errors
//!
//! [`WalkError`] stops a walk before any visitor call: a root outside the
//! repository, an unusable ignore source, or an unknown `generation_mode`
//! value in an entered directory. Everything else is a [`LoadError`] attached
//! to the directory it came from, delivered through [`DirVisit::errors`] and
//! collected in [`WalkSummary::errors`].
//!
//! # Examples
//!
//! Walk a small tree and record the post-order sequence of directories.
//!
//! ```
//! use walk::{Config, DirVisit, RepoRootConfig, WalkBuilder, WalkConfigurer};
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! fs::create_dir_all(temp.path().join("lib/util"))?;
//! fs::write(temp.path().join("lib/BUILD.bazel"), "# gazelle:exclude *.tmp\n")?;
//! fs::write(temp.path().join("lib/a.go"), "")?;
//! fs::write(temp.path().join("lib/b.tmp"), "")?;
//!
//! let config = Config::new(RepoRootConfig::new(temp.path()));
//! let mut seen = Vec::new();
//! WalkBuilder::new(config)
//!     .configurer(&WalkConfigurer)
//!     .walk(&mut |visit: DirVisit<'_>| {
//!         seen.push((visit.rel.to_owned(), visit.regular_files.to_vec()));
//!     })?;
//!
//! assert_eq!(seen[0].0, "lib/util");
//! assert_eq!(seen[1], ("lib".to_owned(), vec!["BUILD.bazel".to_owned(), "a.go".to_owned()]));
//! assert_eq!(seen[2].0, "");
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```
//!
//! # See also
//!
//! - [`filters`] for the glob matcher and the repository ignore set.
//! - [`logging`] for the trace targets used throughout this crate.

mod build_file;
mod builder;
mod cache;
mod config;
mod dir_info;
mod error;
mod mode;
#[cfg(feature = "parallel")]
mod prefetch;
mod scanner;
mod visit;
mod walker;

pub use build_file::{BuildFile, BuildFileLoader, BuildFileRequest, DeclaredOutput};
pub use builder::{DEFAULT_PREFETCH_WORKERS, WalkBuilder, walk};
pub use cache::DirCache;
pub use config::{
    Config, Configurer, DEFAULT_BUILD_FILE_NAMES, DEFAULT_DIRECTIVE_PREFIX, Directive,
    EXCLUDE_FLAG, GenerationMode, RepoRootConfig, WALK_DIRECTIVES, WalkConfig, WalkConfigurer,
    WalkDirective,
};
pub use dir_info::{DirResult, DirectoryInfo};
pub use error::{
    BuildFileError, ConfigError, DirectoryError, LoadError, LoadFailure, WalkError,
};
pub use mode::{Mode, ParseModeError};
pub use scanner::DirectiveScanner;
pub use visit::{DirVisit, Visitor};
pub use walker::WalkSummary;
