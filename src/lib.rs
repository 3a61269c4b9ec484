#![deny(unsafe_code)]
#![deny(missing_docs)]

//! # Overview
//!
//! `buildwalk` is the facade over the workspace crates that make up the
//! repository walker of a build-file generator:
//!
//! - [`walk`] drives the traversal, resolves per-directory configuration and
//!   calls a visitor for each reported directory.
//! - [`filters`] provides glob matching, path helpers and the repository
//!   ignore set.
//! - [`logging`] holds the tracing targets and, with the `tracing` feature,
//!   subscriber installation.
//!
//! The most common items are re-exported at the crate root.
//!
//! # Examples
//!
//! ```
//! use buildwalk::{Config, DirVisit, Mode, RepoRootConfig, WalkBuilder, WalkConfigurer};
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! std::fs::create_dir(temp.path().join("pkg"))?;
//! std::fs::write(temp.path().join("pkg/main.go"), "")?;
//!
//! let mut updated = Vec::new();
//! WalkBuilder::new(Config::new(RepoRootConfig::new(temp.path())))
//!     .configurer(&WalkConfigurer)
//!     .root("pkg")
//!     .mode(Mode::UpdateDirs)
//!     .walk(&mut |visit: DirVisit<'_>| {
//!         if visit.update {
//!             updated.push(visit.rel.to_owned());
//!         }
//!     })?;
//! assert_eq!(updated, ["pkg"]);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

pub use filters;
pub use logging;
pub use walk;

pub use filters::{IgnoreSet, PatternSet};
pub use walk::{
    BuildFile, BuildFileLoader, Config, Configurer, DirVisit, DirectiveScanner, Mode,
    RepoRootConfig, Visitor, WalkBuilder, WalkConfig, WalkConfigurer, WalkError, WalkSummary,
};

#[cfg(feature = "tracing")]
pub use logging::init_tracing;
