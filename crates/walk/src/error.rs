use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use filters::{IgnoreError, PatternError, SyntaxError};
use thiserror::Error;

/// Error produced by a [`BuildFileLoader`](crate::BuildFileLoader).
#[derive(Debug, Error)]
pub enum BuildFileError {
    /// The build file exists but could not be read.
    #[error("failed to read build file {}: {source}", path.display())]
    Read {
        /// Path of the build file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The build file is not well formed.
    #[error("{}:{source}", path.display())]
    Syntax {
        /// Path of the build file.
        path: PathBuf,
        /// Position and description of the problem.
        #[source]
        source: SyntaxError,
    },
}

/// Configuration error.
///
/// [`UnknownGenerationMode`](Self::UnknownGenerationMode) found while loading
/// a directory aborts the walk.
#[derive(Clone, Debug, Error)]
pub enum ConfigError {
    /// A `generation_mode` directive named neither `update_only` nor
    /// `create_and_update`.
    #[error("unknown generation_mode {value:?} in //{pkg}")]
    UnknownGenerationMode {
        /// Value given to the directive.
        value: String,
        /// Package that declared it.
        pkg: String,
    },
    /// A pattern passed with `--exclude` is malformed.
    #[error("invalid --exclude pattern: {0}")]
    InvalidExcludeFlag(#[source] PatternError),
}

/// One reason a directory could not be loaded completely.
#[derive(Debug, Error)]
pub enum LoadFailure {
    /// The directory's entries could not be listed; it is treated as empty.
    #[error("failed to read directory {}: {source}", path.display())]
    ReadDir {
        /// Storage path of the directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The directory's build file could not be loaded; it is treated as absent.
    #[error(transparent)]
    BuildFile(#[from] BuildFileError),
    /// The directory's directives could not be applied.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything that went wrong while loading one directory.
///
/// Stored in the directory cache alongside the (partial) directory info so
/// every reader of the slot sees the same value.
#[derive(Debug)]
pub struct LoadError {
    rel: String,
    failures: Vec<LoadFailure>,
}

impl LoadError {
    pub(crate) fn new(rel: &str, failures: Vec<LoadFailure>) -> Self {
        Self {
            rel: rel.to_owned(),
            failures,
        }
    }

    /// Repo-relative path of the directory.
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// Individual failures, in the order they occurred.
    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// Returns the configuration error that must abort the walk, if any.
    pub fn fatal(&self) -> Option<&ConfigError> {
        self.failures.iter().find_map(|failure| match failure {
            LoadFailure::Config(error) => Some(error),
            _ => None,
        })
    }

    /// Returns true if the walk cannot continue past this directory.
    pub fn is_fatal(&self) -> bool {
        self.fatal().is_some()
    }

    /// Returns true if the directory's build file failed to load.
    pub fn build_file_failed(&self) -> bool {
        self.failures
            .iter()
            .any(|failure| matches!(failure, LoadFailure::BuildFile(_)))
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rel = if self.rel.is_empty() { "." } else { &self.rel };
        write!(f, "errors loading {rel}")?;
        for (index, failure) in self.failures.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|failure| failure as &(dyn std::error::Error + 'static))
    }
}

/// Error that stops a walk before any directory is visited.
#[derive(Debug, Error)]
pub enum WalkError {
    /// A repository ignore source exists but is unusable.
    #[error(transparent)]
    Ignore(#[from] IgnoreError),
    /// A directory declared an unknown generation mode.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A requested root is not inside the repository.
    #[error("{} is not inside the repository root {}", root.display(), repo_root.display())]
    RootOutsideRepo {
        /// Root as requested.
        root: PathBuf,
        /// Repository root.
        repo_root: PathBuf,
    },
}

/// Non-fatal load error attributed to the directory it came from.
#[derive(Clone, Debug)]
pub struct DirectoryError {
    /// Repo-relative path of the directory.
    pub rel: String,
    /// The directory's load error.
    pub error: Arc<LoadError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn load_error_joins_failures() {
        let error = LoadError::new(
            "pkg",
            vec![
                LoadFailure::ReadDir {
                    path: PathBuf::from("/repo/pkg"),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                },
                LoadFailure::BuildFile(BuildFileError::Syntax {
                    path: PathBuf::from("/repo/pkg/BUILD.bazel"),
                    source: SyntaxError {
                        line: 1,
                        column: 1,
                        message: "'(' is never closed".into(),
                    },
                }),
            ],
        );

        assert_eq!(
            error.to_string(),
            "errors loading pkg: failed to read directory /repo/pkg: denied; \
             /repo/pkg/BUILD.bazel:1:1: '(' is never closed"
        );
        assert!(error.build_file_failed());
        assert!(!error.is_fatal());
        assert!(error.source().is_some());
    }

    #[test]
    fn config_failure_is_fatal() {
        let error = LoadError::new(
            "",
            vec![LoadFailure::Config(ConfigError::UnknownGenerationMode {
                value: "sometimes".into(),
                pkg: String::new(),
            })],
        );
        assert!(error.is_fatal());
        assert_eq!(
            error.to_string(),
            "errors loading .: unknown generation_mode \"sometimes\" in //"
        );
    }
}
