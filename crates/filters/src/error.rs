use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error produced when a glob pattern cannot be compiled.
#[derive(Clone, Debug, Error)]
#[error("invalid glob pattern '{pattern}': {source}")]
pub struct PatternError {
    pattern: String,
    #[source]
    source: globset::Error,
}

impl PatternError {
    pub(crate) fn new(pattern: impl Into<String>, source: globset::Error) -> Self {
        Self {
            pattern: pattern.into(),
            source,
        }
    }

    /// Returns the offending pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Error produced while tokenizing build-language source.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{line}:{column}: {message}")]
pub struct SyntaxError {
    /// One-based line of the offending character.
    pub line: usize,
    /// One-based column of the offending character.
    pub column: usize,
    /// Description of the problem.
    pub message: String,
}

impl SyntaxError {
    pub(crate) fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Error produced while loading a repository ignore source.
///
/// A missing source is never an error; these variants describe a source that
/// exists but cannot be used.
#[derive(Debug, Error)]
pub enum IgnoreError {
    /// The file exists but could not be read.
    #[error("{} exists but couldn't be read: {source}", path.display())]
    Read {
        /// Path of the ignore source.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The repo-metadata file is not well formed.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Path of the ignore source.
        path: PathBuf,
        /// Position and description of the syntax problem.
        #[source]
        source: SyntaxError,
    },
    /// `ignore_directories` was called with other than one argument.
    #[error("{} ignore_directories() expects one argument, found {found}", path.display())]
    ArgumentCount {
        /// Path of the ignore source.
        path: PathBuf,
        /// Number of arguments supplied.
        found: usize,
    },
    /// `ignore_directories` was called with something other than a list.
    #[error("{} ignore_directories() unexpected argument type: {found}", path.display())]
    ArgumentType {
        /// Path of the ignore source.
        path: PathBuf,
        /// Kind of expression supplied instead of a list.
        found: &'static str,
    },
}

impl IgnoreError {
    /// Returns the path of the ignore source that failed.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::ArgumentCount { path, .. }
            | Self::ArgumentType { path, .. } => path,
        }
    }
}
