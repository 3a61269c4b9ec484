//! crates/logging/src/verbosity.rs
//! Mapping from a `-v` style verbosity level onto a tracing filter.

use std::fmt;

/// Verbosity level selected by the caller.
///
/// Level 0 keeps only warnings (directive diagnostics stay visible), each
/// further level raises the walker targets by one tracing level.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Verbosity(u8);

impl Verbosity {
    /// Warnings only.
    pub const QUIET: Self = Self(0);

    /// Creates a verbosity from the number of `-v` flags given.
    pub const fn from_level(level: u8) -> Self {
        Self(level)
    }

    /// Returns the raw level.
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Returns the filter directive for this level.
    ///
    /// The string is accepted by `tracing_subscriber::EnvFilter`.
    pub const fn directive(self) -> &'static str {
        match self.0 {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl From<u8> for Verbosity {
    fn from(level: u8) -> Self {
        Self::from_level(level)
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive())
    }
}
