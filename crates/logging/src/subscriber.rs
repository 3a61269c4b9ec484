//! crates/logging/src/subscriber.rs
//! Installation of the global tracing subscriber.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{Verbosity, init_tracing};
//!
//! init_tracing(Verbosity::from_level(2))?;
//! logging::trace_walk!("walk started");
//! ```

use std::fmt;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::Verbosity;

/// Error returned when a global subscriber has already been installed.
#[derive(Debug)]
pub struct TracingInitError {
    message: String,
}

impl fmt::Display for TracingInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to install tracing subscriber: {}", self.message)
    }
}

impl std::error::Error for TracingInitError {}

/// Builds the filter used by [`init_tracing`].
///
/// `RUST_LOG` takes precedence when it is set and parses; otherwise the
/// verbosity level decides.
pub(crate) fn build_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.directive()))
}

/// Installs a global `tracing-subscriber` registry writing to stderr.
///
/// # Errors
///
/// Returns [`TracingInitError`] when a global default subscriber is
/// already set.
pub fn init_tracing(verbosity: Verbosity) -> Result<(), TracingInitError> {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_filter(verbosity))
        .with(layer)
        .try_init()
        .map_err(|error| TracingInitError {
            message: error.to_string(),
        })
}
