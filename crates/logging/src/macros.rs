//! crates/logging/src/macros.rs
//! Convenience macros for walker-specific tracing.
//!
//! These macros provide ergonomic wrappers around standard tracing macros
//! with appropriate targets for walker subsystems.

/// Emit a walk driver trace.
///
/// # Example
/// ```ignore
/// trace_walk!("visiting {}", rel);
/// ```
#[macro_export]
macro_rules! trace_walk {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "buildwalk::walk", $($arg)*)
    };
}

/// Emit a directory cache trace.
///
/// # Example
/// ```ignore
/// trace_cache!("loaded {} ({} entries)", rel, count);
/// ```
#[macro_export]
macro_rules! trace_cache {
    ($($arg:tt)*) => {
        $crate::tracing::trace!(target: "buildwalk::cache", $($arg)*)
    };
}

/// Emit a configuration chain trace.
///
/// # Example
/// ```ignore
/// trace_config!("{}: update_only={}", rel, update_only);
/// ```
#[macro_export]
macro_rules! trace_config {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "buildwalk::config", $($arg)*)
    };
}

/// Emit an ignore-source trace.
///
/// # Example
/// ```ignore
/// trace_ignore!("loaded {} ignore entries", count);
/// ```
#[macro_export]
macro_rules! trace_ignore {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "buildwalk::ignore", $($arg)*)
    };
}

/// Emit a prefetch trace.
///
/// # Example
/// ```ignore
/// trace_prefetch!("prefetching {} roots", roots.len());
/// ```
#[macro_export]
macro_rules! trace_prefetch {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "buildwalk::prefetch", $($arg)*)
    };
}

/// Report a user-facing problem with a directive or ignore entry.
///
/// The message is logged at `warn` level on the configuration target; the
/// offending entry is skipped by the caller.
///
/// # Example
/// ```ignore
/// warn_directive!("the exclusion pattern is not valid {:?}: {}", pattern, err);
/// ```
#[macro_export]
macro_rules! warn_directive {
    ($($arg:tt)*) => {
        $crate::tracing::warn!(target: "buildwalk::config", $($arg)*)
    };
}
