//! crates/logging/src/targets.rs
//! Tracing targets for each walker subsystem.

/// Walk driver: configure and visit passes.
pub const WALK: &str = "buildwalk::walk";

/// Single-flight directory cache and the directory loader.
pub const CACHE: &str = "buildwalk::cache";

/// Configuration chain and directive processing.
pub const CONFIG: &str = "buildwalk::config";

/// Repository ignore sources.
pub const IGNORE: &str = "buildwalk::ignore";

/// Parallel cache prefetch.
pub const PREFETCH: &str = "buildwalk::prefetch";

/// All targets, in the order they are documented.
pub const ALL: [&str; 5] = [WALK, CACHE, CONFIG, IGNORE, PREFETCH];
