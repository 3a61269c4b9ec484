#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` centralises the diagnostics used by the walker crates. Every
//! subsystem logs through a macro bound to a fixed `tracing` target so a
//! single filter can raise or silence one area (for example only the cache)
//! without touching the others.
//!
//! # Design
//!
//! - [`targets`] lists the target strings. The macros in this crate
//!   (`trace_walk!`, `trace_cache!`, `trace_config!`, `trace_ignore!`,
//!   `trace_prefetch!`, `warn_directive!`) are thin wrappers over the
//!   `tracing` macros that pin the target.
//! - [`Verbosity`] maps a numeric verbosity level onto a filter directive.
//! - With the `subscriber` feature enabled, [`init_tracing`] installs a
//!   `tracing-subscriber` registry using that directive, honouring `RUST_LOG`
//!   when it is set.
//!
//! # Invariants
//!
//! - Directive diagnostics (bad globs, unknown directives, stray arguments)
//!   are always emitted at `warn` level so they remain visible at the default
//!   verbosity.
//! - The macros never evaluate their arguments when the target is disabled.
//!
//! # Examples
//!
//! ```
//! use logging::{Verbosity, trace_walk};
//!
//! trace_walk!("visiting {}", "pkg/sub");
//! assert_eq!(Verbosity::from_level(0).directive(), "warn");
//! ```

#[doc(hidden)]
pub use tracing;

mod macros;
pub mod targets;
mod verbosity;

#[cfg(feature = "subscriber")]
mod subscriber;

pub use verbosity::Verbosity;

#[cfg(feature = "subscriber")]
pub use subscriber::{TracingInitError, init_tracing};
