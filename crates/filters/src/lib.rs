#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` answers the two path questions the walker asks before it reads
//! anything from storage: does a repo-relative path match one of a set of glob
//! patterns, and is it ignored repository-wide. Paths are always
//! slash-separated, relative to the repository root (the root itself is the
//! empty string) and normalised.
//!
//! # Design
//!
//! - [`PatternSet`] is an ordered list of compiled [`globset`] matchers. `*`
//!   and `?` never cross a `/`, while a `**` segment spans any number of
//!   segments. Sets are cheap to clone and copy their contents only when a
//!   clone is extended, which lets each directory inherit its parent's exclude
//!   and follow patterns without sharing mutations.
//! - [`validate_pattern`] compiles a pattern and discards the result so
//!   directive parsing can reject malformed patterns up front.
//! - [`IgnoreSet`] merges the flat ignore file (`.bazelignore`) and the
//!   `ignore_directories([...])` declaration of the repo-metadata file
//!   (`REPO.bazel`) into one predicate.
//! - [`path`] holds the lexical helpers (`clean`, `join`, `parent`, ...) used
//!   to build cache keys and anchored patterns.
//! - [`syntax`] is a small tokenizer for the build-file language, shared with
//!   the walker's default build-file scanner.
//!
//! # Invariants
//!
//! - A flat ignore entry covers its own path and every path strictly beneath
//!   it, never a sibling that merely shares a prefix.
//! - Glob lines in the flat ignore file and malformed `ignore_directories`
//!   patterns are reported at `warn` level and skipped, never fatal.
//! - Only the first statement-level `ignore_directories` call is honoured.
//!
//! # Errors
//!
//! [`PatternError`] carries the offending pattern. [`IgnoreError`] is
//! returned when an ignore source exists but cannot be read or is malformed;
//! a missing source is treated as empty.
//!
//! # Examples
//!
//! ```
//! use filters::{IgnoreSet, PatternSet};
//!
//! let excludes = PatternSet::from_patterns(["**/*.pb.go", "c/**/b"]).unwrap();
//! assert!(excludes.is_match("pkg/api.pb.go"));
//! assert!(!excludes.is_match("pkg/api.go"));
//!
//! let ignored = IgnoreSet::from_sources("vendor\n", "").unwrap();
//! assert!(ignored.is_ignored("vendor/x"));
//! ```

mod error;
mod flat_ignore;
mod ignore;
pub mod path;
mod pattern;
mod repo_ignore;
pub mod syntax;

pub use error::{IgnoreError, PatternError, SyntaxError};
pub use flat_ignore::FlatIgnore;
pub use ignore::{DEFAULT_FLAT_IGNORE_FILE, DEFAULT_REPO_FILE, IgnoreSet};
pub use pattern::{PatternSet, validate_pattern};
