//! Integration tests for the repository ignore sources.
//!
//! Covers the flat ignore file's entry boundary (an entry covers its own
//! path and its subtree, never a prefix-sharing sibling) and the shape rules
//! of the `ignore_directories` declaration.

use filters::{FlatIgnore, IgnoreError, IgnoreSet, path};
use proptest::prelude::*;
use test_support::FileTree;

// ============================================================================
// Flat Ignore Boundary Tests
// ============================================================================

/// Verifies `dir3/` removes the directory and its contents only.
#[test]
fn trailing_slash_entry_covers_subtree() {
    let ignore = FlatIgnore::parse("dir3/\n");
    assert!(ignore.is_ignored("dir3"));
    assert!(ignore.is_ignored("dir3/a"));
    assert!(ignore.is_ignored("dir3/a/b.go"));
    assert!(!ignore.is_ignored("dir"));
    assert!(!ignore.is_ignored("dir30"));
    assert!(!ignore.is_ignored("a/dir3"));
}

/// Verifies `./x` and `x` are the same entry.
#[test]
fn leading_dot_slash_is_equivalent() {
    let with_prefix = FlatIgnore::parse("./dir2\n");
    let without_prefix = FlatIgnore::parse("dir2\n");
    for rel in ["dir2", "dir2/x", "dir", "dir22", "other"] {
        assert_eq!(with_prefix.is_ignored(rel), without_prefix.is_ignored(rel), "{rel}");
    }
}

/// Verifies paths escaping the root never match repo-relative paths.
#[test]
fn entries_above_root_match_nothing() {
    let ignore = FlatIgnore::parse("../outside\n");
    assert!(!ignore.is_ignored("outside"));
    assert!(!ignore.is_ignored("../outside"));
    assert_eq!(ignore.len(), 1);
}

fn segment() -> impl Strategy<Value = String> {
    "[a-z]{1,4}"
}

fn rel_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment(), 1..4).prop_map(|segments| segments.join("/"))
}

proptest! {
    /// An entry ignores exactly the paths equal to it or strictly beneath it.
    #[test]
    fn entry_boundary_is_path_or_subtree(entry in rel_path(), candidate in rel_path()) {
        let ignore = FlatIgnore::parse(&format!("{entry}\n"));
        let expected = path::is_within(&candidate, &entry);
        prop_assert_eq!(ignore.is_ignored(&candidate), expected);
    }

    /// Decorating an entry with `./` or a trailing `/` does not change it.
    #[test]
    fn decorations_are_normalised(entry in rel_path(), candidate in rel_path()) {
        let plain = FlatIgnore::parse(&entry);
        let decorated = FlatIgnore::parse(&format!("  ./{entry}/  \n"));
        prop_assert_eq!(plain.is_ignored(&candidate), decorated.is_ignored(&candidate));
    }

    /// A suffix appended without a separator never falls under the entry.
    #[test]
    fn sibling_with_shared_prefix_is_not_ignored(entry in rel_path(), suffix in segment()) {
        let ignore = FlatIgnore::parse(&entry);
        let sibling = format!("{entry}{suffix}");
        prop_assert!(!ignore.is_ignored(&sibling));
    }
}

// ============================================================================
// Repo-Metadata Declaration Tests
// ============================================================================

/// Verifies `ignore_directories` globs are merged with flat entries.
#[test]
fn repo_declaration_adds_globs() {
    let dir = FileTree::new()
        .text_file(".bazelignore", "vendor\n")
        .text_file("REPO.bazel", "ignore_directories([\"**/testdata\"])\n")
        .build()
        .expect("create tree");

    let set = IgnoreSet::load(dir.path()).expect("load");
    assert!(set.is_ignored("vendor/x"));
    assert!(set.is_ignored("pkg/testdata"));
    assert!(set.is_ignored("testdata"));
    assert!(!set.is_ignored("pkg"));
}

/// Verifies a `dir/**` declaration ignores `dir` itself.
#[test]
fn repo_trailing_double_star_covers_directory() {
    let dir = FileTree::new()
        .text_file("REPO.bazel", "ignore_directories([\"out/**\"])\n")
        .build()
        .expect("create tree");

    let set = IgnoreSet::load(dir.path()).expect("load");
    assert!(set.is_ignored("out"));
    assert!(set.is_ignored("out/x/y"));
    assert!(!set.is_ignored("output"));
}

/// Verifies a non-list argument is rejected.
#[test]
fn non_list_argument_is_rejected() {
    let dir = FileTree::new()
        .text_file("REPO.bazel", "ignore_directories(DIRS)\n")
        .build()
        .expect("create tree");

    let error = IgnoreSet::load(dir.path()).expect_err("identifier argument");
    match error {
        IgnoreError::ArgumentType { found, .. } => assert_eq!(found, "identifier"),
        other => panic!("unexpected error: {other}"),
    }
}

/// Verifies glob lines in the flat file are skipped while others load.
#[test]
fn glob_lines_are_skipped() {
    let set = IgnoreSet::from_sources("*.tmp\nbuild\n", "").expect("load");
    assert!(set.is_ignored("build"));
    assert!(!set.is_ignored("a.tmp"));
    assert!(!set.is_ignored("*.tmp"));
}
