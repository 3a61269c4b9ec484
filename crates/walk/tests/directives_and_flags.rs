//! Integration tests for directive handling that spans directories and for
//! the `--exclude` flag surface.

use clap::Command;
use test_support::FileTree;
use walk::{
    Config, Configurer, DirVisit, Mode, RepoRootConfig, WalkBuilder, WalkConfigurer, WalkError,
};

fn visits(config: Config) -> Result<Vec<(String, Vec<String>, Vec<String>)>, WalkError> {
    let mut seen = Vec::new();
    WalkBuilder::new(config)
        .configurer(&WalkConfigurer)
        .mode(Mode::VisitAllUpdateSubdirs)
        .walk(&mut |visit: DirVisit<'_>| {
            seen.push((
                visit.rel.to_owned(),
                visit.subdirs.to_vec(),
                visit.regular_files.to_vec(),
            ));
        })?;
    Ok(seen)
}

// ============================================================================
// Exclude Flag
// ============================================================================

#[test]
fn exclude_flag_seeds_root_configuration() {
    let dir = FileTree::new()
        .file("vendor/lib/lib.go")
        .file("src/main.go")
        .file("src/main_test.go")
        .build()
        .expect("create tree");

    let matches = WalkConfigurer
        .register_flags(Command::new("generate"))
        .try_get_matches_from(["generate", "--exclude", "vendor", "--exclude", "**/*_test.go"])
        .expect("flags parse");
    let mut config = Config::new(RepoRootConfig::new(dir.path()));
    WalkConfigurer
        .check_flags(&matches, &mut config)
        .expect("valid flags");

    let seen = visits(config).expect("walk");
    let rels: Vec<_> = seen.iter().map(|(rel, _, _)| rel.as_str()).collect();
    assert_eq!(rels, ["src", ""]);
    assert_eq!(seen[0].2, ["main.go"]);
}

// ============================================================================
// Inherited Directives
// ============================================================================

#[test]
fn nested_excludes_accumulate() {
    let dir = FileTree::new()
        .text_file("BUILD.bazel", "# gazelle:exclude **/*.gen.go\n")
        .text_file("a/BUILD.bazel", "# gazelle:exclude skip\n")
        .file("a/x.go")
        .file("a/x.gen.go")
        .file("a/skip/y.go")
        .file("a/b/skip/z.go")
        .file("b/skip/w.go")
        .build()
        .expect("create tree");

    let seen = visits(Config::new(RepoRootConfig::new(dir.path()))).expect("walk");
    let rels: Vec<_> = seen.iter().map(|(rel, _, _)| rel.as_str()).collect();
    // `skip` is anchored at `a`, so `a/b/skip` and `b/skip` remain.
    assert_eq!(rels, ["a/b/skip", "a/b", "a", "b/skip", "b", ""]);
    let a = &seen[2];
    assert_eq!(a.1, ["b"]);
    assert_eq!(a.2, ["BUILD.bazel", "x.go"]);
}

#[test]
fn trailing_double_star_exclude_skips_the_directory_itself() {
    let dir = FileTree::new()
        .text_file("BUILD.bazel", "# gazelle:exclude gen/**\n")
        .file("gen/x.go")
        .file("gen/sub/y.go")
        .file("a.go")
        .build()
        .expect("create tree");

    let seen = visits(Config::new(RepoRootConfig::new(dir.path()))).expect("walk");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "");
    assert!(seen[0].1.is_empty());
    assert_eq!(seen[0].2, ["BUILD.bazel", "a.go"]);
}

#[test]
fn unknown_directives_do_not_stop_the_walk() {
    let dir = FileTree::new()
        .text_file("BUILD.bazel", "# gazelle:go_prefix example.com\n# gazelle:go_prefix again\n")
        .file("a.go")
        .build()
        .expect("create tree");
    let seen = visits(Config::new(RepoRootConfig::new(dir.path()))).expect("walk");
    assert_eq!(seen.len(), 1);
}

#[test]
fn custom_directive_prefix() {
    let dir = FileTree::new()
        .text_file("BUILD.bazel", "# walker:exclude a.go\n# gazelle:exclude b.go\n")
        .file("a.go")
        .file("b.go")
        .build()
        .expect("create tree");
    let root = RepoRootConfig::new(dir.path()).with_directive_prefix("walker");
    let seen = visits(Config::new(root)).expect("walk");
    assert_eq!(seen[0].2, ["BUILD.bazel", "b.go"]);
}

#[test]
fn root_generation_mode_default_applies_everywhere() {
    let dir = FileTree::new()
        .file("BUILD.bazel")
        .file("lib/a.go")
        .build()
        .expect("create tree");
    let mut config = Config::new(RepoRootConfig::new(dir.path()));
    config
        .walk_mut()
        .set_generation_mode(walk::GenerationMode::UpdateOnly);

    let seen = visits(config).expect("walk");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "");
    assert_eq!(seen[0].2, ["BUILD.bazel", "lib/a.go"]);
    assert!(seen[0].1.is_empty());
}

// ============================================================================
// Symbolic Links
// ============================================================================

#[cfg(unix)]
#[test]
fn follow_directive_traverses_linked_directory() {
    let dir = FileTree::new()
        .text_file("BUILD.bazel", "# gazelle:follow third_party/*\n")
        .file("shared/lib.go")
        .symlink("third_party/shared", "../shared")
        .symlink("alias", "shared")
        .build()
        .expect("create tree");

    let seen = visits(Config::new(RepoRootConfig::new(dir.path()))).expect("walk");
    let rels: Vec<_> = seen.iter().map(|(rel, _, _)| rel.as_str()).collect();
    assert_eq!(rels, ["shared", "third_party/shared", "third_party", ""]);
    assert_eq!(seen[1].2, ["lib.go"]);

    let root = &seen[3];
    assert_eq!(root.1, ["shared", "third_party"]);
    assert_eq!(root.2, ["BUILD.bazel", "alias"]);
}

#[cfg(unix)]
#[test]
fn dangling_followed_link_is_a_file() {
    let dir = FileTree::new()
        .text_file("BUILD.bazel", "# gazelle:follow gone\n")
        .symlink("gone", "missing")
        .build()
        .expect("create tree");
    let seen = visits(Config::new(RepoRootConfig::new(dir.path()))).expect("walk");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].2, ["BUILD.bazel", "gone"]);
}
