use std::sync::Arc;

use filters::{IgnoreSet, PatternError, PatternSet, path};
use logging::{trace_config, warn_directive};

use super::directive::{GenerationMode, WalkDirective};
use crate::{BuildFile, ConfigError};

/// Walker settings resolved for one directory.
///
/// Never mutated once published: a child's configuration is derived with
/// [`configure_for_walk`](Self::configure_for_walk), which copies the parent
/// and applies the child's own directives. Exclude and follow patterns
/// accumulate down the tree; `update_only` and the build-file names are
/// inherited until overridden; `ignore` applies to the declaring directory
/// only.
#[derive(Clone, Debug)]
pub struct WalkConfig {
    update_only: bool,
    excludes: PatternSet,
    follow: PatternSet,
    ignore: bool,
    build_file_names: Arc<[String]>,
    ignored: Arc<IgnoreSet>,
}

impl WalkConfig {
    /// Creates the root configuration looking for the given build-file names.
    pub fn new<I, S>(build_file_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            update_only: false,
            excludes: PatternSet::new(),
            follow: PatternSet::new(),
            ignore: false,
            build_file_names: build_file_names.into_iter().map(Into::into).collect(),
            ignored: Arc::new(IgnoreSet::empty()),
        }
    }

    /// True under `generation_mode update_only`.
    pub fn update_only(&self) -> bool {
        self.update_only
    }

    /// Accumulated exclude patterns, anchored at the repository root.
    pub fn excludes(&self) -> &PatternSet {
        &self.excludes
    }

    /// Accumulated follow patterns, anchored at the repository root.
    pub fn follow(&self) -> &PatternSet {
        &self.follow
    }

    /// True if this directory itself declared `ignore`.
    pub fn ignore(&self) -> bool {
        self.ignore
    }

    /// Build-file names looked up in this directory's subdirectories.
    pub fn build_file_names(&self) -> &[String] {
        &self.build_file_names
    }

    /// Repository-wide ignore set.
    pub fn ignored(&self) -> &IgnoreSet {
        &self.ignored
    }

    /// Appends a root-anchored exclude pattern.
    pub fn push_exclude(&mut self, pattern: &str) -> Result<(), PatternError> {
        self.excludes.push(pattern)
    }

    /// Appends a root-anchored follow pattern.
    pub fn push_follow(&mut self, pattern: &str) -> Result<(), PatternError> {
        self.follow.push(pattern)
    }

    /// Sets the generation mode directly, as a root-level default.
    pub fn set_generation_mode(&mut self, mode: GenerationMode) {
        self.update_only = mode == GenerationMode::UpdateOnly;
    }

    pub(crate) fn set_ignored(&mut self, ignored: Arc<IgnoreSet>) {
        self.ignored = ignored;
    }

    /// True if the directory `rel` must not be entered.
    ///
    /// `.git` directories are always excluded.
    pub fn is_excluded_dir(&self, rel: &str) -> bool {
        path::base(rel) == ".git" || self.is_excluded_file(rel)
    }

    /// True if the file `rel` must not be reported.
    pub fn is_excluded_file(&self, rel: &str) -> bool {
        self.ignored.is_ignored(rel) || self.excludes.is_match(rel)
    }

    /// True if the symlink `rel` should be traversed as a directory.
    pub fn should_follow(&self, rel: &str) -> bool {
        self.follow.is_match(rel)
    }

    /// Derives the configuration of directory `rel` from this (its parent's)
    /// configuration and the directory's own build file.
    ///
    /// Directives are applied in file order. Malformed exclude or follow
    /// patterns and an argument given to `ignore` are reported and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownGenerationMode`] when a
    /// `generation_mode` value is not recognised.
    pub fn configure_for_walk(&self, rel: &str, file: Option<&BuildFile>) -> Result<Self, ConfigError> {
        let mut config = self.clone();
        config.ignore = false;

        let Some(file) = file else {
            return Ok(config);
        };

        for directive in WalkDirective::parse_all(&file.directives, &file.pkg)? {
            match directive {
                WalkDirective::GenerationMode(mode) => config.set_generation_mode(mode),
                WalkDirective::Exclude(value) => {
                    let pattern = path::join(rel, &value);
                    if let Err(error) = config.push_exclude(&pattern) {
                        warn_directive!("the exclusion pattern is not valid {pattern:?}: {error}");
                    }
                }
                WalkDirective::Follow(value) => {
                    let pattern = path::join(rel, &value);
                    if let Err(error) = config.push_follow(&pattern) {
                        warn_directive!("the follow pattern is not valid {pattern:?}: {error}");
                    }
                }
                WalkDirective::Ignore { argument } => {
                    if let Some(argument) = argument {
                        warn_directive!(
                            "the ignore directive does not take any arguments. Did you mean to use gazelle:exclude instead? in //{} '# gazelle:ignore {argument}'",
                            file.pkg
                        );
                    }
                    config.ignore = true;
                }
                WalkDirective::BuildFileNames(names) => {
                    if names.is_empty() {
                        warn_directive!("build_file_name in //{} names no files", file.pkg);
                    } else {
                        config.build_file_names = names.into();
                    }
                }
            }
        }

        trace_config!(
            "configured //{rel}: update_only={} ignore={} excludes={} follow={}",
            config.update_only,
            config.ignore,
            config.excludes.len(),
            config.follow.len()
        );
        Ok(config)
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self::new(super::DEFAULT_BUILD_FILE_NAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Directive;

    fn file(rel: &str, directives: &[(&str, &str)]) -> BuildFile {
        BuildFile {
            directives: directives
                .iter()
                .map(|(key, value)| Directive::new(*key, *value))
                .collect(),
            ..BuildFile::new(format!("/repo/{rel}/BUILD.bazel"), rel)
        }
    }

    #[test]
    fn excludes_are_anchored_and_accumulate() {
        let root = WalkConfig::default()
            .configure_for_walk("", Some(&file("", &[("exclude", "a.go")])))
            .expect("configured");
        let child = root
            .configure_for_walk("pkg", Some(&file("pkg", &[("exclude", "*.pb.go")])))
            .expect("configured");

        assert!(child.is_excluded_file("a.go"));
        assert!(child.is_excluded_file("pkg/x.pb.go"));
        assert!(!child.is_excluded_file("x.pb.go"));
        assert!(!root.is_excluded_file("pkg/x.pb.go"));
    }

    #[test]
    fn invalid_patterns_are_dropped() {
        let config = WalkConfig::default()
            .configure_for_walk(
                "",
                Some(&file("", &[("exclude", "[bad"), ("exclude", "good"), ("follow", "{x")])),
            )
            .expect("configured");
        assert_eq!(config.excludes().patterns().collect::<Vec<_>>(), ["good"]);
        assert!(config.follow().is_empty());
    }

    #[test]
    fn ignore_does_not_inherit() {
        let parent = WalkConfig::default()
            .configure_for_walk("a", Some(&file("a", &[("ignore", "")])))
            .expect("configured");
        assert!(parent.ignore());
        let child = parent.configure_for_walk("a/b", None).expect("configured");
        assert!(!child.ignore());
    }

    #[test]
    fn ignore_with_argument_still_ignores() {
        let config = WalkConfig::default()
            .configure_for_walk("a", Some(&file("a", &[("ignore", "x.go")])))
            .expect("configured");
        assert!(config.ignore());
        assert!(!config.is_excluded_file("a/x.go"));
    }

    #[test]
    fn generation_mode_overrides() {
        let update = WalkConfig::default()
            .configure_for_walk("a", Some(&file("a", &[("generation_mode", "update_only")])))
            .expect("configured");
        assert!(update.update_only());
        let inherited = update.configure_for_walk("a/b", None).expect("configured");
        assert!(inherited.update_only());
        let create = inherited
            .configure_for_walk("a/b", Some(&file("a/b", &[("generation_mode", "create_and_update")])))
            .expect("configured");
        assert!(!create.update_only());
    }

    #[test]
    fn unknown_generation_mode_is_an_error() {
        let error = WalkConfig::default()
            .configure_for_walk("a", Some(&file("a", &[("generation_mode", "never")])))
            .expect_err("unknown mode");
        assert!(matches!(error, ConfigError::UnknownGenerationMode { .. }));
    }

    #[test]
    fn exclude_self_excludes_own_path() {
        let config = WalkConfig::default()
            .configure_for_walk("sub", Some(&file("sub", &[("exclude", ".")])))
            .expect("configured");
        assert!(config.is_excluded_dir("sub"));
        assert!(!config.is_excluded_dir("sub/below"));
    }

    #[test]
    fn git_directories_are_always_excluded() {
        let config = WalkConfig::default();
        assert!(config.is_excluded_dir(".git"));
        assert!(config.is_excluded_dir("vendor/.git"));
        assert!(!config.is_excluded_file(".gitignore"));
    }

    #[test]
    fn build_file_name_replaces_names() {
        let config = WalkConfig::default()
            .configure_for_walk("", Some(&file("", &[("build_file_name", "BUILD.test")])))
            .expect("configured");
        assert_eq!(config.build_file_names(), ["BUILD.test".to_owned()]);
        assert_eq!(
            WalkConfig::default().build_file_names(),
            ["BUILD.bazel".to_owned(), "BUILD".to_owned()]
        );
    }
}
