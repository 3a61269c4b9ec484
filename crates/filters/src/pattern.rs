use std::fmt;
use std::sync::Arc;

use globset::{GlobBuilder, GlobMatcher};

use crate::PatternError;

/// Compiles `pattern` with the walker's glob dialect.
///
/// `*` and `?` stop at `/`, `**` as a whole segment spans any number of
/// segments (including none), `[...]` classes and `{a,b}` alternates are
/// supported and `\` escapes the next character. A trailing `/**` also
/// matches the prefix itself, see [`PatternSet::push`].
fn compile(pattern: &str) -> Result<GlobMatcher, PatternError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(true)
        .empty_alternates(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|error| PatternError::new(pattern, error))
}

/// Checks that `pattern` is well formed.
///
/// Directive parsing calls this so a malformed pattern is reported once and
/// dropped instead of silently never matching.
///
/// # Examples
///
/// ```
/// assert!(filters::validate_pattern("**/*.pb.go").is_ok());
/// assert!(filters::validate_pattern("a/[b").is_err());
/// ```
pub fn validate_pattern(pattern: &str) -> Result<(), PatternError> {
    compile(pattern).map(|_| ())
}

#[derive(Clone)]
struct CompiledPattern {
    text: String,
    matcher: GlobMatcher,
    // Set for `prefix/**`; matches `prefix` with zero trailing segments.
    prefix: Option<GlobMatcher>,
}

impl CompiledPattern {
    fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
            || self
                .prefix
                .as_ref()
                .is_some_and(|prefix| prefix.is_match(path))
    }
}

/// Ordered, immutable-on-share set of repo-relative glob patterns.
///
/// Cloning is cheap: the compiled patterns live behind an [`Arc`] and are
/// only copied when a clone is extended with [`push`](Self::push), so a
/// child directory's set can add patterns without disturbing its parent's.
///
/// # Examples
///
/// ```
/// use filters::PatternSet;
///
/// let mut set = PatternSet::new();
/// set.push("**/*.pb.go").unwrap();
/// set.push("c/**/b").unwrap();
///
/// assert!(set.is_match("x.pb.go"));
/// assert!(set.is_match("c/d/b"));
/// assert!(!set.is_match("a/a.proto"));
/// ```
#[derive(Clone, Default)]
pub struct PatternSet {
    patterns: Arc<Vec<CompiledPattern>>,
}

impl PatternSet {
    /// Creates an empty set that matches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from patterns, failing on the first malformed one.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for pattern in patterns {
            set.push(pattern.as_ref())?;
        }
        Ok(set)
    }

    /// Appends a pattern after validating it.
    ///
    /// On error the set is left unchanged. A pattern ending in `/**` matches
    /// its prefix as well as everything beneath it, so `gen/**` matches
    /// `gen`.
    pub fn push(&mut self, pattern: &str) -> Result<(), PatternError> {
        let matcher = compile(pattern)?;
        let prefix = pattern
            .strip_suffix("/**")
            .filter(|prefix| !prefix.is_empty())
            .and_then(|prefix| compile(prefix).ok());
        Arc::make_mut(&mut self.patterns).push(CompiledPattern {
            text: pattern.to_owned(),
            matcher,
            prefix,
        });
        Ok(())
    }

    /// Returns true if `path` matches any pattern in the set.
    pub fn is_match(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.is_match(path))
    }

    /// Iterates the pattern sources in insertion order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|pattern| pattern.text.as_str())
    }

    /// Number of patterns in the set.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if the set holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.patterns()).finish()
    }
}

impl PartialEq for PatternSet {
    fn eq(&self, other: &Self) -> bool {
        self.patterns().eq(other.patterns())
    }
}

impl Eq for PatternSet {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_on_clone_leaves_original_untouched() {
        let parent = PatternSet::from_patterns(["a.go"]).expect("compiled");
        let mut child = parent.clone();
        child.push("b.go").expect("compiled");

        assert_eq!(parent.len(), 1);
        assert_eq!(child.patterns().collect::<Vec<_>>(), ["a.go", "b.go"]);
        assert!(!parent.is_match("b.go"));
        assert!(child.is_match("a.go"));
    }

    #[test]
    fn failed_push_keeps_set() {
        let mut set = PatternSet::from_patterns(["a.go"]).expect("compiled");
        let error = set.push("{a").expect_err("unclosed alternate");
        assert_eq!(error.pattern(), "{a");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn trailing_double_star_covers_its_prefix() {
        let set = PatternSet::from_patterns(["gen/**", "a/*/out/**"]).expect("compiled");
        assert!(set.is_match("gen"));
        assert!(set.is_match("a/x/out"));
        assert!(!set.is_match("a/x"));
        assert!(!set.is_match("generated"));
    }

    #[test]
    fn debug_lists_sources() {
        let set = PatternSet::from_patterns(["x", "y/**"]).expect("compiled");
        assert_eq!(format!("{set:?}"), r#"["x", "y/**"]"#);
    }
}
