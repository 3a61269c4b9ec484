//! Walk modes and the per-directory update policy derived from them.

use std::fmt;
use std::str::FromStr;

use filters::path;

/// Which directories a walk enters and which it marks for update.
///
/// | Mode | Entered | Updated |
/// |---|---|---|
/// | [`VisitAllUpdateSubdirs`](Self::VisitAllUpdateSubdirs) | whole tree | roots and their subtrees |
/// | [`VisitAllUpdateDirs`](Self::VisitAllUpdateDirs) | whole tree | exactly the roots |
/// | [`UpdateDirs`](Self::UpdateDirs) | roots (ancestors are configured only) | every visited directory |
/// | [`UpdateSubdirs`](Self::UpdateSubdirs) | roots and their subtrees | every visited directory |
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Mode {
    /// Visit every directory; update the roots and everything beneath them.
    #[default]
    VisitAllUpdateSubdirs,
    /// Visit every directory; update only the roots.
    VisitAllUpdateDirs,
    /// Visit and update only the roots.
    UpdateDirs,
    /// Visit and update the roots and everything beneath them.
    UpdateSubdirs,
}

impl Mode {
    /// Returns true if the whole tree is entered regardless of the roots.
    pub const fn visits_all(self) -> bool {
        matches!(self, Self::VisitAllUpdateSubdirs | Self::VisitAllUpdateDirs)
    }

    /// Returns true if directories beneath the roots are entered.
    pub const fn recurses(self) -> bool {
        !matches!(self, Self::UpdateDirs)
    }

    /// Stable name used on the command line and in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VisitAllUpdateSubdirs => "visit-all-update-subdirs",
            Self::VisitAllUpdateDirs => "visit-all-update-dirs",
            Self::UpdateDirs => "update-dirs",
            Self::UpdateSubdirs => "update-subdirs",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`Mode`] name.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown walk mode {0:?}")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::VisitAllUpdateSubdirs,
            Self::VisitAllUpdateDirs,
            Self::UpdateDirs,
            Self::UpdateSubdirs,
        ]
        .into_iter()
        .find(|mode| mode.as_str() == s)
        .ok_or_else(|| ParseModeError(s.to_owned()))
    }
}

/// Per-directory decisions derived from the mode and the requested roots.
#[derive(Clone, Debug)]
pub(crate) struct UpdatePolicy {
    mode: Mode,
    roots: Vec<String>,
}

impl UpdatePolicy {
    pub(crate) fn new(mode: Mode, roots: Vec<String>) -> Self {
        Self { mode, roots }
    }

    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pub(crate) fn roots(&self) -> &[String] {
        &self.roots
    }

    pub(crate) fn is_update_dir(&self, rel: &str) -> bool {
        self.roots.iter().any(|root| root == rel)
    }

    /// True if some root lies strictly beneath `rel`.
    pub(crate) fn is_ancestor(&self, rel: &str) -> bool {
        self.roots
            .iter()
            .any(|root| root != rel && path::is_within(root, rel))
    }

    /// Whether `rel` is marked for update, before per-directory overrides.
    pub(crate) fn should_update(&self, rel: &str, update_parent: bool) -> bool {
        (matches!(self.mode, Mode::VisitAllUpdateSubdirs | Mode::UpdateSubdirs) && update_parent)
            || self.is_update_dir(rel)
    }

    /// Whether the subdirectory `rel` is entered at all.
    pub(crate) fn should_visit(&self, rel: &str, update_parent: bool) -> bool {
        match self.mode {
            Mode::VisitAllUpdateSubdirs | Mode::VisitAllUpdateDirs => true,
            Mode::UpdateSubdirs => {
                update_parent || self.is_update_dir(rel) || self.is_ancestor(rel)
            }
            Mode::UpdateDirs => self.is_update_dir(rel) || self.is_ancestor(rel),
        }
    }

    /// Whether the visitor is called for an entered directory.
    pub(crate) fn should_call(&self, rel: &str, update_parent: bool) -> bool {
        match self.mode {
            Mode::VisitAllUpdateSubdirs | Mode::VisitAllUpdateDirs => true,
            Mode::UpdateSubdirs => update_parent || self.is_update_dir(rel),
            Mode::UpdateDirs => self.is_update_dir(rel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(mode: Mode, roots: &[&str]) -> UpdatePolicy {
        UpdatePolicy::new(mode, roots.iter().map(|r| (*r).to_owned()).collect())
    }

    #[test]
    fn mode_names_round_trip() {
        for mode in [
            Mode::VisitAllUpdateSubdirs,
            Mode::VisitAllUpdateDirs,
            Mode::UpdateDirs,
            Mode::UpdateSubdirs,
        ] {
            assert_eq!(mode.to_string().parse::<Mode>(), Ok(mode));
        }
        assert!("everything".parse::<Mode>().is_err());
    }

    #[test]
    fn ancestors_are_strict() {
        let policy = policy(Mode::UpdateDirs, &["a/b"]);
        assert!(policy.is_ancestor(""));
        assert!(policy.is_ancestor("a"));
        assert!(!policy.is_ancestor("a/b"));
        assert!(!policy.is_ancestor("a/bc"));
        assert!(!policy.is_ancestor("a/b/c"));
    }

    #[test]
    fn update_subdirs_propagates_from_parent() {
        let policy = policy(Mode::VisitAllUpdateSubdirs, &["a"]);
        assert!(policy.should_update("a", false));
        assert!(policy.should_update("a/b", true));
        assert!(!policy.should_update("c", false));
        assert!(policy.should_visit("c", false));
        assert!(policy.should_call("c", false));
    }

    #[test]
    fn update_dirs_does_not_propagate() {
        let policy = policy(Mode::VisitAllUpdateDirs, &["a"]);
        assert!(policy.should_update("a", false));
        assert!(!policy.should_update("a/b", true));
    }

    #[test]
    fn update_dirs_enters_only_roots_and_ancestors() {
        let policy = policy(Mode::UpdateDirs, &["a/b"]);
        assert!(policy.should_visit("a", false));
        assert!(!policy.should_call("a", false));
        assert!(policy.should_visit("a/b", false));
        assert!(policy.should_call("a/b", false));
        assert!(!policy.should_visit("a/b/c", true));
        assert!(!policy.should_visit("x", false));
    }

    #[test]
    fn update_subdirs_enters_subtrees_of_roots() {
        let policy = policy(Mode::UpdateSubdirs, &["a/b"]);
        assert!(policy.should_visit("a", false));
        assert!(!policy.should_call("a", false));
        assert!(policy.should_visit("a/b/c", true));
        assert!(policy.should_call("a/b/c", true));
        assert!(!policy.should_visit("a/x", false));
    }
}
