//! Flat ignore file: one repo-relative path per line.

use std::collections::HashSet;

use logging::{trace_ignore, warn_directive};

use crate::path;

/// Exact-path entries read from a flat ignore file.
///
/// Each entry covers its own path and every path strictly beneath it, so the
/// entry `dir3` ignores `dir3` and `dir3/x/y` but not `dir3x`.
#[derive(Clone, Debug, Default)]
pub struct FlatIgnore {
    entries: HashSet<String>,
}

impl FlatIgnore {
    /// Parses the contents of a flat ignore file.
    ///
    /// Blank lines and lines starting with `#` are skipped. Lines containing
    /// glob metacharacters are reported and skipped. Every other line is
    /// cleaned, so `./a/` and `a` are the same entry. An entry naming the
    /// repository root itself is dropped.
    pub fn parse(contents: &str) -> Self {
        let mut entries = HashSet::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.contains(['*', '?', '[']) {
                warn_directive!("the .bazelignore exclusion pattern must not be a glob {line}");
                continue;
            }
            let cleaned = path::clean(line);
            if cleaned == "." {
                trace_ignore!("skipping .bazelignore entry {line:?} naming the repository root");
                continue;
            }
            entries.insert(cleaned);
        }
        trace_ignore!("loaded {} .bazelignore entries", entries.len());
        Self { entries }
    }

    /// Returns true if `rel` or one of its ancestors is an entry.
    pub fn is_ignored(&self, rel: &str) -> bool {
        if self.entries.is_empty() || rel.is_empty() {
            return false;
        }
        if self.entries.contains(rel) {
            return true;
        }
        rel.match_indices('/')
            .any(|(index, _)| self.entries.contains(&rel[..index]))
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries were loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
