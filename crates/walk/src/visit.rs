use std::path::Path;

use crate::{BuildFile, Config, LoadError};

/// What the visitor learns about one directory.
///
/// `regular_files` includes, after the directory's own files, the files of
/// every subdirectory that was not called back for, prefixed with the
/// subdirectory's relative path. Those subdirectories are then absent from
/// `subdirs`.
#[derive(Clone, Copy, Debug)]
pub struct DirVisit<'a> {
    /// Storage path of the directory.
    pub dir: &'a Path,
    /// Repo-relative path; empty for the repository root.
    pub rel: &'a str,
    /// The directory's configuration.
    pub config: &'a Config,
    /// Whether rules in this directory should be updated.
    pub update: bool,
    /// The directory's build file, if it has one that loaded cleanly.
    pub file: Option<&'a BuildFile>,
    /// Subdirectories called back for, in name order.
    pub subdirs: &'a [String],
    /// Own and rolled-up files, see the type documentation.
    pub regular_files: &'a [String],
    /// Outputs declared by the build file.
    pub generated_files: &'a [String],
    /// Load problems of this directory, also collected in the walk summary.
    pub errors: Option<&'a LoadError>,
}

/// Receives directories in post-order: children before their parent,
/// siblings in name order.
pub trait Visitor {
    /// Called once for each directory the walk reports.
    fn visit(&mut self, visit: DirVisit<'_>);
}

impl<F> Visitor for F
where
    F: FnMut(DirVisit<'_>),
{
    fn visit(&mut self, visit: DirVisit<'_>) {
        self(visit)
    }
}
