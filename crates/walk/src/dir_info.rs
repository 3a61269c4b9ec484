//! Directory snapshots and the loader that produces them.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use filters::path;
use logging::trace_cache;

use crate::cache::DirCache;
use crate::{
    BuildFile, BuildFileLoader, BuildFileRequest, LoadError, LoadFailure, RepoRootConfig,
    WalkConfig,
};

/// Everything the walk needs to know about one directory.
///
/// Produced once by the loader and shared read-only afterwards; the name
/// lists are immutable slices so no reader can observe another's changes.
#[derive(Clone, Debug)]
pub struct DirectoryInfo {
    subdirs: Arc<[String]>,
    regular_files: Arc<[String]>,
    generated_files: Arc<[String]>,
    file: Option<Arc<BuildFile>>,
    config: Arc<WalkConfig>,
}

impl DirectoryInfo {
    /// Names of subdirectories that are neither excluded nor ignored, sorted.
    pub fn subdirs(&self) -> &[String] {
        &self.subdirs
    }

    /// Names of non-directory entries that are neither excluded nor ignored,
    /// sorted.
    pub fn regular_files(&self) -> &[String] {
        &self.regular_files
    }

    /// Output names declared by the directory's build file, in declaration
    /// order, without duplicates or excluded names.
    pub fn generated_files(&self) -> &[String] {
        &self.generated_files
    }

    /// The directory's build file, if one exists and loaded cleanly.
    pub fn file(&self) -> Option<&BuildFile> {
        self.file.as_deref()
    }

    /// The directory's resolved walker configuration.
    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    pub(crate) fn config_arc(&self) -> Arc<WalkConfig> {
        Arc::clone(&self.config)
    }

    pub(crate) fn file_arc(&self) -> Option<Arc<BuildFile>> {
        self.file.clone()
    }
}

/// Contents of one cache slot.
#[derive(Clone, Debug)]
pub struct DirResult {
    /// Directory snapshot, partial when `error` is set.
    pub info: Arc<DirectoryInfo>,
    /// What went wrong while loading, if anything.
    pub error: Option<Arc<LoadError>>,
}

impl DirResult {
    /// Returns true if the walk must stop at this directory.
    pub fn is_fatal(&self) -> bool {
        self.error.as_ref().is_some_and(|error| error.is_fatal())
    }
}

struct Entry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

/// Loads directories into a [`DirCache`].
///
/// A directory's configuration derives from its parent's, so the parent's
/// slot must already be filled when a child is loaded.
pub(crate) struct DirLoader<'a> {
    pub(crate) root: &'a RepoRootConfig,
    pub(crate) root_walk: Arc<WalkConfig>,
    pub(crate) build_files: &'a dyn BuildFileLoader,
    pub(crate) cache: DirCache<DirResult>,
}

impl DirLoader<'_> {
    /// Cached load of `rel`.
    pub(crate) fn get(&self, rel: &str) -> DirResult {
        self.cache.get(rel, |rel| self.load(rel))
    }

    /// Storage path of the directory `rel`.
    pub(crate) fn storage_path(&self, rel: &str) -> PathBuf {
        storage_path(&self.root.repo_root, rel)
    }

    fn load(&self, rel: &str) -> DirResult {
        let mut failures = Vec::new();
        let dir = self.storage_path(rel);

        let mut entries = match read_entries(&dir) {
            Ok(entries) => entries,
            Err(source) => {
                failures.push(LoadFailure::ReadDir {
                    path: dir.clone(),
                    source,
                });
                Vec::new()
            }
        };

        let parent_config = match path::parent(rel) {
            None => Arc::clone(&self.root_walk),
            Some(parent) => self.cache.get_loaded(parent).info.config_arc(),
        };

        let file = if self.root.read_build_files {
            match self.load_build_file(&dir, rel, &entries, &parent_config) {
                Ok(file) => file.map(Arc::new),
                Err(failure) => {
                    failures.push(failure);
                    None
                }
            }
        } else {
            None
        };

        let config = match parent_config.configure_for_walk(rel, file.as_deref()) {
            Ok(config) => Arc::new(config),
            Err(error) => {
                failures.push(LoadFailure::Config(error));
                entries.clear();
                parent_config
            }
        };

        if config.is_excluded_dir(rel) {
            trace_cache!("{rel:?} excludes itself; contents skipped");
            entries.clear();
        }

        let mut subdirs = Vec::new();
        let mut regular_files = Vec::new();
        for entry in entries {
            let entry_rel = path::join(rel, &entry.name);
            let is_dir = entry.is_dir
                || (entry.is_symlink
                    && config.should_follow(&entry_rel)
                    && fs::metadata(dir.join(&entry.name)).is_ok_and(|meta| meta.is_dir()));
            if is_dir {
                if !config.is_excluded_dir(&entry_rel) {
                    subdirs.push(entry.name);
                }
            } else if !config.is_excluded_file(&entry_rel) {
                regular_files.push(entry.name);
            }
        }

        let generated_files = file
            .as_deref()
            .map(|file| generated_files(file, &config))
            .unwrap_or_default();

        trace_cache!(
            "loaded {rel:?}: {} subdirs, {} files, {} generated, {} errors",
            subdirs.len(),
            regular_files.len(),
            generated_files.len(),
            failures.len()
        );

        DirResult {
            info: Arc::new(DirectoryInfo {
                subdirs: subdirs.into(),
                regular_files: regular_files.into(),
                generated_files: generated_files.into(),
                file,
                config,
            }),
            error: (!failures.is_empty()).then(|| Arc::new(LoadError::new(rel, failures))),
        }
    }

    fn load_build_file(
        &self,
        dir: &Path,
        rel: &str,
        entries: &[Entry],
        parent_config: &WalkConfig,
    ) -> Result<Option<BuildFile>, LoadFailure> {
        let (read_dir, names) = match &self.root.read_build_files_dir {
            Some(alternate) => {
                let read_dir = storage_path(alternate, rel);
                match read_entries(&read_dir) {
                    Ok(alternate_entries) => (read_dir, file_names(&alternate_entries)),
                    Err(_) => return Ok(None),
                }
            }
            None => (dir.to_path_buf(), file_names(entries)),
        };

        let request = BuildFileRequest {
            dir: &read_dir,
            rel,
            names: parent_config.build_file_names(),
            entries: &names,
        };
        Ok(self.build_files.load(&request)?)
    }
}

fn storage_path(base: &Path, rel: &str) -> PathBuf {
    rel.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

/// Lists `dir`, sorted by name. Symlinks are reported as such, not followed.
fn read_entries(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: file_type.is_dir(),
            is_symlink: file_type.is_symlink(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn file_names(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| !entry.is_dir)
        .map(|entry| entry.name.clone())
        .collect()
}

fn generated_files(file: &BuildFile, config: &WalkConfig) -> Vec<String> {
    let mut seen = HashSet::new();
    file.output_names()
        .filter(|name| !config.is_excluded_file(&path::join(&file.pkg, name)))
        .filter(|name| seen.insert(*name))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DirectiveScanner;
    use test_support::FileTree;

    fn loader<'a>(root: &'a RepoRootConfig, scanner: &'a DirectiveScanner) -> DirLoader<'a> {
        DirLoader {
            root,
            root_walk: Arc::new(WalkConfig::new(root.build_file_names.iter().cloned())),
            build_files: scanner,
            cache: DirCache::new(),
        }
    }

    #[test]
    fn classifies_entries() {
        let dir = FileTree::new()
            .text_file("BUILD.bazel", "# gazelle:exclude skip.go\n")
            .file("a.go")
            .file("skip.go")
            .dir("sub")
            .dir(".git")
            .build()
            .expect("create tree");
        let root = RepoRootConfig::new(dir.path());
        let scanner = DirectiveScanner::default();
        let loader = loader(&root, &scanner);

        let result = loader.get("");
        assert!(result.error.is_none());
        assert_eq!(result.info.subdirs(), ["sub".to_owned()]);
        assert_eq!(
            result.info.regular_files(),
            ["BUILD.bazel".to_owned(), "a.go".to_owned()]
        );
        assert!(result.info.file().is_some());
    }

    #[test]
    fn unreadable_directory_is_empty_with_error() {
        let dir = FileTree::new().build().expect("create tree");
        let root = RepoRootConfig::new(dir.path());
        let scanner = DirectiveScanner::default();
        let loader = loader(&root, &scanner);

        loader.get("");
        let result = loader.get("missing");
        assert!(result.info.subdirs().is_empty());
        assert!(result.info.regular_files().is_empty());
        let error = result.error.expect("read error");
        assert!(matches!(error.failures(), [LoadFailure::ReadDir { .. }]));
        assert!(!error.build_file_failed());
    }

    #[test]
    fn broken_build_file_keeps_contents_and_parent_config() {
        let dir = FileTree::new()
            .text_file("BUILD.bazel", "# gazelle:exclude **/*.pb.go\n")
            .text_file("pkg/BUILD.bazel", "(\n# gazelle:exclude a.go\n")
            .file("pkg/a.go")
            .file("pkg/b.pb.go")
            .build()
            .expect("create tree");
        let root = RepoRootConfig::new(dir.path());
        let scanner = DirectiveScanner::default();
        let loader = loader(&root, &scanner);

        loader.get("");
        let result = loader.get("pkg");
        assert!(result.info.file().is_none());
        assert!(result.error.as_ref().expect("parse error").build_file_failed());
        assert_eq!(
            result.info.regular_files(),
            ["BUILD.bazel".to_owned(), "a.go".to_owned()]
        );
    }

    #[test]
    fn read_build_files_disabled_skips_directives() {
        let dir = FileTree::new()
            .text_file("BUILD.bazel", "# gazelle:exclude a.go\n")
            .file("a.go")
            .build()
            .expect("create tree");
        let root = RepoRootConfig::new(dir.path()).with_read_build_files(false);
        let scanner = DirectiveScanner::default();
        let loader = loader(&root, &scanner);

        let result = loader.get("");
        assert!(result.info.file().is_none());
        assert!(result.info.regular_files().contains(&"a.go".to_owned()));
    }

    #[test]
    fn alternate_build_file_tree() {
        let dir = FileTree::new()
            .file("repo/a.go")
            .file("repo/b.go")
            .text_file("alt/BUILD", "# gazelle:exclude b.go\n")
            .build()
            .expect("create tree");
        let root = RepoRootConfig::new(dir.join("repo")).with_read_build_files_dir(dir.join("alt"));
        let scanner = DirectiveScanner::default();
        let loader = loader(&root, &scanner);

        let result = loader.get("");
        assert_eq!(result.info.file().expect("file").path, dir.join("alt").join("BUILD"));
        assert_eq!(result.info.regular_files(), ["a.go".to_owned()]);
    }

    #[test]
    fn generated_files_dedupe_and_filter() {
        let dir = FileTree::new()
            .text_file(
                "BUILD.bazel",
                "# gazelle:exclude skipped\nr(out = \"gen\")\nr(outs = [\"gen\", \"skipped\", \"other\"])\n",
            )
            .build()
            .expect("create tree");
        let root = RepoRootConfig::new(dir.path());
        let scanner = DirectiveScanner::default();
        let loader = loader(&root, &scanner);

        let result = loader.get("");
        assert_eq!(
            result.info.generated_files(),
            ["gen".to_owned(), "other".to_owned()]
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_need_follow() {
        let dir = FileTree::new()
            .text_file("BUILD.bazel", "# gazelle:follow followed\n")
            .file("real/x.go")
            .symlink("followed", "real")
            .symlink("opaque", "real")
            .build()
            .expect("create tree");
        let root = RepoRootConfig::new(dir.path());
        let scanner = DirectiveScanner::default();
        let loader = loader(&root, &scanner);

        let result = loader.get("");
        assert_eq!(result.info.subdirs(), ["followed".to_owned(), "real".to_owned()]);
        assert!(result.info.regular_files().contains(&"opaque".to_owned()));
    }
}
