//! Test helpers that materialise small repository trees on disk.
//!
//! ```
//! use test_support::{FileTree, TestDir};
//!
//! let dir = TestDir::new().expect("create test dir");
//! FileTree::new()
//!     .text_file("BUILD.bazel", "")
//!     .text_file("pkg/a.go", "package pkg")
//!     .dir("empty")
//!     .create_in(&dir)
//!     .expect("create tree");
//! assert!(dir.exists("pkg/a.go"));
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Temporary directory removed when dropped.
#[derive(Debug)]
pub struct TestDir {
    inner: TempDir,
}

impl TestDir {
    /// Creates a fresh temporary directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            inner: tempfile::tempdir()?,
        })
    }

    /// Absolute path of the directory.
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Resolves a slash-separated relative path inside the directory.
    pub fn join(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.path().to_path_buf(), |path, segment| path.join(segment))
    }

    /// Writes `contents` to `rel`, creating parent directories.
    pub fn write_file(&self, rel: &str, contents: impl AsRef<[u8]>) -> io::Result<()> {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    }

    /// Creates the directory `rel` and its parents.
    pub fn create_dir(&self, rel: &str) -> io::Result<()> {
        fs::create_dir_all(self.join(rel))
    }

    /// Creates a symbolic link at `rel` pointing at `target`.
    ///
    /// `target` is used verbatim, so relative targets resolve against the
    /// link's own directory.
    #[cfg(unix)]
    pub fn symlink(&self, target: &str, rel: &str) -> io::Result<()> {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        std::os::unix::fs::symlink(target, path)
    }

    /// Returns true if `rel` exists (following symlinks).
    pub fn exists(&self, rel: &str) -> bool {
        self.join(rel).exists()
    }
}

#[derive(Clone, Debug)]
enum Node {
    File { rel: String, contents: String },
    Dir { rel: String },
    #[cfg(unix)]
    Symlink { rel: String, target: String },
}

/// Declarative list of files, directories and links to create.
///
/// Entries are created in the order they were added.
#[derive(Clone, Debug, Default)]
pub struct FileTree {
    nodes: Vec<Node>,
}

impl FileTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text file.
    pub fn text_file(mut self, rel: &str, contents: &str) -> Self {
        self.nodes.push(Node::File {
            rel: rel.to_owned(),
            contents: contents.to_owned(),
        });
        self
    }

    /// Adds an empty file.
    pub fn file(self, rel: &str) -> Self {
        self.text_file(rel, "")
    }

    /// Adds a directory.
    pub fn dir(mut self, rel: &str) -> Self {
        self.nodes.push(Node::Dir {
            rel: rel.to_owned(),
        });
        self
    }

    /// Adds a symbolic link at `rel` pointing at `target`.
    #[cfg(unix)]
    pub fn symlink(mut self, rel: &str, target: &str) -> Self {
        self.nodes.push(Node::Symlink {
            rel: rel.to_owned(),
            target: target.to_owned(),
        });
        self
    }

    /// Materialises the tree under `dir`.
    pub fn create_in(&self, dir: &TestDir) -> io::Result<()> {
        for node in &self.nodes {
            match node {
                Node::File { rel, contents } => dir.write_file(rel, contents)?,
                Node::Dir { rel } => dir.create_dir(rel)?,
                #[cfg(unix)]
                Node::Symlink { rel, target } => dir.symlink(target, rel)?,
            }
        }
        Ok(())
    }

    /// Materialises the tree in a new temporary directory.
    pub fn build(&self) -> io::Result<TestDir> {
        let dir = TestDir::new()?;
        self.create_in(&dir)?;
        Ok(dir)
    }
}
