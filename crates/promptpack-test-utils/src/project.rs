//! On-disk project fixtures.
//!
//! [`ProjectBuilder`] lays out a small file tree inside a temp directory for
//! tests that exercise real filesystem walks and reads.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A test-scoped directory tree with an owned temp directory.
///
/// The temp directory is deleted automatically when this value is dropped,
/// guaranteeing cleanup even on panic.
///
/// # Example
///
/// ```ignore
/// let project = ProjectBuilder::new()
///     .file("src/main.rs", "fn main() {}\n")
///     .file("README.md", "# demo\n");
/// walk(project.root());
/// ```
pub struct ProjectBuilder {
    dir: TempDir,
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Write a file at `relative` (forward-slash separated), creating parent
    /// directories as needed.
    pub fn file(self, relative: &str, content: &str) -> Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create fixture dirs");
        }
        std::fs::write(&path, content).expect("failed to write fixture file");
        self
    }

    /// Root of the fixture tree.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a fixture file.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}
