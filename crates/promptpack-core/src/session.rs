//! Directory session identity.
//!
//! Every browse attempt is tagged with a fresh [`SessionId`]. Async results
//! (browse completions, recounts) carry the id they were spawned under, and
//! results arriving with a stale id are discarded, so switching directories
//! mid-flight can never bleed one project's data into another's view.

use std::path::{Path, PathBuf};

use crate::gateway::types::FileEntry;
use crate::tree::TreeNode;

/// Identity of one browse attempt / installed directory session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Hands out strictly increasing session ids.
#[derive(Debug, Default)]
pub struct SessionAllocator {
    next: u64,
}

impl SessionAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> SessionId {
        self.next += 1;
        SessionId(self.next)
    }
}

/// A successfully browsed directory: its id, root, and discovered files.
///
/// Installed only when a browse succeeds; a failed browse leaves the
/// previous session untouched.
#[derive(Debug, Clone)]
pub struct DirectorySession {
    pub id: SessionId,
    pub root: PathBuf,
    pub files: Vec<FileEntry>,
    pub tree: Vec<TreeNode>,
}

impl DirectorySession {
    /// Project name for the header: the last path component.
    pub fn display_name(&self) -> String {
        project_name(&self.root).unwrap_or_else(|| self.root.display().to_string())
    }

    /// Look up the listing entry for an absolute path.
    pub fn entry_for(&self, path: &Path) -> Option<&FileEntry> {
        self.files.iter().find(|entry| entry.path == path)
    }
}

/// Last path component of a root, tolerating trailing separators.
pub fn project_name(root: &Path) -> Option<String> {
    root.file_name().map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_allocator_is_strictly_increasing() {
        let mut alloc = SessionAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_ne!(a, b);
        assert_eq!(alloc.allocate(), SessionId(3));
    }

    #[test]
    fn test_project_name_takes_last_component() {
        assert_eq!(
            project_name(Path::new("/home/me/projects/widget")),
            Some("widget".to_string())
        );
    }

    #[test]
    fn test_project_name_tolerates_trailing_slash() {
        assert_eq!(
            project_name(Path::new("/home/me/projects/widget/")),
            Some("widget".to_string())
        );
    }

    #[test]
    fn test_project_name_of_root_is_none() {
        assert_eq!(project_name(Path::new("/")), None);
    }

    #[test]
    fn test_display_name_falls_back_to_full_path() {
        let session = DirectorySession {
            id: SessionId(1),
            root: PathBuf::from("/"),
            files: Vec::new(),
            tree: Vec::new(),
        };
        assert_eq!(session.display_name(), "/");
    }

    #[test]
    fn test_entry_lookup() {
        let entry = FileEntry {
            name: "main.rs".to_string(),
            path: PathBuf::from("/project/src/main.rs"),
            relative_path: "src/main.rs".to_string(),
            size_bytes: 42,
        };
        let session = DirectorySession {
            id: SessionId(1),
            root: PathBuf::from("/project"),
            files: vec![entry],
            tree: Vec::new(),
        };
        assert!(session.entry_for(Path::new("/project/src/main.rs")).is_some());
        assert!(session.entry_for(Path::new("/project/src/lib.rs")).is_none());
    }
}
