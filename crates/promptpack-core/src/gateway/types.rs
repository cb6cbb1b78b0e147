//! Shared request/response types for the gateway.
//!
//! These are the shapes both frontends consume and every backend produces.
//! They serialize as JSON so the stores on disk and any future remote
//! backend speak the same dialect.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::tree::TreeNode;

/// One file discovered by a directory browse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Base name of the file.
    pub name: String,
    /// Absolute path.
    pub path: PathBuf,
    /// Path relative to the browsed root, always forward-slash separated.
    pub relative_path: String,
    /// Size on disk in bytes.
    pub size_bytes: u64,
}

/// Result of a directory browse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseResponse {
    /// Flat listing, sorted by relative path (case-insensitive).
    pub files: Vec<FileEntry>,
    /// The same files arranged as a nested tree.
    pub tree: Vec<TreeNode>,
}

/// Line count for a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineCountResponse {
    pub line_count: u64,
}

/// One file's content as returned by a context fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFile {
    /// Display path (relative to the browsed root where possible).
    pub path: String,
    pub content: String,
}

/// Result of a context fetch. May hold fewer entries than were requested;
/// `error` then notes what was dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextResponse {
    pub files: Vec<ContextFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Stored custom-instructions text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstructionsResponse {
    pub instructions: String,
}

/// Acknowledgement for a store write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedResponse {
    pub message: String,
}

/// Exclusion rules applied during a browse.
///
/// `exclude_dirs` match directory names anywhere in the walk (pruning the
/// whole subtree), `exclude_files` match file names exactly, and
/// `exclude_patterns` are glob patterns matched against file names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRules {
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
    #[serde(default)]
    pub exclude_files: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl ExclusionRules {
    /// True when no rule is present in any list.
    pub fn is_empty(&self) -> bool {
        self.exclude_dirs.is_empty()
            && self.exclude_files.is_empty()
            && self.exclude_patterns.is_empty()
    }
}
