//! Hierarchical file tree model.
//!
//! The browse response carries the discovered files twice: as a flat sorted
//! list and as this nested tree, which is what the file picker renders.
//! Folders are plain grouping nodes; only file nodes carry paths and sizes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::gateway::types::FileEntry;

/// One node of the file tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Folder {
        name: String,
        children: Vec<TreeNode>,
    },
    File {
        name: String,
        path: PathBuf,
        relative_path: String,
        size_bytes: u64,
    },
}

impl TreeNode {
    /// Display name of the node.
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Folder { name, .. } | TreeNode::File { name, .. } => name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, TreeNode::Folder { .. })
    }
}

/// Build the nested tree from a flat file listing.
///
/// Within every folder, subfolders come before files, each group in
/// case-insensitive alphabetical order.
pub fn build_tree(files: &[FileEntry]) -> Vec<TreeNode> {
    let mut root = FolderAcc::default();
    for entry in files {
        let components: Vec<&str> = entry.relative_path.split('/').collect();
        let mut cursor = &mut root;
        for dir in &components[..components.len().saturating_sub(1)] {
            cursor = cursor.folders.entry((*dir).to_string()).or_default();
        }
        cursor.files.push(TreeNode::File {
            name: entry.name.clone(),
            path: entry.path.clone(),
            relative_path: entry.relative_path.clone(),
            size_bytes: entry.size_bytes,
        });
    }
    root.into_nodes()
}

/// Depth-first search for the file node with the given absolute path.
pub fn find_file<'a>(nodes: &'a [TreeNode], path: &Path) -> Option<&'a TreeNode> {
    for node in nodes {
        match node {
            TreeNode::File { path: candidate, .. } if candidate == path => return Some(node),
            TreeNode::Folder { children, .. } => {
                if let Some(found) = find_file(children, path) {
                    return Some(found);
                }
            }
            TreeNode::File { .. } => {}
        }
    }
    None
}

/// Accumulator for one folder while the tree is being grouped.
#[derive(Default)]
struct FolderAcc {
    folders: HashMap<String, FolderAcc>,
    files: Vec<TreeNode>,
}

impl FolderAcc {
    fn into_nodes(self) -> Vec<TreeNode> {
        let mut folders: Vec<(String, FolderAcc)> = self.folders.into_iter().collect();
        folders.sort_by_key(|(name, _)| name.to_lowercase());

        let mut nodes: Vec<TreeNode> = folders
            .into_iter()
            .map(|(name, acc)| TreeNode::Folder {
                name,
                children: acc.into_nodes(),
            })
            .collect();

        let mut files = self.files;
        files.sort_by_key(|node| node.name().to_lowercase());
        nodes.extend(files);
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(relative: &str, size: u64) -> FileEntry {
        let name = relative.rsplit('/').next().unwrap_or(relative).to_string();
        FileEntry {
            name,
            path: PathBuf::from(format!("/project/{relative}")),
            relative_path: relative.to_string(),
            size_bytes: size,
        }
    }

    #[test]
    fn test_build_tree_nests_by_relative_path() {
        let files = [
            entry("src/main.rs", 100),
            entry("src/lib.rs", 50),
            entry("README.md", 10),
        ];
        let tree = build_tree(&files);

        assert_eq!(tree.len(), 2);
        match &tree[0] {
            TreeNode::Folder { name, children } => {
                assert_eq!(name, "src");
                assert_eq!(children.len(), 2);
                assert_eq!(children[0].name(), "lib.rs");
                assert_eq!(children[1].name(), "main.rs");
            }
            other => panic!("expected folder, got {other:?}"),
        }
        assert_eq!(tree[1].name(), "README.md");
    }

    #[test]
    fn test_build_tree_folders_before_files() {
        let files = [entry("zeta.txt", 1), entry("alpha/inner.txt", 1)];
        let tree = build_tree(&files);
        assert!(tree[0].is_folder());
        assert_eq!(tree[0].name(), "alpha");
        assert_eq!(tree[1].name(), "zeta.txt");
    }

    #[test]
    fn test_build_tree_sorting_is_case_insensitive() {
        let files = [
            entry("Zare.txt", 1),
            entry("apple.txt", 1),
            entry("Banana.txt", 1),
        ];
        let tree = build_tree(&files);
        let names: Vec<&str> = tree.iter().map(TreeNode::name).collect();
        assert_eq!(names, vec!["apple.txt", "Banana.txt", "Zare.txt"]);
    }

    #[test]
    fn test_build_tree_deep_nesting() {
        let files = [entry("a/b/c/deep.rs", 7)];
        let tree = build_tree(&files);
        let mut node = &tree[0];
        for expected in ["a", "b", "c"] {
            match node {
                TreeNode::Folder { name, children } => {
                    assert_eq!(name, expected);
                    node = &children[0];
                }
                other => panic!("expected folder {expected}, got {other:?}"),
            }
        }
        assert_eq!(node.name(), "deep.rs");
    }

    #[test]
    fn test_find_file_hits_nested_node() {
        let files = [entry("src/main.rs", 100), entry("docs/guide.md", 20)];
        let tree = build_tree(&files);

        let found = find_file(&tree, Path::new("/project/src/main.rs")).unwrap();
        assert_eq!(found.name(), "main.rs");
    }

    #[test]
    fn test_find_file_misses_unknown_path() {
        let files = [entry("src/main.rs", 100)];
        let tree = build_tree(&files);
        assert!(find_file(&tree, Path::new("/project/src/other.rs")).is_none());
    }

    #[test]
    fn test_tree_node_serializes_with_type_tag() {
        let files = [entry("src/main.rs", 100)];
        let tree = build_tree(&files);
        let value = serde_json::to_value(&tree).unwrap();

        assert_eq!(value[0]["type"], "folder");
        assert_eq!(value[0]["children"][0]["type"], "file");
        assert_eq!(value[0]["children"][0]["relative_path"], "src/main.rs");
    }
}
