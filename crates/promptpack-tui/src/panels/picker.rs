//! File picker — collapsible tree of the browsed directory.
//!
//! Folders start collapsed and expand per picker session; expansion state,
//! cursor, and the chosen value all reset when a new tree is loaded. The
//! cursor walks the *visible* rows only, so collapsing a folder never
//! strands it inside a hidden subtree.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use promptpack_core::tree::find_file;
use promptpack_core::{format_file_size, TreeNode};

/// Row label for a selection row with no chosen file.
pub const PLACEHOLDER: &str = "Select a file...";

/// What activating the cursor row produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    /// A file was chosen; `label` is what a selection row displays for it.
    Picked { path: PathBuf, label: String },
    /// A folder was expanded or collapsed.
    Toggled,
    /// Nothing under the cursor (empty tree).
    Nothing,
}

/// One visible line of the tree.
struct VisibleRow<'a> {
    depth: usize,
    /// Slash-joined folder names from the root; keys the expansion set.
    key: String,
    node: &'a TreeNode,
}

enum Target {
    Folder(String),
    File { path: PathBuf, label: String },
}

/// Row label for a chosen file: `"{relative_path} ({formatted size})"`.
fn file_label(relative_path: &str, size_bytes: u64) -> String {
    format!("{relative_path} ({})", format_file_size(size_bytes))
}

/// Modal tree picker for choosing a row's file.
pub struct FilePicker {
    tree: Vec<TreeNode>,
    expanded: HashSet<String>,
    cursor: usize,
    /// The file currently chosen for the row being edited.
    value: Option<PathBuf>,
}

impl FilePicker {
    pub fn new() -> Self {
        Self {
            tree: Vec::new(),
            expanded: HashSet::new(),
            cursor: 0,
            value: None,
        }
    }

    /// Install a fresh tree, resetting expansion, cursor, and value.
    pub fn load(&mut self, tree: &[TreeNode]) {
        self.tree = tree.to_vec();
        self.expanded.clear();
        self.cursor = 0;
        self.value = None;
    }

    /// Set the current value by path, behaving like a user activation:
    /// ancestor folders expand, the cursor lands on the file, and the same
    /// [`PickerOutcome::Picked`] is returned. A path not in the tree is a
    /// no-op leaving the previous value intact.
    pub fn set_value(&mut self, path: &Path) -> PickerOutcome {
        let (relative, label) = match find_file(&self.tree, path) {
            Some(TreeNode::File {
                relative_path,
                size_bytes,
                ..
            }) => (relative_path.clone(), file_label(relative_path, *size_bytes)),
            _ => return PickerOutcome::Nothing,
        };

        let components: Vec<&str> = relative.split('/').collect();
        let mut key = String::new();
        for dir in &components[..components.len().saturating_sub(1)] {
            if !key.is_empty() {
                key.push('/');
            }
            key.push_str(dir);
            self.expanded.insert(key.clone());
        }
        self.value = Some(path.to_path_buf());

        let position = self.visible_rows().iter().position(
            |row| matches!(row.node, TreeNode::File { path: p, .. } if p.as_path() == path),
        );
        if let Some(index) = position {
            self.cursor = index;
        }
        PickerOutcome::Picked {
            path: path.to_path_buf(),
            label,
        }
    }

    pub fn value(&self) -> Option<&Path> {
        self.value.as_deref()
    }

    /// Drop the current value. Returns true when there was one.
    pub fn clear(&mut self) -> bool {
        self.value.take().is_some()
    }

    /// Act on the cursor row: pick a file, or toggle a folder open/closed.
    pub fn activate(&mut self) -> PickerOutcome {
        let target = self
            .visible_rows()
            .get(self.cursor)
            .map(|row| match row.node {
                TreeNode::Folder { .. } => Target::Folder(row.key.clone()),
                TreeNode::File {
                    path,
                    relative_path,
                    size_bytes,
                    ..
                } => Target::File {
                    path: path.clone(),
                    label: file_label(relative_path, *size_bytes),
                },
            });

        match target {
            Some(Target::Folder(key)) => {
                if !self.expanded.remove(&key) {
                    self.expanded.insert(key);
                }
                self.clamp_cursor();
                PickerOutcome::Toggled
            }
            Some(Target::File { path, label }) => {
                self.value = Some(path.clone());
                PickerOutcome::Picked { path, label }
            }
            None => PickerOutcome::Nothing,
        }
    }

    pub fn move_down(&mut self, n: usize) {
        let max = self.visible_rows().len().saturating_sub(1);
        self.cursor = (self.cursor + n).min(max);
    }

    pub fn move_up(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_sub(n);
    }

    pub fn move_top(&mut self) {
        self.cursor = 0;
    }

    pub fn move_bottom(&mut self) {
        self.cursor = self.visible_rows().len().saturating_sub(1);
    }

    fn clamp_cursor(&mut self) {
        let max = self.visible_rows().len().saturating_sub(1);
        self.cursor = self.cursor.min(max);
    }

    fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
        let mut rows = Vec::new();
        Self::collect(&self.tree, "", 0, &self.expanded, &mut rows);
        rows
    }

    fn collect<'a>(
        nodes: &'a [TreeNode],
        parent_key: &str,
        depth: usize,
        expanded: &HashSet<String>,
        out: &mut Vec<VisibleRow<'a>>,
    ) {
        for node in nodes {
            let key = if parent_key.is_empty() {
                node.name().to_string()
            } else {
                format!("{parent_key}/{}", node.name())
            };
            out.push(VisibleRow {
                depth,
                key: key.clone(),
                node,
            });
            if let TreeNode::Folder { children, .. } = node {
                if expanded.contains(&key) {
                    Self::collect(children, &key, depth + 1, expanded, out);
                }
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title(" Select File ").borders(Borders::ALL);

        let rows = self.visible_rows();
        if rows.is_empty() {
            let empty = Paragraph::new("  (no files found)")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let visible_height = area.height.saturating_sub(2) as usize; // minus borders
        let skip = self
            .cursor
            .saturating_sub(visible_height.saturating_sub(1));

        let items: Vec<ListItem> = rows
            .iter()
            .enumerate()
            .skip(skip)
            .take(visible_height)
            .map(|(index, row)| {
                let indent = "  ".repeat(row.depth);
                let line = match row.node {
                    TreeNode::Folder { name, .. } => {
                        let arrow = if self.expanded.contains(&row.key) {
                            "▾"
                        } else {
                            "▸"
                        };
                        Line::from(Span::styled(
                            format!("{indent}{arrow} {name}/"),
                            Style::default().fg(Color::Cyan),
                        ))
                    }
                    TreeNode::File {
                        name,
                        path,
                        size_bytes,
                        ..
                    } => {
                        let chosen = self.value.as_deref() == Some(path.as_path());
                        let marker = if chosen { "●" } else { " " };
                        let style = if chosen {
                            Style::default().fg(Color::Green)
                        } else {
                            Style::default()
                        };
                        Line::from(Span::styled(
                            format!("{indent}{marker} {name} ({})", format_file_size(*size_bytes)),
                            style,
                        ))
                    }
                };
                let item = ListItem::new(line);
                if index == self.cursor {
                    item.style(Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    item
                }
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_widget(list, area);
    }
}

impl Default for FilePicker {
    fn default() -> Self {
        Self::new()
    }
}
