//! Ordered file-selection rows.
//!
//! The user builds a selection as a list of rows, each holding a checkbox and
//! an optionally chosen file. Row order is creation order and that order is
//! what the assembler honors, regardless of how the rows are rendered or
//! which row was edited last.

use std::path::PathBuf;

use crate::gateway::types::FileEntry;

/// Identifier of one selection row. Unique and strictly increasing until
/// [`SelectionState::clear_all`] resets the counter.
pub type RowId = u64;

/// One selection row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub id: RowId,
    /// Whether the row participates in the selection.
    pub checked: bool,
    /// Chosen file, if any.
    pub path: Option<PathBuf>,
}

impl FileRow {
    /// A checked row with a chosen file contributes to the selection.
    pub fn contributes(&self) -> bool {
        self.checked && self.path.is_some()
    }
}

/// The ordered set of selection rows.
///
/// Mutations that can change the selected set mark a recount flag; the
/// owner drains it with [`take_recount_needed`](Self::take_recount_needed)
/// and schedules at most one recount at a time.
#[derive(Debug)]
pub struct SelectionState {
    rows: Vec<FileRow>,
    next_id: RowId,
    recount_needed: bool,
}

impl SelectionState {
    /// A fresh selection: one unchecked, fileless row with id 1.
    pub fn new() -> Self {
        let mut state = Self {
            rows: Vec::new(),
            next_id: 0,
            recount_needed: false,
        };
        state.push_row();
        state
    }

    fn push_row(&mut self) -> RowId {
        self.next_id += 1;
        let id = self.next_id;
        self.rows.push(FileRow {
            id,
            checked: false,
            path: None,
        });
        id
    }

    /// Append a new unchecked, fileless row and return its id.
    ///
    /// A fresh row cannot change the selected set, so no recount is marked.
    pub fn add_row(&mut self) -> RowId {
        self.push_row()
    }

    /// Remove the row with the given id. Unknown ids are a no-op.
    pub fn remove_row(&mut self, id: RowId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        let removed = self.rows.len() != before;
        if removed {
            self.recount_needed = true;
        }
        removed
    }

    /// Set or clear the file chosen for a row. Unknown ids are a no-op.
    pub fn set_row_file(&mut self, id: RowId, path: Option<PathBuf>) -> bool {
        match self.row_mut(id) {
            Some(row) => {
                row.path = path;
                self.recount_needed = true;
                true
            }
            None => false,
        }
    }

    /// Set a row's checkbox. Unknown ids are a no-op.
    pub fn set_row_checked(&mut self, id: RowId, checked: bool) -> bool {
        match self.row_mut(id) {
            Some(row) => {
                row.checked = checked;
                self.recount_needed = true;
                true
            }
            None => false,
        }
    }

    /// Flip a row's checkbox, returning the new state.
    pub fn toggle_row(&mut self, id: RowId) -> Option<bool> {
        let row = self.row_mut(id)?;
        row.checked = !row.checked;
        let checked = row.checked;
        self.recount_needed = true;
        Some(checked)
    }

    /// Drop every row, reset the id counter, and add one fresh row (which
    /// therefore gets id 1 again).
    pub fn clear_all(&mut self) {
        self.rows.clear();
        self.next_id = 0;
        self.push_row();
        self.recount_needed = true;
    }

    /// Clear the path of any row whose file is no longer in the available
    /// listing. Returns how many rows were cleared. Rows themselves (and
    /// their checkboxes) survive.
    pub fn reconcile(&mut self, available: &[FileEntry]) -> usize {
        let mut cleared = 0;
        for row in &mut self.rows {
            if let Some(path) = &row.path {
                if !available.iter().any(|entry| &entry.path == path) {
                    row.path = None;
                    cleared += 1;
                }
            }
        }
        if cleared > 0 {
            self.recount_needed = true;
        }
        cleared
    }

    pub fn rows(&self) -> &[FileRow] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&FileRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    fn row_mut(&mut self, id: RowId) -> Option<&mut FileRow> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Paths of checked rows with a chosen file, in row-creation order.
    /// A path chosen in two rows appears twice.
    pub fn selected_files(&self) -> Vec<PathBuf> {
        self.rows
            .iter()
            .filter(|row| row.contributes())
            .filter_map(|row| row.path.clone())
            .collect()
    }

    /// Force a recount on the next drain.
    pub fn mark_recount(&mut self) {
        self.recount_needed = true;
    }

    /// Drain the recount flag.
    pub fn take_recount_needed(&mut self) -> bool {
        std::mem::take(&mut self.recount_needed)
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn entry(relative: &str) -> FileEntry {
        FileEntry {
            name: relative.rsplit('/').next().unwrap_or(relative).to_string(),
            path: PathBuf::from(format!("/project/{relative}")),
            relative_path: relative.to_string(),
            size_bytes: 1,
        }
    }

    #[test]
    fn test_new_state_has_one_fresh_row() {
        let state = SelectionState::new();
        assert_eq!(state.len(), 1);
        let row = &state.rows()[0];
        assert_eq!(row.id, 1);
        assert!(!row.checked);
        assert!(row.path.is_none());
    }

    #[test]
    fn test_row_ids_are_monotonic() {
        let mut state = SelectionState::new();
        let second = state.add_row();
        let third = state.add_row();
        assert_eq!(second, 2);
        assert_eq!(third, 3);
    }

    #[test]
    fn test_removed_ids_are_not_reused() {
        let mut state = SelectionState::new();
        let second = state.add_row();
        assert!(state.remove_row(second));
        assert_eq!(state.add_row(), 3);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut state = SelectionState::new();
        state.take_recount_needed();
        assert!(!state.remove_row(99));
        assert_eq!(state.len(), 1);
        assert!(!state.take_recount_needed());
    }

    #[test]
    fn test_remove_preserves_relative_order() {
        let mut state = SelectionState::new();
        let b = state.add_row();
        state.add_row();
        state.remove_row(b);
        let ids: Vec<RowId> = state.rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_clear_all_resets_counter_and_leaves_one_row() {
        let mut state = SelectionState::new();
        state.add_row();
        state.add_row();
        state.set_row_file(1, Some(PathBuf::from("/project/a.rs")));
        state.set_row_checked(1, true);

        state.clear_all();

        assert_eq!(state.len(), 1);
        let row = &state.rows()[0];
        assert_eq!(row.id, 1);
        assert!(!row.checked);
        assert!(row.path.is_none());
        assert!(state.selected_files().is_empty());
        // Counter restarted: the next row is 2, not a continuation
        assert_eq!(state.add_row(), 2);
    }

    #[test]
    fn test_selected_files_in_creation_order() {
        let mut state = SelectionState::new();
        let second = state.add_row();
        let third = state.add_row();

        // Assign out of creation order
        state.set_row_file(third, Some(PathBuf::from("/p/c.rs")));
        state.set_row_file(1, Some(PathBuf::from("/p/a.rs")));
        state.set_row_file(second, Some(PathBuf::from("/p/b.rs")));
        for id in [third, 1, second] {
            state.set_row_checked(id, true);
        }

        assert_eq!(
            state.selected_files(),
            vec![
                PathBuf::from("/p/a.rs"),
                PathBuf::from("/p/b.rs"),
                PathBuf::from("/p/c.rs"),
            ]
        );
    }

    #[test]
    fn test_selected_files_skips_unchecked_and_fileless() {
        let mut state = SelectionState::new();
        let second = state.add_row();
        let third = state.add_row();

        state.set_row_file(1, Some(PathBuf::from("/p/a.rs")));
        state.set_row_checked(1, true);
        state.set_row_file(second, Some(PathBuf::from("/p/b.rs")));
        state.set_row_checked(second, false);
        // `third` is checked but never gets a file
        state.set_row_checked(third, true);

        assert_eq!(state.selected_files(), vec![PathBuf::from("/p/a.rs")]);
    }

    #[test]
    fn test_duplicate_paths_appear_twice() {
        let mut state = SelectionState::new();
        let second = state.add_row();
        state.set_row_file(1, Some(PathBuf::from("/p/a.rs")));
        state.set_row_file(second, Some(PathBuf::from("/p/a.rs")));
        state.set_row_checked(1, true);
        state.set_row_checked(second, true);
        assert_eq!(state.selected_files().len(), 2);
    }

    #[test]
    fn test_toggle_row_flips_state() {
        let mut state = SelectionState::new();
        assert_eq!(state.toggle_row(1), Some(true));
        assert_eq!(state.toggle_row(1), Some(false));
        assert_eq!(state.toggle_row(42), None);
    }

    #[test]
    fn test_reconcile_clears_vanished_paths() {
        let mut state = SelectionState::new();
        let second = state.add_row();
        state.set_row_file(1, Some(PathBuf::from("/project/kept.rs")));
        state.set_row_file(second, Some(PathBuf::from("/project/gone.rs")));
        state.set_row_checked(second, true);

        let cleared = state.reconcile(&[entry("kept.rs")]);

        assert_eq!(cleared, 1);
        assert_eq!(state.row(1).unwrap().path.as_deref(), Some(Path::new("/project/kept.rs")));
        assert!(state.row(second).unwrap().path.is_none());
        assert!(state.row(second).unwrap().checked);
    }

    #[test]
    fn test_reconcile_with_all_present_is_quiet() {
        let mut state = SelectionState::new();
        state.set_row_file(1, Some(PathBuf::from("/project/kept.rs")));
        state.take_recount_needed();

        assert_eq!(state.reconcile(&[entry("kept.rs")]), 0);
        assert!(!state.take_recount_needed());
    }

    // ── Recount flag ─────────────────────────────────────────────────

    #[test]
    fn test_add_row_does_not_mark_recount() {
        let mut state = SelectionState::new();
        state.take_recount_needed();
        state.add_row();
        assert!(!state.take_recount_needed());
    }

    #[test]
    fn test_mutations_mark_recount() {
        let mut state = SelectionState::new();
        state.take_recount_needed();

        state.set_row_file(1, Some(PathBuf::from("/p/a.rs")));
        assert!(state.take_recount_needed());

        state.set_row_checked(1, true);
        assert!(state.take_recount_needed());

        state.clear_all();
        assert!(state.take_recount_needed());
    }

    #[test]
    fn test_take_recount_drains_flag() {
        let mut state = SelectionState::new();
        state.mark_recount();
        assert!(state.take_recount_needed());
        assert!(!state.take_recount_needed());
    }
}
