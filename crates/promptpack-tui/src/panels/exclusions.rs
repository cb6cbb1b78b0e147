//! Exclusions editor — three rule lists with add/delete and a text input.
//!
//! Directory names, file names, and glob patterns live in separate sections;
//! Tab cycles between them. Adding an entry drops into a one-line input;
//! blank and duplicate values are rejected without comment, keeping the
//! buffer so the value can be corrected. Edits stay local until Ctrl+S.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use promptpack_core::gateway::ExclusionRules;

/// What a key press in the editor produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionsEvent {
    None,
    /// Ctrl+S; the app persists the carried rules.
    Save(ExclusionRules),
    /// Esc; unsaved edits are discarded.
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Dirs,
    Files,
    Patterns,
}

impl Section {
    fn next(self) -> Self {
        match self {
            Section::Dirs => Section::Files,
            Section::Files => Section::Patterns,
            Section::Patterns => Section::Dirs,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Section::Dirs => "Directories",
            Section::Files => "Files",
            Section::Patterns => "Patterns",
        }
    }
}

/// Modal editor for the stored exclusion rules.
pub struct ExclusionsEditor {
    rules: ExclusionRules,
    section: Section,
    /// Index of the highlighted entry in the active section.
    selected: usize,
    /// Pending new-entry text; `Some` while the input line is active.
    input: Option<String>,
    loading: bool,
    /// Edited since the last load or save.
    dirty: bool,
}

impl ExclusionsEditor {
    pub fn new() -> Self {
        Self {
            rules: ExclusionRules::default(),
            section: Section::Dirs,
            selected: 0,
            input: None,
            loading: false,
            dirty: false,
        }
    }

    /// Mark the stored rules as being fetched; edits are ignored until
    /// [`install`](Self::install) delivers them.
    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Install the stored rules, replacing any local state.
    pub fn install(&mut self, rules: ExclusionRules) {
        self.rules = rules;
        self.section = Section::Dirs;
        self.selected = 0;
        self.input = None;
        self.loading = false;
        self.dirty = false;
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn rules(&self) -> &ExclusionRules {
        &self.rules
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn current_list(&self) -> &[String] {
        match self.section {
            Section::Dirs => &self.rules.exclude_dirs,
            Section::Files => &self.rules.exclude_files,
            Section::Patterns => &self.rules.exclude_patterns,
        }
    }

    fn current_list_mut(&mut self) -> &mut Vec<String> {
        match self.section {
            Section::Dirs => &mut self.rules.exclude_dirs,
            Section::Files => &mut self.rules.exclude_files,
            Section::Patterns => &mut self.rules.exclude_patterns,
        }
    }

    fn clamp_selected(&mut self) {
        self.selected = self
            .selected
            .min(self.current_list().len().saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ExclusionsEvent {
        if self.input.is_some() {
            return self.handle_input_key(key);
        }

        if key.code == KeyCode::Esc {
            return ExclusionsEvent::Close;
        }
        if self.loading {
            return ExclusionsEvent::None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return ExclusionsEvent::Save(self.rules.clone());
        }

        match key.code {
            KeyCode::Tab => {
                self.section = self.section.next();
                self.clamp_selected();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected += 1;
                self.clamp_selected();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char('a') => {
                self.input = Some(String::new());
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if !self.current_list().is_empty() {
                    let index = self.selected.min(self.current_list().len() - 1);
                    self.current_list_mut().remove(index);
                    self.clamp_selected();
                    self.dirty = true;
                }
            }
            _ => {}
        }
        ExclusionsEvent::None
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> ExclusionsEvent {
        match key.code {
            KeyCode::Esc => {
                self.input = None;
            }
            KeyCode::Enter => {
                let value = match &self.input {
                    Some(buffer) => buffer.trim().to_string(),
                    None => return ExclusionsEvent::None,
                };
                // Blank and duplicate entries are dropped silently; the
                // buffer stays so the value can be corrected.
                if !value.is_empty() && !self.current_list().contains(&value) {
                    self.current_list_mut().push(value);
                    self.selected = self.current_list().len() - 1;
                    self.input = None;
                    self.dirty = true;
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.input.as_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = self.input.as_mut() {
                    buffer.push(c);
                }
            }
            _ => {}
        }
        ExclusionsEvent::None
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.dirty {
            " Exclusions (modified) "
        } else {
            " Exclusions "
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // section columns
                Constraint::Length(1), // input line
                Constraint::Length(1), // hint line
            ])
            .split(inner);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(33),
                Constraint::Percentage(34),
            ])
            .split(chunks[0]);

        for (section, column) in [Section::Dirs, Section::Files, Section::Patterns]
            .into_iter()
            .zip(columns.iter())
        {
            self.render_section(frame, *column, section);
        }

        if let Some(buffer) = &self.input {
            let input = Paragraph::new(format!("> {buffer}"));
            frame.render_widget(input, chunks[1]);
            frame.set_cursor_position((
                chunks[1].x + 2 + buffer.chars().count() as u16,
                chunks[1].y,
            ));
        }

        let hint = if self.loading {
            "(loading...)"
        } else if self.input.is_some() {
            "Enter to add, Esc to cancel"
        } else {
            "Tab section, a add, d delete, Ctrl+S save, Esc close"
        };
        let hint = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, chunks[2]);
    }

    fn render_section(&self, frame: &mut Frame, area: Rect, section: Section) {
        let list = match section {
            Section::Dirs => &self.rules.exclude_dirs,
            Section::Files => &self.rules.exclude_files,
            Section::Patterns => &self.rules.exclude_patterns,
        };
        let active = section == self.section;

        let title_style = if active {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title = Span::styled(format!(" {} ({}) ", section.title(), list.len()), title_style);

        let items: Vec<ListItem> = list
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let item = ListItem::new(entry.as_str());
                if active && index == self.selected {
                    item.style(Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    item
                }
            })
            .collect();

        let widget = List::new(items).block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(widget, area);
    }
}

impl Default for ExclusionsEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(editor: &mut ExclusionsEditor, text: &str) {
        for c in text.chars() {
            editor.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn add_entry(editor: &mut ExclusionsEditor, value: &str) {
        editor.handle_key(press(KeyCode::Char('a')));
        type_str(editor, value);
        editor.handle_key(press(KeyCode::Enter));
    }

    #[test]
    fn test_add_to_dirs_section() {
        let mut editor = ExclusionsEditor::new();
        add_entry(&mut editor, "node_modules");

        assert_eq!(editor.rules().exclude_dirs, vec!["node_modules"]);
        assert!(editor.input.is_none());
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_tab_switches_target_section() {
        let mut editor = ExclusionsEditor::new();
        editor.handle_key(press(KeyCode::Tab));
        add_entry(&mut editor, ".env");
        editor.handle_key(press(KeyCode::Tab));
        add_entry(&mut editor, "*.pyc");

        assert!(editor.rules().exclude_dirs.is_empty());
        assert_eq!(editor.rules().exclude_files, vec![".env"]);
        assert_eq!(editor.rules().exclude_patterns, vec!["*.pyc"]);
    }

    #[test]
    fn test_added_value_is_trimmed() {
        let mut editor = ExclusionsEditor::new();
        add_entry(&mut editor, "  target  ");
        assert_eq!(editor.rules().exclude_dirs, vec!["target"]);
    }

    #[test]
    fn test_blank_entry_rejected_keeping_input() {
        let mut editor = ExclusionsEditor::new();
        editor.handle_key(press(KeyCode::Char('a')));
        type_str(&mut editor, "   ");
        editor.handle_key(press(KeyCode::Enter));

        assert!(editor.rules().exclude_dirs.is_empty());
        assert_eq!(editor.input.as_deref(), Some("   "));
    }

    #[test]
    fn test_duplicate_entry_rejected_keeping_input() {
        let mut editor = ExclusionsEditor::new();
        add_entry(&mut editor, "node_modules");
        editor.handle_key(press(KeyCode::Char('a')));
        type_str(&mut editor, "node_modules");
        editor.handle_key(press(KeyCode::Enter));

        assert_eq!(editor.rules().exclude_dirs, vec!["node_modules"]);
        assert_eq!(editor.input.as_deref(), Some("node_modules"));
    }

    #[test]
    fn test_esc_in_input_cancels_input_only() {
        let mut editor = ExclusionsEditor::new();
        editor.handle_key(press(KeyCode::Char('a')));
        type_str(&mut editor, "half-typ");
        assert_eq!(editor.handle_key(press(KeyCode::Esc)), ExclusionsEvent::None);
        assert!(editor.input.is_none());

        // A second Esc closes the editor.
        assert_eq!(editor.handle_key(press(KeyCode::Esc)), ExclusionsEvent::Close);
    }

    #[test]
    fn test_delete_removes_selected_and_clamps() {
        let mut editor = ExclusionsEditor::new();
        add_entry(&mut editor, "one");
        add_entry(&mut editor, "two");
        add_entry(&mut editor, "three");
        assert_eq!(editor.selected, 2);

        editor.handle_key(press(KeyCode::Char('d')));
        assert_eq!(editor.rules().exclude_dirs, vec!["one", "two"]);
        assert_eq!(editor.selected, 1);

        editor.handle_key(press(KeyCode::Char('d')));
        editor.handle_key(press(KeyCode::Char('d')));
        assert!(editor.rules().exclude_dirs.is_empty());
        assert_eq!(editor.selected, 0);

        // Delete on an empty list is a no-op.
        editor.handle_key(press(KeyCode::Char('d')));
        assert!(editor.rules().exclude_dirs.is_empty());
    }

    #[test]
    fn test_ctrl_s_emits_save_with_rules() {
        let mut editor = ExclusionsEditor::new();
        add_entry(&mut editor, "target");
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);

        match editor.handle_key(ctrl_s) {
            ExclusionsEvent::Save(rules) => {
                assert_eq!(rules.exclude_dirs, vec!["target"]);
            }
            other => panic!("expected Save, got {other:?}"),
        }
    }

    #[test]
    fn test_selection_clamped_when_switching_to_shorter_section() {
        let mut editor = ExclusionsEditor::new();
        add_entry(&mut editor, "one");
        add_entry(&mut editor, "two");
        assert_eq!(editor.selected, 1);

        editor.handle_key(press(KeyCode::Tab)); // Files section is empty
        assert_eq!(editor.selected, 0);
    }

    #[test]
    fn test_loading_ignores_edits_but_allows_close() {
        let mut editor = ExclusionsEditor::new();
        editor.begin_loading();
        editor.handle_key(press(KeyCode::Char('a')));
        assert!(editor.input.is_none());
        assert_eq!(editor.handle_key(press(KeyCode::Esc)), ExclusionsEvent::Close);
    }

    #[test]
    fn test_install_replaces_rules() {
        let mut editor = ExclusionsEditor::new();
        add_entry(&mut editor, "local-edit");

        editor.begin_loading();
        editor.install(ExclusionRules {
            exclude_dirs: vec!["node_modules".to_string()],
            exclude_files: Vec::new(),
            exclude_patterns: vec!["*.log".to_string()],
        });

        assert_eq!(editor.rules().exclude_dirs, vec!["node_modules"]);
        assert_eq!(editor.rules().exclude_patterns, vec!["*.log"]);
        assert!(!editor.is_dirty());
        assert!(editor.input.is_none());
    }
}
