//! Custom-instructions editor — plain multi-line text entry.
//!
//! The stored text is loaded when the editor opens; edits stay local until
//! Ctrl+S hands them to the app for a save. Input is ignored while the load
//! is in flight so the arriving text cannot clobber keystrokes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// What a key press in the editor produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    None,
    /// Ctrl+S; the app persists the carried text.
    Save(String),
    /// Esc; unsaved edits are discarded.
    Close,
}

/// Modal editor for the custom-instructions text.
pub struct InstructionsEditor {
    text: String,
    loading: bool,
    /// Edited since the last load or save.
    dirty: bool,
}

impl InstructionsEditor {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            loading: false,
            dirty: false,
        }
    }

    /// Mark the stored text as being fetched; edits are ignored until
    /// [`install`](Self::install) delivers it.
    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Install the stored text, replacing any local state.
    pub fn install(&mut self, text: String) {
        self.text = text;
        self.loading = false;
        self.dirty = false;
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorEvent {
        if key.code == KeyCode::Esc {
            return EditorEvent::Close;
        }
        if self.loading {
            return EditorEvent::None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return EditorEvent::Save(self.text.clone());
        }

        match key.code {
            KeyCode::Enter => {
                self.text.push('\n');
                self.dirty = true;
            }
            KeyCode::Backspace => {
                self.text.pop();
                self.dirty = true;
            }
            KeyCode::Char(c) => {
                self.text.push(c);
                self.dirty = true;
            }
            _ => {}
        }
        EditorEvent::None
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.dirty {
            " Custom Instructions (modified) "
        } else {
            " Custom Instructions "
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // text
                Constraint::Length(1), // hint line
            ])
            .split(inner);

        if self.loading {
            let loading = Paragraph::new("(loading...)").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(loading, chunks[0]);
        } else {
            let lines: Vec<&str> = self.text.split('\n').collect();
            let visible_height = chunks[0].height as usize;
            let scroll = lines.len().saturating_sub(visible_height);

            let text = Paragraph::new(self.text.as_str()).scroll((scroll as u16, 0));
            frame.render_widget(text, chunks[0]);

            let cursor_row = lines.len().saturating_sub(1).saturating_sub(scroll) as u16;
            let cursor_col = lines
                .last()
                .map(|line| line.chars().count())
                .unwrap_or(0) as u16;
            frame.set_cursor_position((
                chunks[0].x + cursor_col.min(chunks[0].width.saturating_sub(1)),
                chunks[0].y + cursor_row,
            ));
        }

        let hint = Paragraph::new("Ctrl+S to save, Esc to cancel")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, chunks[1]);
    }
}

impl Default for InstructionsEditor {
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

    fn type_str(editor: &mut InstructionsEditor, text: &str) {
        for c in text.chars() {
            editor.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_builds_text() {
        let mut editor = InstructionsEditor::new();
        type_str(&mut editor, "Be brief.");
        assert_eq!(editor.text(), "Be brief.");
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_enter_inserts_newline() {
        let mut editor = InstructionsEditor::new();
        type_str(&mut editor, "one");
        editor.handle_key(press(KeyCode::Enter));
        type_str(&mut editor, "two");
        assert_eq!(editor.text(), "one\ntwo");
    }

    #[test]
    fn test_ctrl_s_emits_save_with_text() {
        let mut editor = InstructionsEditor::new();
        type_str(&mut editor, "Rules.");
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(
            editor.handle_key(ctrl_s),
            EditorEvent::Save("Rules.".to_string())
        );
    }

    #[test]
    fn test_plain_s_is_just_a_character() {
        let mut editor = InstructionsEditor::new();
        editor.handle_key(press(KeyCode::Char('s')));
        assert_eq!(editor.text(), "s");
    }

    #[test]
    fn test_esc_closes() {
        let mut editor = InstructionsEditor::new();
        assert_eq!(editor.handle_key(press(KeyCode::Esc)), EditorEvent::Close);
    }

    #[test]
    fn test_loading_ignores_edits_but_allows_close() {
        let mut editor = InstructionsEditor::new();
        editor.begin_loading();
        type_str(&mut editor, "typed too early");
        assert_eq!(editor.text(), "");
        assert_eq!(editor.handle_key(press(KeyCode::Esc)), EditorEvent::Close);
    }

    #[test]
    fn test_install_replaces_text_and_clears_flags() {
        let mut editor = InstructionsEditor::new();
        editor.begin_loading();
        editor.install("Stored text.".to_string());
        assert_eq!(editor.text(), "Stored text.");
        assert!(!editor.is_dirty());

        type_str(&mut editor, "!");
        assert!(editor.is_dirty());
        editor.mark_saved();
        assert!(!editor.is_dirty());
    }
}
