//! Directory prompt — single-line path input.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// What a key press in the prompt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    None,
    /// Enter on a non-blank path.
    Submit(String),
    /// Esc; the prompt closes without browsing.
    Cancel,
}

/// Modal input for the directory path to browse.
pub struct DirPrompt {
    input: String,
    /// Inline validation error, cleared on the next edit.
    error: Option<String>,
}

impl DirPrompt {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            error: None,
        }
    }

    /// Reset the prompt, prefilled with the previous path so a typo can be
    /// corrected instead of retyped.
    pub fn open(&mut self, prefill: &str) {
        self.input = prefill.to_string();
        self.error = None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptEvent {
        match key.code {
            KeyCode::Esc => PromptEvent::Cancel,
            KeyCode::Enter => {
                let path = self.input.trim().to_string();
                if path.is_empty() {
                    self.error = Some("Directory path cannot be empty.".to_string());
                    PromptEvent::None
                } else {
                    PromptEvent::Submit(path)
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
                PromptEvent::None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.error = None;
                PromptEvent::None
            }
            _ => PromptEvent::None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Select Directory ")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // input line
                Constraint::Length(1), // error / hint line
            ])
            .split(inner);

        let input = Paragraph::new(format!("> {}", self.input));
        frame.render_widget(input, chunks[0]);
        frame.set_cursor_position((
            chunks[0].x + 2 + self.input.chars().count() as u16,
            chunks[0].y,
        ));

        let footer = match &self.error {
            Some(error) => Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            None => Paragraph::new("Enter to browse, Esc to cancel")
                .style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(footer, chunks[1]);
    }
}

impl Default for DirPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(prompt: &mut DirPrompt, text: &str) {
        for c in text.chars() {
            prompt.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_submit_trims_input() {
        let mut prompt = DirPrompt::new();
        type_str(&mut prompt, "  /tmp/project  ");
        assert_eq!(
            prompt.handle_key(press(KeyCode::Enter)),
            PromptEvent::Submit("/tmp/project".to_string())
        );
    }

    #[test]
    fn test_blank_submit_sets_error() {
        let mut prompt = DirPrompt::new();
        type_str(&mut prompt, "   ");
        assert_eq!(prompt.handle_key(press(KeyCode::Enter)), PromptEvent::None);
        assert_eq!(
            prompt.error.as_deref(),
            Some("Directory path cannot be empty.")
        );
    }

    #[test]
    fn test_editing_clears_error() {
        let mut prompt = DirPrompt::new();
        prompt.handle_key(press(KeyCode::Enter));
        assert!(prompt.error.is_some());
        prompt.handle_key(press(KeyCode::Char('/')));
        assert!(prompt.error.is_none());
    }

    #[test]
    fn test_open_prefills_and_resets_error() {
        let mut prompt = DirPrompt::new();
        prompt.handle_key(press(KeyCode::Enter));
        assert!(prompt.error.is_some());

        prompt.open("/home/user/project");
        assert_eq!(prompt.input, "/home/user/project");
        assert!(prompt.error.is_none());
    }

    #[test]
    fn test_esc_cancels() {
        let mut prompt = DirPrompt::new();
        type_str(&mut prompt, "/tmp");
        assert_eq!(prompt.handle_key(press(KeyCode::Esc)), PromptEvent::Cancel);
    }

    #[test]
    fn test_backspace_edits() {
        let mut prompt = DirPrompt::new();
        type_str(&mut prompt, "/tmpx");
        prompt.handle_key(press(KeyCode::Backspace));
        assert_eq!(prompt.input, "/tmp");
    }
}
