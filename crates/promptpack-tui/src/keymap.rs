//! Vim-style keybinding system.
//!
//! Maps key events to actions per mode. Supports single keys and simple
//! two-key sequences (e.g. `gg` for cursor-to-top). Text-entry modes
//! (directory prompt, instructions editor, exclusions editor) never reach
//! the mapper; their panels consume raw key events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Mode;

/// An action the TUI can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    CursorDown,
    CursorUp,
    CursorTop,
    CursorBottom,
    HalfPageDown,
    HalfPageUp,
    AddRow,
    RemoveRow,
    ToggleRow,
    ClearRows,
    Activate,
    ClearValue,
    OpenDirPrompt,
    CopyBundle,
    OpenPreview,
    OpenInstructions,
    OpenExclusions,
    OpenLogs,
    Close,
    None,
}

/// Key mapper with support for multi-key sequences.
pub struct KeyMapper {
    /// Pending first key of a two-key sequence (e.g. the first `g` in `gg`).
    pending: Option<KeyCode>,
}

impl KeyMapper {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Feed a key event and return the resolved action for the given mode.
    ///
    /// If the key starts a multi-key sequence, returns `Action::None` and
    /// waits for the next key. If the sequence is invalid, the pending key
    /// is discarded and the second key is interpreted fresh.
    pub fn resolve(&mut self, mode: Mode, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.pending = None;
            return Action::Quit;
        }

        // Check if we have a pending key from a previous press.
        if let Some(prev) = self.pending.take() {
            return self.resolve_sequence(mode, prev, key);
        }

        match mode {
            Mode::Rows => self.resolve_rows(key.code),
            Mode::Picker => self.resolve_picker(key.code),
            Mode::Preview => self.resolve_preview(key.code),
            Mode::Logs => self.resolve_logs(key.code),
            Mode::DirPrompt | Mode::Instructions | Mode::Exclusions => Action::None,
        }
    }

    fn resolve_rows(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Char('q') => Action::Quit,

            // Cursor movement
            KeyCode::Char('j') | KeyCode::Down => Action::CursorDown,
            KeyCode::Char('k') | KeyCode::Up => Action::CursorUp,
            KeyCode::Char('G') => Action::CursorBottom,

            // Row management
            KeyCode::Char('a') => Action::AddRow,
            KeyCode::Char('d') => Action::RemoveRow,
            KeyCode::Char(' ') => Action::ToggleRow,
            KeyCode::Char('c') => Action::ClearRows,
            KeyCode::Enter => Action::Activate,

            // Workbench surfaces
            KeyCode::Char('o') => Action::OpenDirPrompt,
            KeyCode::Char('y') => Action::CopyBundle,
            KeyCode::Char('p') => Action::OpenPreview,
            KeyCode::Char('i') => Action::OpenInstructions,
            KeyCode::Char('e') => Action::OpenExclusions,
            KeyCode::Char('L') => Action::OpenLogs,

            // Start of multi-key sequence
            KeyCode::Char('g') => {
                self.pending = Some(key);
                Action::None
            }

            _ => Action::None,
        }
    }

    fn resolve_picker(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Esc => Action::Close,
            KeyCode::Char('j') | KeyCode::Down => Action::CursorDown,
            KeyCode::Char('k') | KeyCode::Up => Action::CursorUp,
            KeyCode::Char('G') => Action::CursorBottom,
            KeyCode::Enter | KeyCode::Char(' ') => Action::Activate,
            KeyCode::Char('x') | KeyCode::Delete => Action::ClearValue,
            KeyCode::Char('g') => {
                self.pending = Some(key);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn resolve_preview(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('q') => Action::Close,
            KeyCode::Char('j') | KeyCode::Down => Action::CursorDown,
            KeyCode::Char('k') | KeyCode::Up => Action::CursorUp,
            KeyCode::Char('d') => Action::HalfPageDown,
            KeyCode::Char('u') => Action::HalfPageUp,
            KeyCode::Char('G') => Action::CursorBottom,
            KeyCode::Char('g') => {
                self.pending = Some(key);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn resolve_logs(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Esc | KeyCode::Char('L') | KeyCode::Char('q') => Action::Close,
            KeyCode::Char('j') | KeyCode::Down => Action::CursorDown,
            KeyCode::Char('k') | KeyCode::Up => Action::CursorUp,
            KeyCode::Char('d') => Action::HalfPageDown,
            KeyCode::Char('u') => Action::HalfPageUp,
            KeyCode::Char('G') => Action::CursorBottom,
            KeyCode::Char('g') => {
                self.pending = Some(key);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn resolve_sequence(&mut self, mode: Mode, first: KeyCode, second: KeyEvent) -> Action {
        match (first, second.code) {
            (KeyCode::Char('g'), KeyCode::Char('g')) => Action::CursorTop,
            // Unknown sequence: drop the first key, interpret the second fresh
            _ => self.resolve(mode, second),
        }
    }
}

impl Default for KeyMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_rows_single_keys() {
        let mut km = KeyMapper::new();
        assert_eq!(km.resolve(Mode::Rows, press(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(
            km.resolve(Mode::Rows, press(KeyCode::Char('j'))),
            Action::CursorDown
        );
        assert_eq!(
            km.resolve(Mode::Rows, press(KeyCode::Char('k'))),
            Action::CursorUp
        );
        assert_eq!(
            km.resolve(Mode::Rows, press(KeyCode::Char('a'))),
            Action::AddRow
        );
        assert_eq!(
            km.resolve(Mode::Rows, press(KeyCode::Char('d'))),
            Action::RemoveRow
        );
        assert_eq!(
            km.resolve(Mode::Rows, press(KeyCode::Char(' '))),
            Action::ToggleRow
        );
        assert_eq!(
            km.resolve(Mode::Rows, press(KeyCode::Char('y'))),
            Action::CopyBundle
        );
        assert_eq!(
            km.resolve(Mode::Rows, press(KeyCode::Char('L'))),
            Action::OpenLogs
        );
    }

    #[test]
    fn test_gg_sequence() {
        let mut km = KeyMapper::new();
        assert_eq!(km.resolve(Mode::Rows, press(KeyCode::Char('g'))), Action::None);
        assert_eq!(
            km.resolve(Mode::Rows, press(KeyCode::Char('g'))),
            Action::CursorTop
        );
    }

    #[test]
    fn test_invalid_sequence_falls_through() {
        let mut km = KeyMapper::new();
        // g followed by j should drop g and interpret j
        assert_eq!(km.resolve(Mode::Rows, press(KeyCode::Char('g'))), Action::None);
        assert_eq!(
            km.resolve(Mode::Rows, press(KeyCode::Char('j'))),
            Action::CursorDown
        );
    }

    #[test]
    fn test_ctrl_c_quits_and_clears_pending() {
        let mut km = KeyMapper::new();
        assert_eq!(km.resolve(Mode::Rows, press(KeyCode::Char('g'))), Action::None);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(km.resolve(Mode::Rows, ctrl_c), Action::Quit);
        // The pending g must be gone: the next g starts a fresh sequence.
        assert_eq!(km.resolve(Mode::Rows, press(KeyCode::Char('g'))), Action::None);
    }

    #[test]
    fn test_mode_changes_meaning_of_d() {
        let mut km = KeyMapper::new();
        assert_eq!(
            km.resolve(Mode::Rows, press(KeyCode::Char('d'))),
            Action::RemoveRow
        );
        assert_eq!(
            km.resolve(Mode::Preview, press(KeyCode::Char('d'))),
            Action::HalfPageDown
        );
        assert_eq!(
            km.resolve(Mode::Logs, press(KeyCode::Char('d'))),
            Action::HalfPageDown
        );
    }

    #[test]
    fn test_picker_bindings() {
        let mut km = KeyMapper::new();
        assert_eq!(
            km.resolve(Mode::Picker, press(KeyCode::Enter)),
            Action::Activate
        );
        assert_eq!(
            km.resolve(Mode::Picker, press(KeyCode::Char('x'))),
            Action::ClearValue
        );
        assert_eq!(
            km.resolve(Mode::Picker, press(KeyCode::Delete)),
            Action::ClearValue
        );
        assert_eq!(km.resolve(Mode::Picker, press(KeyCode::Esc)), Action::Close);
    }

    #[test]
    fn test_overlay_close_toggles() {
        let mut km = KeyMapper::new();
        assert_eq!(
            km.resolve(Mode::Preview, press(KeyCode::Char('p'))),
            Action::Close
        );
        assert_eq!(
            km.resolve(Mode::Logs, press(KeyCode::Char('L'))),
            Action::Close
        );
    }

    #[test]
    fn test_editor_modes_resolve_to_none() {
        let mut km = KeyMapper::new();
        assert_eq!(
            km.resolve(Mode::Instructions, press(KeyCode::Char('q'))),
            Action::None
        );
        assert_eq!(
            km.resolve(Mode::DirPrompt, press(KeyCode::Char('j'))),
            Action::None
        );
    }
}
