//! TUI panel implementations.
//!
//! Each overlay the workbench can open (directory prompt, file picker,
//! bundle preview, instructions editor, exclusions editor, log viewer) owns
//! its state here; `ui.rs` renders whichever one the current mode selects.

mod exclusions;
mod instructions;
mod logs;
mod picker;
mod preview;
mod prompt;

pub use exclusions::{ExclusionsEditor, ExclusionsEvent};
pub use instructions::{EditorEvent, InstructionsEditor};
pub use logs::LogsPanel;
pub use picker::{FilePicker, PickerOutcome, PLACEHOLDER};
pub use preview::PreviewPane;
pub use prompt::{DirPrompt, PromptEvent};

/// Trait for panels that support scrolling.
pub trait PanelState {
    /// Scroll down by `n` lines.
    fn scroll_down(&mut self, n: usize);

    /// Scroll up by `n` lines.
    fn scroll_up(&mut self, n: usize);

    /// Scroll to the very top.
    fn scroll_to_top(&mut self);

    /// Scroll to the very bottom.
    fn scroll_to_bottom(&mut self);
}
