//! System clipboard access behind a trait so tests can capture copies.

use anyhow::Context;

/// Destination for the assembled bundle text.
pub trait Clipboard: Send {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// Clipboard backed by the OS via `arboard`. A fresh handle is opened per
/// copy so a failed platform init surfaces as a toast on that copy instead
/// of aborting startup.
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        let mut handle = arboard::Clipboard::new().context("clipboard unavailable")?;
        handle
            .set_text(text.to_string())
            .context("failed to write to clipboard")?;
        Ok(())
    }
}
