//! Context bundle assembly.
//!
//! One [`assemble`] call produces the [`ContextBundle`] that both the copy
//! and preview paths consume, so the clipboard text and the preview blocks
//! always carry identical (path, content) pairs in identical order.
//!
//! Instructions are soft: a failed instructions fetch degrades to a bundle
//! without them as long as files are available. File fetches degrade the
//! other way: when instructions exist, a failed content fetch produces an
//! instructions-only bundle carrying a note. Only a bundle with nothing
//! usable at all is an error.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::gateway::{ContextFile, Gateway, GatewayError};

/// Header line introducing the instructions block.
pub const INSTRUCTIONS_HEADER: &str = "Custom Instructions for LLM";

/// Rule separating the instructions block from the file blocks.
const SECTION_DELIMITER: &str = "\n\n---\n\n";

/// Why no bundle could be assembled.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    /// Instructions could not be loaded and nothing else was selected.
    #[error("failed to load custom instructions and no files are selected")]
    InstructionsUnavailable(#[source] GatewayError),

    /// File contents could not be fetched and there were no instructions to
    /// fall back on.
    #[error("failed to fetch file contents: {0}")]
    ContextFetch(String),

    /// Nothing selected and no stored instructions.
    #[error("no content selected or available")]
    Empty,
}

/// The assembled context: instructions, file blocks, and an optional
/// degradation note.
#[derive(Debug, Clone, Default)]
pub struct ContextBundle {
    /// Raw instructions text; `Some` only when non-blank.
    pub instructions: Option<String>,
    /// Selected file contents, in selection (row) order.
    pub files: Vec<ContextFile>,
    /// Set when part of the fetch was dropped or failed.
    pub note: Option<String>,
}

impl ContextBundle {
    pub fn is_empty(&self) -> bool {
        self.instructions.is_none() && self.files.is_empty()
    }

    /// Render the flat text that goes to the clipboard.
    ///
    /// The instructions header and a `User Instructions:` line come first,
    /// followed by a `---` rule only when file blocks follow, then one
    /// fenced block per file introduced by a `File:` line. The result is
    /// trimmed.
    pub fn clipboard_text(&self) -> String {
        let mut text = String::new();
        if let Some(instructions) = &self.instructions {
            text.push_str(INSTRUCTIONS_HEADER);
            text.push('\n');
            text.push_str("User Instructions: ");
            text.push_str(instructions);
            if !self.files.is_empty() {
                text.push_str(SECTION_DELIMITER);
            }
        }
        let blocks: Vec<String> = self
            .files
            .iter()
            .map(|file| format!("File: {}\n```\n{}\n```\n", file.path, file.content))
            .collect();
        text.push_str(&blocks.join("\n"));
        text.trim().to_string()
    }

    /// Fragment for the copy toast: `"custom instructions and 2 file(s)"`.
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.instructions.is_some() {
            parts.push("custom instructions".to_string());
        }
        if !self.files.is_empty() {
            parts.push(format!("{} file(s)", self.files.len()));
        }
        if parts.is_empty() {
            "context".to_string()
        } else {
            parts.join(" and ")
        }
    }
}

/// What the instructions fetch produced.
enum Instructions {
    Present(String),
    Absent,
    Failed(GatewayError),
}

impl Instructions {
    fn into_option(self) -> Option<String> {
        match self {
            Instructions::Present(text) => Some(text),
            Instructions::Absent | Instructions::Failed(_) => None,
        }
    }
}

/// Assemble the context bundle for the given selection.
pub async fn assemble(
    gateway: &dyn Gateway,
    selected: &[PathBuf],
    directory: &Path,
) -> Result<ContextBundle, AssembleError> {
    let instructions = match gateway.custom_instructions().await {
        Ok(resp) => {
            let trimmed = resp.instructions.trim();
            if trimmed.is_empty() {
                Instructions::Absent
            } else {
                Instructions::Present(trimmed.to_string())
            }
        }
        Err(err) => {
            warn!(%err, "custom instructions unavailable, proceeding without them");
            Instructions::Failed(err)
        }
    };

    if selected.is_empty() {
        return match instructions {
            Instructions::Present(text) => Ok(ContextBundle {
                instructions: Some(text),
                ..Default::default()
            }),
            Instructions::Absent => Err(AssembleError::Empty),
            Instructions::Failed(err) => Err(AssembleError::InstructionsUnavailable(err)),
        };
    }

    match gateway
        .context(selected.to_vec(), directory.to_path_buf())
        .await
    {
        Ok(resp) => {
            let instructions = instructions.into_option();
            if resp.files.is_empty() {
                match (instructions, resp.error) {
                    (Some(text), note) => Ok(ContextBundle {
                        instructions: Some(text),
                        files: Vec::new(),
                        note,
                    }),
                    (None, Some(error)) => Err(AssembleError::ContextFetch(error)),
                    (None, None) => Err(AssembleError::Empty),
                }
            } else {
                Ok(ContextBundle {
                    instructions,
                    files: resp.files,
                    note: resp.error,
                })
            }
        }
        Err(err) => match instructions {
            Instructions::Present(text) => Ok(ContextBundle {
                instructions: Some(text),
                files: Vec::new(),
                note: Some(format!("File contents unavailable: {err}")),
            }),
            Instructions::Absent | Instructions::Failed(_) => {
                Err(AssembleError::ContextFetch(err.to_string()))
            }
        },
    }
}
