//! Bundle preview — scrollable rendering of the assembled context.
//!
//! Shows exactly what a copy would put on the clipboard: the same bundle,
//! block for block, with the file blocks visually separated by alternating
//! backgrounds instead of a flat text dump.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use promptpack_core::assembler::INSTRUCTIONS_HEADER;
use promptpack_core::ContextBundle;

/// Background for every second file block.
const ALT_BLOCK_BG: Color = Color::Indexed(235);

/// Scrollable preview of an assembled [`ContextBundle`].
pub struct PreviewPane {
    bundle: Option<ContextBundle>,
    /// Lines scrolled past the top.
    scroll: usize,
}

impl PreviewPane {
    pub fn new() -> Self {
        Self {
            bundle: None,
            scroll: 0,
        }
    }

    /// Show a freshly assembled bundle, scrolled to the top.
    pub fn install(&mut self, bundle: ContextBundle) {
        self.bundle = Some(bundle);
        self.scroll = 0;
    }

    /// Drop the bundle; the pane renders its empty message.
    pub fn clear(&mut self) {
        self.bundle = None;
        self.scroll = 0;
    }

    fn build_lines(&self) -> Vec<Line<'_>> {
        let Some(bundle) = &self.bundle else {
            return vec![Line::from(
                "No content to preview (no custom instructions or files selected).",
            )];
        };
        if bundle.is_empty() {
            return vec![Line::from(
                "No content to preview (no custom instructions or files selected).",
            )];
        }

        let mut lines = Vec::new();

        if let Some(note) = &bundle.note {
            lines.push(Line::from(Span::styled(
                format!("Note: {note}"),
                Style::default().fg(Color::Yellow),
            )));
            lines.push(Line::from(""));
        }

        if let Some(instructions) = &bundle.instructions {
            lines.push(Line::from(Span::styled(
                INSTRUCTIONS_HEADER,
                Style::default().add_modifier(Modifier::BOLD),
            )));
            let text = format!("User Instructions: {instructions}");
            for part in text.split('\n') {
                lines.push(Line::from(part.to_string()));
            }
            if !bundle.files.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from("---"));
                lines.push(Line::from(""));
            }
        }

        for (index, file) in bundle.files.iter().enumerate() {
            let block_style = if index % 2 == 1 {
                Style::default().bg(ALT_BLOCK_BG)
            } else {
                Style::default()
            };
            lines.push(Line::styled(
                format!("File: {}", file.path),
                block_style.add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::styled("```".to_string(), block_style));
            for part in file.content.split('\n') {
                lines.push(Line::styled(part.to_string(), block_style));
            }
            lines.push(Line::styled("```".to_string(), block_style));
            if index + 1 < bundle.files.len() {
                lines.push(Line::from(""));
            }
        }

        lines
    }

    fn line_count(&self) -> usize {
        self.build_lines().len()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let total = self.line_count();
        let title = format!(" Context Preview ({total} lines) ");
        let paragraph = Paragraph::new(self.build_lines())
            .block(Block::default().title(title).borders(Borders::ALL))
            .scroll((self.scroll as u16, 0));
        frame.render_widget(paragraph, area);
    }
}

impl super::PanelState for PreviewPane {
    fn scroll_down(&mut self, n: usize) {
        let max = self.line_count().saturating_sub(1);
        self.scroll = (self.scroll + n).min(max);
    }

    fn scroll_up(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_sub(n);
    }

    fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll = self.line_count().saturating_sub(1);
    }
}

impl Default for PreviewPane {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::PanelState;
    use pretty_assertions::assert_eq;
    use promptpack_core::gateway::ContextFile;

    fn file(path: &str, content: &str) -> ContextFile {
        ContextFile {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    fn rendered(pane: &PreviewPane) -> Vec<String> {
        pane.build_lines()
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_empty_pane_shows_placeholder() {
        let pane = PreviewPane::new();
        assert_eq!(
            rendered(&pane),
            vec!["No content to preview (no custom instructions or files selected)."]
        );
    }

    #[test]
    fn test_empty_bundle_shows_placeholder() {
        let mut pane = PreviewPane::new();
        pane.install(ContextBundle::default());
        assert_eq!(
            rendered(&pane),
            vec!["No content to preview (no custom instructions or files selected)."]
        );
    }

    #[test]
    fn test_instructions_and_files_layout() {
        let mut pane = PreviewPane::new();
        pane.install(ContextBundle {
            instructions: Some("Be brief.".to_string()),
            files: vec![file("src/main.rs", "fn main() {}")],
            note: None,
        });

        assert_eq!(
            rendered(&pane),
            vec![
                "Custom Instructions for LLM",
                "User Instructions: Be brief.",
                "",
                "---",
                "",
                "File: src/main.rs",
                "```",
                "fn main() {}",
                "```",
            ]
        );
    }

    #[test]
    fn test_files_only_has_no_rule() {
        let mut pane = PreviewPane::new();
        pane.install(ContextBundle {
            instructions: None,
            files: vec![file("a.txt", "one")],
            note: None,
        });

        assert_eq!(rendered(&pane), vec!["File: a.txt", "```", "one", "```"]);
    }

    #[test]
    fn test_note_renders_first() {
        let mut pane = PreviewPane::new();
        pane.install(ContextBundle {
            instructions: Some("Rules.".to_string()),
            files: Vec::new(),
            note: Some("1 file(s) could not be found".to_string()),
        });

        let lines = rendered(&pane);
        assert_eq!(lines[0], "Note: 1 file(s) could not be found");
    }

    #[test]
    fn test_alternating_file_blocks_differ_in_background() {
        let mut pane = PreviewPane::new();
        pane.install(ContextBundle {
            instructions: None,
            files: vec![file("a.txt", "one"), file("b.txt", "two")],
            note: None,
        });

        let lines = pane.build_lines();
        // "File: a.txt" is line 0, "File: b.txt" starts the second block.
        let first = lines[0].style.bg;
        let second = lines
            .iter()
            .find(|line| {
                line.spans
                    .iter()
                    .any(|span| span.content.as_ref() == "File: b.txt")
            })
            .map(|line| line.style.bg)
            .unwrap();
        assert_eq!(first, None);
        assert_eq!(second, Some(ALT_BLOCK_BG));
    }

    #[test]
    fn test_multiline_content_splits_into_lines() {
        let mut pane = PreviewPane::new();
        pane.install(ContextBundle {
            instructions: None,
            files: vec![file("a.txt", "one\ntwo\nthree")],
            note: None,
        });

        let lines = rendered(&pane);
        assert_eq!(lines, vec!["File: a.txt", "```", "one", "two", "three", "```"]);
    }

    #[test]
    fn test_scroll_clamps_to_content() {
        let mut pane = PreviewPane::new();
        pane.install(ContextBundle {
            instructions: None,
            files: vec![file("a.txt", "one\ntwo")],
            note: None,
        });
        // 5 lines total.
        pane.scroll_down(100);
        assert_eq!(pane.scroll, 4);
        pane.scroll_up(2);
        assert_eq!(pane.scroll, 2);
        pane.scroll_to_top();
        assert_eq!(pane.scroll, 0);
        pane.scroll_to_bottom();
        assert_eq!(pane.scroll, 4);
    }

    #[test]
    fn test_install_resets_scroll() {
        let mut pane = PreviewPane::new();
        pane.install(ContextBundle {
            instructions: None,
            files: vec![file("a.txt", "one\ntwo\nthree")],
            note: None,
        });
        pane.scroll_down(3);
        pane.install(ContextBundle {
            instructions: None,
            files: vec![file("b.txt", "x")],
            note: None,
        });
        assert_eq!(pane.scroll, 0);
    }
}
