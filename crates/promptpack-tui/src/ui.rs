//! Top-level frame layout.
//!
//! Draws the header, the selection rows, and the status line, then the
//! overlay for the current mode on top. All panel internals render
//! themselves; this module only hands out areas.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

use promptpack_core::{format_file_size, SizeTier};

use crate::app::{App, Mode, ToastKind};
use crate::panels::PLACEHOLDER;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Min(1),    // selection rows
            Constraint::Length(2), // status line
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_rows(frame, app, chunks[1]);
    draw_status(frame, app, chunks[2]);

    match app.mode {
        Mode::Rows => {}
        Mode::DirPrompt => {
            let area = centered_rect(60, 20, frame.area());
            frame.render_widget(Clear, area);
            app.dir_prompt.render(frame, area);
        }
        Mode::Picker => {
            let area = centered_rect(70, 70, frame.area());
            frame.render_widget(Clear, area);
            app.picker.render(frame, area);
        }
        Mode::Preview => {
            let area = centered_rect(90, 90, frame.area());
            frame.render_widget(Clear, area);
            app.preview.render(frame, area);
        }
        Mode::Instructions => {
            let area = centered_rect(70, 60, frame.area());
            frame.render_widget(Clear, area);
            app.instructions.render(frame, area);
        }
        Mode::Exclusions => {
            let area = centered_rect(70, 70, frame.area());
            frame.render_widget(Clear, area);
            app.exclusions.render(frame, area);
        }
        Mode::Logs => {
            let area = centered_rect(90, 80, frame.area());
            frame.render_widget(Clear, area);
            app.logs.render(frame, area);
        }
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            "promptpack",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" — "),
    ];
    match &app.session {
        Some(session) => spans.push(Span::raw(session.display_name())),
        None => spans.push(Span::styled(
            "No Project Selected",
            Style::default().fg(Color::DarkGray),
        )),
    }
    if app.browse_in_flight.is_some() {
        spans.push(Span::styled(
            " (browsing...)",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let count = Span::styled(
        format!("{} lines ({})", app.total_lines, app.tier.label()),
        Style::default().fg(tier_color(app.tier)),
    );

    let header = Block::default()
        .borders(Borders::BOTTOM)
        .title(Line::from(spans))
        .title(Line::from(count).right_aligned());
    frame.render_widget(header, area);
}

fn draw_rows(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" Selection ").borders(Borders::ALL);

    let visible_height = area.height.saturating_sub(2) as usize; // minus borders
    let skip = app
        .cursor
        .saturating_sub(visible_height.saturating_sub(1));

    let items: Vec<ListItem> = app
        .selection
        .rows()
        .iter()
        .enumerate()
        .skip(skip)
        .take(visible_height)
        .map(|(index, row)| {
            let marker = if row.checked { "[x]" } else { "[ ]" };
            let label = match &row.path {
                Some(path) => {
                    // A reconciled row can briefly hold a path with no listing
                    // entry; fall back to the raw path.
                    let text = app
                        .session
                        .as_ref()
                        .and_then(|session| session.entry_for(path))
                        .map(|entry| {
                            format!(
                                "{} ({})",
                                entry.relative_path,
                                format_file_size(entry.size_bytes)
                            )
                        })
                        .unwrap_or_else(|| path.display().to_string());
                    Span::raw(text)
                }
                None => Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
            };
            let item = ListItem::new(Line::from(vec![Span::raw(format!("{marker} ")), label]));
            if index == app.cursor {
                item.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let status = match &app.toast {
        Some(toast) => {
            let color = match toast.kind {
                ToastKind::Success => Color::Green,
                ToastKind::Error => Color::Red,
            };
            Paragraph::new(toast.text.as_str()).style(Style::default().fg(color))
        }
        None => Paragraph::new(mode_hints(app.mode)).style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(status.block(Block::default().borders(Borders::TOP)), area);
}

fn mode_hints(mode: Mode) -> &'static str {
    match mode {
        Mode::Rows => {
            "a: add row, d: remove, space: toggle, Enter: pick file, o: directory, \
             y: copy, p: preview, i: instructions, e: exclusions, L: logs, q: quit"
        }
        Mode::DirPrompt => "Enter: browse, Esc: cancel",
        Mode::Picker => "Enter: select, space: expand folder, x: clear, Esc: cancel",
        Mode::Preview => "j/k: scroll, d/u: half page, g/G: top/bottom, Esc: close",
        Mode::Instructions => "Ctrl+S: save, Esc: cancel",
        Mode::Exclusions => "Tab: section, a: add, d: delete, Ctrl+S: save, Esc: cancel",
        Mode::Logs => "j/k: scroll, d/u: half page, G: bottom (follow), Esc: close",
    }
}

fn tier_color(tier: SizeTier) -> Color {
    match tier {
        SizeTier::Green => Color::Green,
        SizeTier::Yellow => Color::Yellow,
        SizeTier::Red => Color::Red,
    }
}

/// Centered sub-rectangle taking the given percentages of `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
