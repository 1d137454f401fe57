// Status Bar rendering module
//
// Renders the bottom status bar: key hints for the current input mode,
// trimmed by priority to the available width, then the last error or
// notice.

use crate::app::{AppState, InputMode};
use crate::theme::{ACCENT, ERROR};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

struct Hint {
    priority: u8,
    key: &'static str,
    desc: &'static str,
}

const MAP_HINTS: &[Hint] = &[
    Hint { priority: 1, key: "Q:", desc: "Quit | " },
    Hint { priority: 1, key: "A:", desc: "Add | " },
    Hint { priority: 1, key: "Tab:", desc: "Select | " },
    Hint { priority: 1, key: "D:", desc: "Delete | " },
    Hint { priority: 2, key: "L:", desc: "Randomize | " },
    Hint { priority: 2, key: "R:", desc: "Reload | " },
    Hint { priority: 3, key: "+/-:", desc: "Zoom | " },
    Hint { priority: 3, key: "Mouse:", desc: "Select/Drag " },
];

const FORM_HINTS: &[Hint] = &[
    Hint { priority: 1, key: "Enter:", desc: "Submit | " },
    Hint { priority: 1, key: "Esc:", desc: "Back | " },
    Hint { priority: 1, key: "Tab:", desc: "Complete/Next | " },
    Hint { priority: 2, key: "↑↓:", desc: "Suggestion | " },
    Hint { priority: 2, key: "←→:", desc: "Type | " },
    Hint { priority: 3, key: "S-Tab:", desc: "Previous " },
];

/// Hint spans that fit in `available_width` columns, highest priority first
fn fit_hints(hints: &[Hint], available_width: usize) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut current_length = 0;

    for priority in 1..=3 {
        for hint in hints.iter().filter(|h| h.priority == priority) {
            let hint_length = hint.key.chars().count() + hint.desc.len();
            if current_length + hint_length <= available_width {
                spans.push(Span::styled(
                    hint.key,
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw(hint.desc));
                current_length += hint_length;
            }
        }
    }
    spans
}

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let hints = match app.input_mode {
        InputMode::Normal => MAP_HINTS,
        InputMode::Editing => FORM_HINTS,
    };

    // Borders plus the leading space
    let mut available_width = area.width.saturating_sub(3) as usize;
    let status = app.status.as_deref().map(|s| format!(" {} ", s));
    if let Some(status) = &status {
        available_width = available_width.saturating_sub(status.chars().count());
    }

    let mut spans = vec![Span::raw(" ")];
    spans.extend(fit_hints(hints, available_width));
    if let Some(status) = status {
        spans.push(Span::styled(
            status,
            Style::default()
                .fg(Color::White)
                .bg(ERROR)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let status_bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(ACCENT)),
        )
        .alignment(Alignment::Left);

    f.render_widget(status_bar, area);
}
