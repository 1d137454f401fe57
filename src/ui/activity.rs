// Activity log rendering module
//
// Most recent first, each entry stamped with its UTC time of day.

use crate::app::AppState;
use crate::theme::{ACCENT, TEXT, WARNING};
use crate::world::Timestamp;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

/// `HH:MM:SS` of a timestamp, in UTC
pub fn clock_time(at: Timestamp) -> String {
    let seconds = (at / 1000) % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

pub fn render_activity(f: &mut Frame, area: Rect, app: &AppState) {
    let items: Vec<ListItem> = app
        .activity
        .iter()
        .map(|entry| {
            let color = if entry.message.starts_with("Expired") {
                WARNING
            } else {
                TEXT
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", clock_time(entry.at)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(entry.message.clone(), Style::default().fg(color)),
            ]))
        })
        .collect();

    let title = format!(" Activity ({}, UTC) ", app.activity.len());
    let list = List::new(items).block(
        Block::default()
            .title(Span::styled(
                title,
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT)),
    );

    f.render_widget(list, area);
}
