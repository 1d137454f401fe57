// Sidebar rendering module
//
// Top: the add-connection form. Below it, while a zone name is being
// typed, the autocomplete list; otherwise details of the selected node.

use crate::app::{AppState, FormField, InputMode};
use crate::theme::{connection_color, zone_color, ACCENT, SELECTED_BG, SUCCESS, TEXT};
use crate::ui::map::format_time_left;
use crate::world::ConnectionType;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Label column width in the form
const LABEL_WIDTH: usize = 9;

fn panel(title: &str, color: Color) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

pub fn render_form(f: &mut Frame, area: Rect, app: &AppState) {
    let editing = app.input_mode == InputMode::Editing;
    let form = &app.form;
    let royal = form.kind.fixed_duration_hours().is_some();

    let field_line = |field: FormField, label: &str, value: Vec<Span<'static>>| {
        let focused = editing && form.focus == field;
        let label_style = if focused {
            Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let marker = if focused { ">" } else { " " };

        let mut spans = vec![
            Span::styled(marker.to_string(), Style::default().fg(SUCCESS)),
            Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), label_style),
        ];
        spans.extend(value);
        if focused && field != FormField::Type {
            spans.push(Span::styled("_", Style::default().fg(SUCCESS)));
        }
        Line::from(spans)
    };

    let text = |value: String| vec![Span::styled(value, Style::default().fg(TEXT))];

    let type_spans: Vec<Span<'static>> = ConnectionType::ALL
        .iter()
        .flat_map(|&kind| {
            let style = if kind == form.kind {
                Style::default()
                    .fg(Color::White)
                    .bg(connection_color(kind))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(connection_color(kind))
            };
            [
                Span::styled(format!(" {} ", kind.label()), style),
                Span::raw(" "),
            ]
        })
        .collect();

    let (hours, minutes) = match form.kind.fixed_duration_hours() {
        Some(fixed) => (fixed, 0),
        None => (form.hours, form.minutes),
    };
    let duration = |value: u64| {
        let style = if royal {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(TEXT)
        };
        vec![Span::styled(value.to_string(), style)]
    };

    let lines = vec![
        field_line(FormField::From, "From", text(form.from.clone())),
        field_line(FormField::To, "To", text(form.to.clone())),
        field_line(FormField::Type, "Type", type_spans),
        field_line(FormField::Hours, "Hours", duration(hours)),
        field_line(FormField::Minutes, "Minutes", duration(minutes)),
    ];

    let title = if editing {
        "Add Connection [editing]"
    } else {
        "Add Connection"
    };
    let color = if editing { SUCCESS } else { ACCENT };
    f.render_widget(Paragraph::new(lines).block(panel(title, color)), area);
}

/// Suggestions while typing a zone name, node details otherwise
pub fn render_details(f: &mut Frame, area: Rect, app: &AppState) {
    let typing_name = app.input_mode == InputMode::Editing && app.form.focus.is_zone_name();
    if typing_name {
        render_suggestions(f, area, app);
    } else {
        render_selected_node(f, area, app);
    }
}

fn render_suggestions(f: &mut Frame, area: Rect, app: &AppState) {
    let suggestions = app.form.suggestions(&app.directory);
    let items: Vec<ListItem> = suggestions
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let color = app
                .directory
                .lookup(name)
                .map(|z| zone_color(&z.color))
                .unwrap_or(TEXT);
            let style = if idx == app.form.suggestion {
                Style::default().bg(SELECTED_BG).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(" ● ", Style::default().fg(color)),
                Span::styled(name.to_string(), Style::default().fg(TEXT)),
            ]))
            .style(style)
        })
        .collect();

    let title = format!("Zones ({})", suggestions.len());
    f.render_widget(List::new(items).block(panel(&title, ACCENT)), area);
}

fn render_selected_node(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(node) = app.selected_node.and_then(|id| app.world.node(id)) else {
        let hint = Paragraph::new(Line::from(Span::styled(
            " Select a zone with Tab or a click",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )))
        .block(panel("Zone", ACCENT));
        f.render_widget(hint, area);
        return;
    };

    let zone = &node.zone;
    let mut lines = vec![
        Line::from(vec![
            Span::styled(" ● ", Style::default().fg(zone_color(&zone.color))),
            Span::styled(
                zone.name.clone(),
                Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Tier ", Style::default().fg(Color::DarkGray)),
            Span::styled(zone.tier.clone(), Style::default().fg(TEXT)),
            Span::styled("  Category ", Style::default().fg(Color::DarkGray)),
            Span::styled(zone.color.clone(), Style::default().fg(TEXT)),
        ]),
    ];
    let mut tags = vec![
        Span::styled(" Id ", Style::default().fg(Color::DarkGray)),
        Span::styled(zone.albion_id.clone(), Style::default().fg(TEXT)),
    ];
    if !zone.kind.is_empty() {
        tags.push(Span::styled(format!("  {}", zone.kind), Style::default().fg(TEXT)));
    }
    if zone.is_deep {
        tags.push(Span::styled("  deep", Style::default().fg(TEXT)));
    }
    lines.push(Line::from(tags));
    lines.push(Line::from(""));

    for conn in app.world.connections_of(node.id) {
        let other = app
            .world
            .node(conn.other_end(node.id))
            .map(|n| n.name().to_string())
            .unwrap_or_default();
        let remaining = if conn.kind.shows_countdown() {
            format_time_left(conn.remaining(app.now))
        } else {
            "royal".to_string()
        };
        lines.push(Line::from(vec![
            Span::styled(" ━ ", Style::default().fg(connection_color(conn.kind))),
            Span::styled(other, Style::default().fg(TEXT)),
            Span::styled(format!("  {}", remaining), Style::default().fg(Color::DarkGray)),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(panel("Zone", ACCENT)), area);
}
