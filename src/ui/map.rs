// Portal map rendering module
//
// Draws the live graph on a Braille canvas. The canvas bounds match the
// world viewport with the origin at the centre; world y grows downward,
// canvas y grows upward, so every y is flipped on the way in.
//
// Draw order: connection lines, countdown labels, node discs, node text.

use crate::app::config::{CELL_HEIGHT_UNITS, CELL_WIDTH_UNITS};
use crate::app::AppState;
use crate::theme::{
    connection_color, countdown_color, zone_color, ACCENT, SELECTION_RING, TEXT,
};
use crate::world::{ConnectionType, Point};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Context, Line as CanvasLine},
        Block, BorderType, Borders,
    },
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Extra radius of the ring drawn around the selected node
const SELECTION_RING_GAP: f64 = 6.0;

/// Remaining time as shown next to a connection
///
/// One minute is added before formatting, so a connection with 59s left
/// still reads `0h 1m` and only disappears once it actually expires.
pub fn format_time_left(remaining_ms: u64) -> String {
    let t = remaining_ms + 60_000;
    format!("{}h {}m", t / 3_600_000, (t % 3_600_000) / 60_000)
}

/// Canvas-space x at which `text` must start to be centred on `x`
fn centred_x(x: f64, text: &str) -> f64 {
    x - (text.width() as f64) * CELL_WIDTH_UNITS / 2.0
}

struct EdgeView {
    from: Point,
    to: Point,
    kind: ConnectionType,
    remaining: u64,
}

struct NodeView {
    position: Point,
    radius: f64,
    name: String,
    tier: String,
    color: Color,
    selected: bool,
}

pub fn render_map(f: &mut Frame, area: Rect, app: &mut AppState) {
    let title = format!(
        " Portal Map ({} zones, {} connections) x{:.2} ",
        app.world.nodes().len(),
        app.world.connections().len(),
        app.world.scale()
    );
    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT));
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Sizing the viewport may trigger a layout, so it happens before the
    // positions are read
    app.set_map_area(inner);
    let app = &*app;

    let scale = app.world.scale();
    let edges: Vec<EdgeView> = app
        .world
        .connections()
        .iter()
        .filter_map(|c| {
            Some(EdgeView {
                from: app.world.node(c.start)?.position,
                to: app.world.node(c.end)?.position,
                kind: c.kind,
                remaining: c.remaining(app.now),
            })
        })
        .collect();
    let nodes: Vec<NodeView> = app
        .world
        .nodes()
        .iter()
        .map(|n| NodeView {
            position: n.position,
            radius: n.radius * scale,
            name: n.name().to_string(),
            tier: n.zone.tier.clone(),
            color: zone_color(&n.zone.color),
            selected: app.selected_node == Some(n.id),
        })
        .collect();

    let viewport = app.world.viewport();
    let half_w = viewport.width / 2.0;
    let half_h = viewport.height / 2.0;

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-half_w, half_w])
        .y_bounds([-half_h, half_h])
        .paint(move |ctx| {
            if nodes.is_empty() {
                draw_empty_hint(ctx);
                return;
            }

            for edge in &edges {
                ctx.draw(&CanvasLine {
                    x1: edge.from.x,
                    y1: -edge.from.y,
                    x2: edge.to.x,
                    y2: -edge.to.y,
                    color: connection_color(edge.kind),
                });
            }

            for edge in edges.iter().filter(|e| e.kind.shows_countdown()) {
                let mid = edge.from.midpoint(edge.to);
                let label = format_time_left(edge.remaining);
                ctx.print(
                    centred_x(mid.x, &label),
                    -mid.y,
                    Span::styled(label, Style::default().fg(countdown_color(edge.remaining))),
                );
            }

            for node in &nodes {
                draw_node(ctx, node);
            }
        });

    f.render_widget(canvas, inner);
}

fn draw_node(ctx: &mut Context, node: &NodeView) {
    let (x, y) = (node.position.x, -node.position.y);

    ctx.draw(&Circle {
        x,
        y,
        radius: node.radius,
        color: node.color,
    });
    if node.selected {
        ctx.draw(&Circle {
            x,
            y,
            radius: node.radius + SELECTION_RING_GAP,
            color: SELECTION_RING,
        });
    }

    if !node.tier.is_empty() {
        ctx.print(
            centred_x(x, &node.tier),
            y,
            Span::styled(node.tier.clone(), Style::default().fg(node.color)),
        );
    }

    let mut style = Style::default().fg(TEXT);
    if node.selected {
        style = style.fg(SELECTION_RING).add_modifier(Modifier::BOLD);
    }
    ctx.print(
        centred_x(x, &node.name),
        y - node.radius - CELL_HEIGHT_UNITS,
        Span::styled(node.name.clone(), style),
    );
}

fn draw_empty_hint(ctx: &mut Context) {
    let message = "No connections yet. Press 'a' to add one.";
    ctx.print(
        centred_x(0.0, message),
        0.0,
        Span::styled(
            message,
            Style::default().fg(TEXT).add_modifier(Modifier::ITALIC),
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn render_text(app: &mut AppState, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render_map(f, area, app)
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_format_time_left_rounds_up_a_minute() {
        assert_eq!(format_time_left(0), "0h 1m");
        assert_eq!(format_time_left(59_999), "0h 1m");
        assert_eq!(format_time_left(60_000), "0h 2m");
        assert_eq!(format_time_left(3_600_000 - 60_000), "1h 0m");
        assert_eq!(format_time_left(2 * 3_600_000 + 29 * 60_000), "2h 30m");
    }

    #[test]
    fn test_centred_x_uses_display_width() {
        assert_eq!(centred_x(0.0, "abcd"), -2.0 * CELL_WIDTH_UNITS);
        assert_eq!(centred_x(100.0, ""), 100.0);
    }

    #[test]
    fn test_render_sets_map_area_inside_border() {
        let mut app = test_app();
        let text = render_text(&mut app, 80, 30);

        assert_eq!(app.map_area, Rect::new(1, 1, 78, 28));
        assert_eq!(app.world.viewport().width, 78.0 * CELL_WIDTH_UNITS);
        assert!(text.contains("No connections yet"));
    }

    #[test]
    fn test_render_shows_names_and_countdown() {
        let mut app = test_app();
        app.form.from = "Martlock".into();
        app.form.to = "Lymhurst".into();
        app.form.kind = ConnectionType::Blue;
        app.form.hours = 1;
        app.submit_connection().unwrap();

        let text = render_text(&mut app, 120, 40);
        assert!(text.contains("Martlock"));
        assert!(text.contains("Lymhurst"));
        assert!(text.contains("1h 1m"));
    }

    #[test]
    fn test_royal_connection_has_no_countdown() {
        let mut app = test_app();
        app.form.from = "Martlock".into();
        app.form.to = "Lymhurst".into();
        app.form.kind = ConnectionType::Royal;
        app.submit_connection().unwrap();

        let text = render_text(&mut app, 120, 40);
        assert!(!text.contains("24h"));
        assert!(!text.contains("25h"));
    }
}
