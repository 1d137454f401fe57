// UI rendering module
//
// The main draw() function lays out the map, the sidebar panels and the
// status bar, and hands each area to its renderer.

mod activity;
mod map;
mod sidebar;
mod status_bar;

use crate::app::AppState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use activity::render_activity;
use map::render_map;
use sidebar::{render_details, render_form};
use status_bar::render_status_bar;

/// Main UI drawing function
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let size = f.area();

    // Main layout: body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    // Body: map + sidebar
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70), // Map
            Constraint::Percentage(30), // Sidebar
        ])
        .split(chunks[0]);

    render_map(f, body_chunks[0], app);

    // Sidebar: form, details, activity
    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),      // Form
            Constraint::Percentage(50), // Suggestions or selected zone
            Constraint::Min(0),         // Activity
        ])
        .split(body_chunks[1]);

    render_form(f, side_chunks[0], app);
    render_details(f, side_chunks[1], app);
    render_activity(f, side_chunks[2], app);

    render_status_bar(f, chunks[1], app);
}
