// Keyboard and mouse event handling
//
// Key presses are routed by input mode: the map view takes single-key
// commands, the form takes text. Mouse events only act on the map canvas.

use super::{AppState, FormField, InputMode};
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use tracing::debug;

/// Handle keyboard events and update application state
///
/// Returns `true` if the application should continue running,
/// `false` if it should exit.
///
/// # Key Bindings (map)
/// - `q`, `Q`, `Esc` - Quit the application
/// - `a`, `A`, `Enter` - Open the add-connection form
/// - `Tab`, `Down` - Select next node
/// - `BackTab`, `Up` - Select previous node
/// - `d`, `D`, `Delete` - Delete the selected node and its connections
/// - `l`, `L` - Randomize the layout
/// - `r`, `R` - Reload connections from the store
/// - `+`, `=` - Zoom in
/// - `-`, `_` - Zoom out
///
/// # Key Bindings (form)
/// - `Esc` - Back to the map
/// - `Enter` - Submit the connection
/// - `Tab` - Accept the highlighted suggestion, or move to the next field
/// - `BackTab` - Previous field
/// - `Up`, `Down` - Move through suggestions
/// - `Left`, `Right` - Cycle the connection type (type field)
pub fn handle_key_event(app: &mut AppState, key: KeyCode) -> bool {
    match app.input_mode {
        InputMode::Normal => handle_map_key(app, key),
        InputMode::Editing => {
            handle_form_key(app, key);
            true
        }
    }
}

fn handle_map_key(app: &mut AppState, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.running = false;
            false
        }
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Enter => {
            app.input_mode = InputMode::Editing;
            true
        }
        KeyCode::Tab | KeyCode::Down => {
            app.select_next_node();
            true
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.select_previous_node();
            true
        }
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
            app.delete_selected();
            true
        }
        KeyCode::Char('l') | KeyCode::Char('L') => {
            app.relayout();
            true
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.reload_from_store();
            true
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.zoom_in();
            true
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            app.zoom_out();
            true
        }
        _ => true,
    }
}

fn handle_form_key(app: &mut AppState, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            if let Err(e) = app.submit_connection() {
                debug!(error = %e, "Keeping form input for correction");
            }
        }
        KeyCode::Tab => {
            if !app.form.accept_suggestion(&app.directory) {
                app.form.next_field();
            }
        }
        KeyCode::BackTab => app.form.previous_field(),
        KeyCode::Up | KeyCode::Down => {
            let available = app.form.suggestions(&app.directory).len();
            app.form.move_suggestion(key == KeyCode::Down, available);
        }
        KeyCode::Left | KeyCode::Right if app.form.focus == FormField::Type => {
            app.form.cycle_type(key == KeyCode::Right);
        }
        KeyCode::Backspace => app.form.backspace(),
        KeyCode::Char(c) => app.form.push_char(c),
        _ => {}
    }
}

/// Handle mouse events on the map canvas
///
/// Left press selects the node under the pointer, dragging moves it.
pub fn handle_mouse_event(app: &mut AppState, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.click_at(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.drag_to(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.release_pointer(),
        MouseEventKind::ScrollUp => app.zoom_in(),
        MouseEventKind::ScrollDown => app.zoom_out(),
        _ => {}
    }
}
