// Application state management
//
// AppState ties the zone directory, the live world and the record store to
// the interactive surfaces: the add-connection form, node selection and the
// activity log. Every graph change made from here is persisted and followed
// by a fresh layout.

pub mod config;
pub mod event;
pub mod form;

pub use config::RefreshConfig;
pub use form::{ConnectionForm, FormField, RequestError};

use crate::sync::ConnectionStore;
use crate::world::{now_millis, NodeId, Point, Timestamp, World};
use crate::zones::ZoneDirectory;
use config::{ACTIVITY_LOG_CAPACITY, CELL_HEIGHT_UNITS, CELL_WIDTH_UNITS, SCALE_STEP};
use ratatui::layout::Rect;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Whether keystrokes drive the map or the add-connection form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// One line of the activity log
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub at: Timestamp,
    pub message: String,
}

/// Main application state
pub struct AppState {
    /// Whether the application is running
    pub running: bool,

    /// Known zones, used for validation and autocomplete
    pub directory: ZoneDirectory,

    /// Live graph of connected zones
    pub world: World,

    /// Where connection records are read from and written to
    store: Option<ConnectionStore>,

    /// Set until the first sized draw pulls the graph from the store
    pending_reload: bool,

    pub form: ConnectionForm,
    pub input_mode: InputMode,

    /// Node highlighted on the map (keyboard cycling or click)
    pub selected_node: Option<NodeId>,

    /// Set while the pointer is held down on the selected node
    pub dragging: bool,

    /// Inner area of the map canvas, recorded on every draw
    pub map_area: Rect,

    /// Most recent first
    pub activity: VecDeque<ActivityEntry>,

    /// Last error or notice shown in the status bar
    pub status: Option<String>,

    /// Time of the last tick; countdowns render against it
    pub now: Timestamp,

    pub refresh_config: RefreshConfig,
}

impl AppState {
    /// Build the state; the initial graph is read from the store, if any,
    /// once the map area is known
    pub fn new(directory: ZoneDirectory, world: World, store: Option<ConnectionStore>) -> Self {
        Self {
            running: true,
            directory,
            world,
            pending_reload: store.is_some(),
            store,
            form: ConnectionForm::default(),
            input_mode: InputMode::Normal,
            selected_node: None,
            dragging: false,
            map_area: Rect::default(),
            activity: VecDeque::with_capacity(ACTIVITY_LOG_CAPACITY),
            status: None,
            now: now_millis(),
            refresh_config: RefreshConfig::default(),
        }
    }

    // ========================================================================
    // Timers
    // ========================================================================

    pub fn on_tick(&mut self) {
        self.on_tick_at(now_millis());
    }

    /// Expire stale connections as of `now`
    pub fn on_tick_at(&mut self, now: Timestamp) {
        self.now = now;
        let expired = self.world.sweep_expired(now);
        if expired.is_empty() {
            return;
        }

        for record in &expired {
            self.log(format!("Expired {} <-> {}", record.start, record.end));
        }
        self.forget_missing_selection();
        self.persist();
    }

    // ========================================================================
    // Graph edits
    // ========================================================================

    /// Validate the form and add (or replace) the connection it describes
    pub fn submit_connection(&mut self) -> Result<(), RequestError> {
        let resolved = match self.form.request().resolve(&self.directory, self.now) {
            Ok(resolved) => resolved,
            Err(e) => {
                debug!(error = %e, "Connection request rejected");
                self.status = Some(e.to_string());
                return Err(e);
            }
        };

        let replaced = self
            .world
            .find_connection(&resolved.start.name, &resolved.end.name)
            .is_some();
        self.world.add_connection(
            &resolved.start,
            &resolved.end,
            resolved.kind,
            resolved.expires_at,
        );

        let verb = if replaced { "Replaced" } else { "Added" };
        self.log(format!(
            "{} {} {} <-> {}",
            verb,
            resolved.kind.name(),
            resolved.start.name,
            resolved.end.name
        ));
        self.status = None;

        self.form.clear_after_submit();
        self.forget_missing_selection();
        self.world.layout_all();
        self.persist();
        Ok(())
    }

    /// Remove the selected node and every connection it had
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_node.take() else {
            return;
        };
        let name = self
            .world
            .node(id)
            .map(|n| n.name().to_string())
            .unwrap_or_default();

        let removed = self.world.delete_node(id);
        if removed.is_empty() {
            return;
        }

        self.log(format!("Deleted {} ({} connections)", name, removed.len()));
        self.dragging = false;
        self.world.layout_all();
        self.persist();
    }

    /// Run a fresh randomized layout
    pub fn relayout(&mut self) {
        self.world.layout_all();
        self.log("Layout randomized".to_string());
    }

    /// Replace the graph with whatever the store currently holds
    pub fn reload_from_store(&mut self) {
        let Some(store) = &self.store else {
            self.status = Some("No connection store configured".to_string());
            return;
        };

        match store.load() {
            Ok(records) => {
                let summary = self.world.bulk_reload(&records, &self.directory);
                self.selected_node = None;
                self.dragging = false;
                self.status = None;
                let message = if summary.skipped > 0 {
                    format!(
                        "Reloaded {} connections ({} skipped)",
                        summary.loaded, summary.skipped
                    )
                } else {
                    format!("Reloaded {} connections", summary.loaded)
                };
                self.log(message);
            }
            Err(e) => {
                warn!(error = %e, "Failed to reload connections");
                self.status = Some(e.to_string());
            }
        }
    }

    fn persist(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.world.records()) {
            warn!(path = %store.path().display(), error = %e, "Failed to save connections");
            self.status = Some(e.to_string());
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn select_next_node(&mut self) {
        self.step_selection(true);
    }

    pub fn select_previous_node(&mut self) {
        self.step_selection(false);
    }

    fn step_selection(&mut self, forward: bool) {
        let nodes = self.world.nodes();
        if nodes.is_empty() {
            self.selected_node = None;
            return;
        }

        let current = self
            .selected_node
            .and_then(|id| nodes.iter().position(|n| n.id == id));
        let idx = match (current, forward) {
            (None, true) => 0,
            (None, false) => nodes.len() - 1,
            (Some(i), true) => (i + 1) % nodes.len(),
            (Some(i), false) => (i + nodes.len() - 1) % nodes.len(),
        };
        self.selected_node = Some(nodes[idx].id);
    }

    fn forget_missing_selection(&mut self) {
        if let Some(id) = self.selected_node {
            if self.world.node(id).is_none() {
                self.selected_node = None;
                self.dragging = false;
            }
        }
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    /// Select the node under a terminal cell and prefill the form's From
    pub fn click_at(&mut self, column: u16, row: u16) {
        let Some(point) = cell_to_world(self.map_area, column, row) else {
            return;
        };
        self.selected_node = self.world.node_at(point);
        self.dragging = self.selected_node.is_some();

        if let Some(node) = self.selected_node.and_then(|id| self.world.node(id)) {
            let name = node.name().to_string();
            self.form.set_from(&name);
        }
    }

    /// Move the node being dragged to a terminal cell
    pub fn drag_to(&mut self, column: u16, row: u16) {
        if !self.dragging {
            return;
        }
        let (Some(id), Some(point)) = (self.selected_node, cell_to_world(self.map_area, column, row))
        else {
            return;
        };
        self.world.set_node_position(id, point);
    }

    pub fn release_pointer(&mut self) {
        self.dragging = false;
    }

    // ========================================================================
    // View
    // ========================================================================

    /// Record the map canvas area and size the world viewport to match
    ///
    /// A changed viewport triggers a fresh layout, since the first draw is
    /// the first time the canvas size is known.
    pub fn set_map_area(&mut self, area: Rect) {
        self.map_area = area;
        let width = f64::from(area.width) * CELL_WIDTH_UNITS;
        let height = f64::from(area.height) * CELL_HEIGHT_UNITS;

        let viewport = self.world.viewport();
        let resized = viewport.width != width || viewport.height != height;
        if resized {
            info!(width, height, "Map viewport resized");
            self.world.set_viewport(width, height);
        }
        if area.width == 0 || area.height == 0 {
            return;
        }

        if self.pending_reload {
            self.pending_reload = false;
            self.reload_from_store();
        } else if resized && !self.world.nodes().is_empty() {
            self.world.layout_all();
        }
    }

    pub fn zoom_in(&mut self) {
        self.world.set_scale(self.world.scale() + SCALE_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.world.set_scale(self.world.scale() - SCALE_STEP);
    }

    fn log(&mut self, message: String) {
        info!(message = %message, "Activity");
        self.activity.push_front(ActivityEntry {
            at: self.now,
            message,
        });
        self.activity.truncate(ACTIVITY_LOG_CAPACITY);
    }
}

/// World position at the centre of a terminal cell inside `area`
///
/// World coordinates put the origin at the centre of the canvas with y
/// growing downward, matching the layout's margin semantics.
pub fn cell_to_world(area: Rect, column: u16, row: u16) -> Option<Point> {
    if area.width == 0
        || area.height == 0
        || column < area.x
        || row < area.y
        || column >= area.x + area.width
        || row >= area.y + area.height
    {
        return None;
    }

    let width = f64::from(area.width) * CELL_WIDTH_UNITS;
    let height = f64::from(area.height) * CELL_HEIGHT_UNITS;
    let x = -width / 2.0 + (f64::from(column - area.x) + 0.5) * CELL_WIDTH_UNITS;
    let y = -height / 2.0 + (f64::from(row - area.y) + 0.5) * CELL_HEIGHT_UNITS;
    Some(Point::new(x, y))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::world::{ConnectionRecord, ConnectionType, LayoutConfig};
    use tempfile::TempDir;

    pub(crate) fn test_app() -> AppState {
        let directory = ZoneDirectory::builtin().unwrap();
        let world = World::with_seed(LayoutConfig::default(), 7);
        let mut app = AppState::new(directory, world, None);
        app.now = 1_000_000;
        app.set_map_area(Rect::new(0, 0, 120, 40));
        app
    }

    fn fill_form(app: &mut AppState, from: &str, to: &str, kind: ConnectionType, hours: u64) {
        app.form.from = from.into();
        app.form.to = to.into();
        app.form.kind = kind;
        app.form.hours = hours;
        app.form.minutes = 0;
    }

    fn temp_store(dir: &TempDir) -> ConnectionStore {
        ConnectionStore::new(dir.path().join("connections.json"))
    }

    #[test]
    fn test_submit_adds_connection_and_clears_form() {
        let mut app = test_app();
        fill_form(&mut app, "Martlock", "Bridgewatch", ConnectionType::Blue, 2);

        assert!(app.submit_connection().is_ok());
        assert_eq!(app.world.connections().len(), 1);
        assert_eq!(app.world.connections()[0].expires_at, 1_000_000 + 2 * 3_600_000);

        // From and type survive for the next entry
        assert_eq!(app.form.from, "Martlock");
        assert_eq!(app.form.kind, ConnectionType::Blue);
        assert!(app.form.to.is_empty());
        assert_eq!(app.form.hours, 0);
        assert!(app.activity[0].message.starts_with("Added"));
    }

    #[test]
    fn test_submit_same_pair_replaces() {
        let mut app = test_app();
        fill_form(&mut app, "Martlock", "Bridgewatch", ConnectionType::Green, 1);
        app.submit_connection().unwrap();
        fill_form(&mut app, "Bridgewatch", "Martlock", ConnectionType::Yellow, 3);
        app.submit_connection().unwrap();

        assert_eq!(app.world.connections().len(), 1);
        assert_eq!(app.world.connections()[0].kind, ConnectionType::Yellow);
        assert!(app.activity[0].message.starts_with("Replaced"));
    }

    #[test]
    fn test_submit_rejection_sets_status() {
        let mut app = test_app();
        fill_form(&mut app, "Martlock", "Nowhere", ConnectionType::Green, 1);

        let err = app.submit_connection().unwrap_err();
        assert_eq!(err, RequestError::UnknownZone("Nowhere".into()));
        assert!(app.status.is_some());
        assert!(app.world.connections().is_empty());
        // Rejected input stays for correction
        assert_eq!(app.form.to, "Nowhere");
    }

    #[test]
    fn test_tick_expires_and_clears_selection() {
        let mut app = test_app();
        fill_form(&mut app, "Martlock", "Bridgewatch", ConnectionType::Green, 1);
        app.submit_connection().unwrap();
        app.select_next_node();
        assert!(app.selected_node.is_some());

        app.on_tick_at(1_000_000 + 3_600_000);
        assert!(app.world.connections().is_empty());
        assert!(app.world.nodes().is_empty());
        assert!(app.selected_node.is_none());
        assert!(app.activity[0].message.contains("Martlock"));
    }

    #[test]
    fn test_tick_before_expiry_keeps_connection() {
        let mut app = test_app();
        fill_form(&mut app, "Martlock", "Bridgewatch", ConnectionType::Green, 1);
        app.submit_connection().unwrap();

        app.on_tick_at(1_000_000 + 3_600_000 - 1);
        assert_eq!(app.world.connections().len(), 1);
    }

    #[test]
    fn test_selection_cycles_both_ways() {
        let mut app = test_app();
        fill_form(&mut app, "Martlock", "Bridgewatch", ConnectionType::Green, 1);
        app.submit_connection().unwrap();
        let ids: Vec<NodeId> = app.world.nodes().iter().map(|n| n.id).collect();

        app.select_next_node();
        assert_eq!(app.selected_node, Some(ids[0]));
        app.select_next_node();
        assert_eq!(app.selected_node, Some(ids[1]));
        app.select_next_node();
        assert_eq!(app.selected_node, Some(ids[0]));
        app.select_previous_node();
        assert_eq!(app.selected_node, Some(ids[1]));
    }

    #[test]
    fn test_selection_on_empty_world() {
        let mut app = test_app();
        app.select_next_node();
        assert!(app.selected_node.is_none());
    }

    #[test]
    fn test_delete_selected_cascades() {
        let mut app = test_app();
        fill_form(&mut app, "Martlock", "Bridgewatch", ConnectionType::Green, 1);
        app.submit_connection().unwrap();
        fill_form(&mut app, "Martlock", "Lymhurst", ConnectionType::Green, 1);
        app.submit_connection().unwrap();

        app.selected_node = app.world.node_by_name("Martlock").map(|n| n.id);
        app.delete_selected();

        assert!(app.world.connections().is_empty());
        assert!(app.world.nodes().is_empty());
        assert!(app.selected_node.is_none());
        assert!(app.activity[0].message.contains("2 connections"));
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let mut app = test_app();
        fill_form(&mut app, "Martlock", "Bridgewatch", ConnectionType::Green, 1);
        app.submit_connection().unwrap();
        app.delete_selected();
        assert_eq!(app.world.connections().len(), 1);
    }

    #[test]
    fn test_set_map_area_sizes_viewport() {
        let app = test_app();
        let viewport = app.world.viewport();
        assert_eq!(viewport.width, 120.0 * CELL_WIDTH_UNITS);
        assert_eq!(viewport.height, 40.0 * CELL_HEIGHT_UNITS);
    }

    #[test]
    fn test_cell_to_world_centres_on_origin() {
        let area = Rect::new(10, 5, 100, 30);
        let top_left = cell_to_world(area, 10, 5).unwrap();
        assert_eq!(top_left.x, -800.0 + 8.0);
        assert_eq!(top_left.y, -480.0 + 16.0);

        let middle = cell_to_world(area, 60, 20).unwrap();
        assert_eq!(middle.x, 8.0);
        assert_eq!(middle.y, 16.0);

        assert!(cell_to_world(area, 9, 5).is_none());
        assert!(cell_to_world(area, 110, 5).is_none());
        assert!(cell_to_world(Rect::default(), 0, 0).is_none());
    }

    #[test]
    fn test_click_selects_node_and_prefills_from() {
        let mut app = test_app();
        fill_form(&mut app, "Martlock", "Bridgewatch", ConnectionType::Green, 1);
        app.submit_connection().unwrap();
        app.form.from.clear();

        let target = app.world.node_by_name("Bridgewatch").unwrap().id;
        // Put the node on a cell centre so the click lands on it
        let cell_centre = cell_to_world(app.map_area, 30, 10).unwrap();
        app.world.set_node_position(target, cell_centre);

        app.click_at(30, 10);
        assert_eq!(app.selected_node, Some(target));
        assert!(app.dragging);
        assert_eq!(app.form.from, "Bridgewatch");

        app.drag_to(31, 12);
        let moved = app.world.node(target).unwrap().position;
        assert_eq!(moved, cell_to_world(app.map_area, 31, 12).unwrap());

        app.release_pointer();
        app.drag_to(50, 20);
        assert_eq!(app.world.node(target).unwrap().position, moved);
    }

    #[test]
    fn test_click_on_empty_space_clears_selection() {
        let mut app = test_app();
        fill_form(&mut app, "Martlock", "Bridgewatch", ConnectionType::Green, 1);
        app.submit_connection().unwrap();
        for node in app.world.nodes().iter().map(|n| n.id).collect::<Vec<_>>() {
            app.world.set_node_position(node, Point::new(-10_000.0, -10_000.0));
        }
        app.select_next_node();

        app.click_at(60, 20);
        assert!(app.selected_node.is_none());
        assert!(!app.dragging);
    }

    #[test]
    fn test_zoom_never_reaches_zero() {
        let mut app = test_app();
        for _ in 0..10 {
            app.zoom_out();
        }
        assert!(app.world.scale() > 0.0);
        app.zoom_in();
        assert!(app.world.scale() > SCALE_STEP);
    }

    #[test]
    fn test_activity_log_is_bounded() {
        let mut app = test_app();
        for _ in 0..(ACTIVITY_LOG_CAPACITY + 10) {
            app.relayout();
        }
        assert_eq!(app.activity.len(), ACTIVITY_LOG_CAPACITY);
    }

    #[test]
    fn test_store_round_trip_through_app() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);
        let directory = ZoneDirectory::builtin().unwrap();
        let world = World::with_seed(LayoutConfig::default(), 3);
        let mut app = AppState::new(directory, world, Some(store.clone()));
        app.set_map_area(Rect::new(0, 0, 120, 40));
        fill_form(&mut app, "Martlock", "Bridgewatch", ConnectionType::Royal, 0);
        app.submit_connection().unwrap();

        let saved = store.load().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].kind, ConnectionType::Royal);

        let directory = ZoneDirectory::builtin().unwrap();
        let world = World::with_seed(LayoutConfig::default(), 4);
        let mut reloaded = AppState::new(directory, world, Some(store.clone()));
        reloaded.set_map_area(Rect::new(0, 0, 120, 40));
        assert_eq!(reloaded.world.records(), saved);
    }

    #[test]
    fn test_startup_reload_waits_for_map_area() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);
        let records = vec![ConnectionRecord {
            id: "abc".into(),
            start: "Martlock".into(),
            end: "Bridgewatch".into(),
            kind: ConnectionType::Blue,
            end_time: 4_000_000_000_000,
        }];
        store.save(&records).unwrap();

        let directory = ZoneDirectory::builtin().unwrap();
        let world = World::with_seed(LayoutConfig::default(), 5);
        let mut app = AppState::new(directory, world, Some(store));
        assert!(app.world.nodes().is_empty());

        // A zero-sized area is not enough to lay anything out
        app.set_map_area(Rect::new(0, 0, 0, 0));
        assert!(app.world.nodes().is_empty());

        app.set_map_area(Rect::new(0, 0, 120, 40));
        assert_eq!(app.world.records(), records);
        for node in app.world.nodes() {
            assert!(app.world.in_bounds(node.position));
        }
        assert!(app.activity[0].message.starts_with("Reloaded 1"));

        // Later draws at the same size leave the graph alone
        let before: Vec<Point> = app.world.nodes().iter().map(|n| n.position).collect();
        app.set_map_area(Rect::new(0, 0, 120, 40));
        let after: Vec<Point> = app.world.nodes().iter().map(|n| n.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_reload_without_store_reports() {
        let mut app = test_app();
        app.reload_from_store();
        assert!(app.status.is_some());
    }
}
