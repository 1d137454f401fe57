// World: zones-as-nodes, portal connections as expiring edges
//
// The world owns every node and connection. Nodes are created lazily when a
// connection first references their zone and removed as soon as their last
// connection goes away. At most one connection exists per unordered pair
// of zones.
//
// Layout lives in `layout.rs`; segment math in `geometry.rs`.

pub mod config;
pub mod geometry;
pub mod layout;

pub use config::LayoutConfig;
pub use geometry::Point;

use crate::zones::{Zone, ZoneDirectory};
use config::UNPLACED_POSITION;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Length of generated connection ids
pub const CONNECTION_ID_LENGTH: usize = 32;

/// Alphabet for generated connection ids (64 symbols)
pub const CONNECTION_ID_ALPHABET: &[u8; 64] =
    b"QWERTYUIOPASDFGHJKLZXCVBNMqwertyuiopasdfghjklzxcvbnm1234567890-_";

/// Current wall-clock time as a [`Timestamp`]
pub fn now_millis() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Timestamp)
        .unwrap_or(0)
}

// ============================================================================
// Data Model
// ============================================================================

/// Stable handle to a node, unique for the lifetime of a `World`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Portal category
///
/// Three timed categories and the royal one, which always lasts 24 hours
/// and never shows a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    /// Two-player portal
    #[default]
    Green,
    /// Seven-player portal
    Blue,
    /// Twenty-player portal
    Yellow,
    /// Royal road connection
    Royal,
}

impl ConnectionType {
    pub const ALL: [ConnectionType; 4] = [
        ConnectionType::Green,
        ConnectionType::Blue,
        ConnectionType::Yellow,
        ConnectionType::Royal,
    ];

    /// Short label shown on the type selector
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionType::Green => "2",
            ConnectionType::Blue => "7",
            ConnectionType::Yellow => "20",
            ConnectionType::Royal => "R",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConnectionType::Green => "green",
            ConnectionType::Blue => "blue",
            ConnectionType::Yellow => "yellow",
            ConnectionType::Royal => "royal",
        }
    }

    /// Whether connections of this type display remaining time
    pub fn shows_countdown(&self) -> bool {
        !matches!(self, ConnectionType::Royal)
    }

    /// Duration forced on this type, in hours, regardless of user input
    pub fn fixed_duration_hours(&self) -> Option<u64> {
        match self {
            ConnectionType::Royal => Some(24),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A zone that currently participates in at least one connection
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub zone: Rc<Zone>,
    pub position: Point,
    pub radius: f64,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.zone.name
    }
}

/// A timed portal link between two nodes
///
/// Stored with a direction, but every lookup treats it as unordered.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: String,
    pub start: NodeId,
    pub end: NodeId,
    pub kind: ConnectionType,
    pub expires_at: Timestamp,
}

impl Connection {
    pub fn touches(&self, node: NodeId) -> bool {
        self.start == node || self.end == node
    }

    /// The endpoint that is not `node`
    pub fn other_end(&self, node: NodeId) -> NodeId {
        if self.start == node {
            self.end
        } else {
            self.start
        }
    }

    /// Milliseconds until expiry, zero once stale
    pub fn remaining(&self, now: Timestamp) -> u64 {
        self.expires_at.saturating_sub(now)
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

/// Wire form of a connection as exchanged with the record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub id: String,
    pub start: String,
    pub end: String,
    #[serde(rename = "type")]
    pub kind: ConnectionType,
    pub end_time: Timestamp,
}

/// Outcome of a bulk reload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReloadSummary {
    pub loaded: usize,
    pub skipped: usize,
}

/// Canvas size in world units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

// ============================================================================
// World
// ============================================================================

/// Aggregate root for nodes, connections and layout state
pub struct World {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    next_node_id: u64,
    viewport: Viewport,
    scale: f64,
    config: LayoutConfig,
    rng: StdRng,
    /// Integer degrees, reshuffled before every placement around a node
    angles: Vec<u16>,
}

impl World {
    /// Create an empty world with an entropy-seeded random source
    pub fn new(config: LayoutConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an empty world whose layouts and ids replay for a given seed
    pub fn with_seed(config: LayoutConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: LayoutConfig, rng: StdRng) -> Self {
        Self {
            nodes: Vec::new(),
            connections: Vec::new(),
            next_node_id: 0,
            viewport: Viewport::default(),
            scale: 1.0,
            config,
            rng,
            angles: (0..360).collect(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    #[allow(dead_code)]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport {
            width: width.max(0.0),
            height: height.max(0.0),
        };
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Change the display zoom factor; non-positive values are ignored
    pub fn set_scale(&mut self, scale: f64) {
        if scale > 0.0 {
            self.scale = scale;
        }
    }

    // ------------------------------------------------------------------------
    // Graph queries
    // ------------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.zone.name == name)
    }

    pub(crate) fn position_of(&self, id: NodeId) -> Point {
        self.node(id)
            .map(|n| n.position)
            .unwrap_or(Point::new(UNPLACED_POSITION, UNPLACED_POSITION))
    }

    /// Move a node (pointer drag); the next layout overwrites it
    pub fn set_node_position(&mut self, id: NodeId, position: Point) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.position = position;
        }
    }

    /// Return the node for `zone`, creating it at the origin if absent
    pub fn get_or_create_node(&mut self, zone: &Rc<Zone>) -> NodeId {
        if let Some(node) = self.node_by_name(&zone.name) {
            return node.id;
        }

        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.push(Node {
            id,
            zone: Rc::clone(zone),
            position: Point::default(),
            radius: self.config.node_radius,
        });
        id
    }

    #[allow(dead_code)]
    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// All connections with `node` as either endpoint
    pub fn connections_of(&self, node: NodeId) -> Vec<&Connection> {
        self.connections.iter().filter(|c| c.touches(node)).collect()
    }

    /// The far endpoint of every connection of `node`
    pub fn neighbors_of(&self, node: NodeId) -> Vec<NodeId> {
        self.connections
            .iter()
            .filter(|c| c.touches(node))
            .map(|c| c.other_end(node))
            .collect()
    }

    /// Connection between two zones, whichever was stored as the start
    pub fn find_connection(&self, zone_a: &str, zone_b: &str) -> Option<&Connection> {
        let a = self.node_by_name(zone_a)?.id;
        let b = self.node_by_name(zone_b)?.id;
        self.connections
            .iter()
            .find(|c| (c.start == a && c.end == b) || (c.start == b && c.end == a))
    }

    /// Whether the segments of two connections cross
    pub fn intersects(&self, c1: &Connection, c2: &Connection) -> bool {
        geometry::segments_intersect(
            self.position_of(c1.start),
            self.position_of(c1.end),
            self.position_of(c2.start),
            self.position_of(c2.end),
        )
    }

    /// First node (in iteration order) whose disc contains `point`
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.position.distance_to(point) <= n.radius)
            .map(|n| n.id)
    }

    /// Zone names of a connection's endpoints
    pub fn endpoint_names(&self, connection: &Connection) -> (&str, &str) {
        let name = |id| self.node(id).map(|n| n.name()).unwrap_or("?");
        (name(connection.start), name(connection.end))
    }

    /// Snapshot of every connection in record form
    pub fn records(&self) -> Vec<ConnectionRecord> {
        self.connections.iter().map(|c| self.record_of(c)).collect()
    }

    fn record_of(&self, connection: &Connection) -> ConnectionRecord {
        let (start, end) = self.endpoint_names(connection);
        ConnectionRecord {
            id: connection.id.clone(),
            start: start.to_string(),
            end: end.to_string(),
            kind: connection.kind,
            end_time: connection.expires_at,
        }
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Link two zones, replacing any existing connection between them
    pub fn add_connection(
        &mut self,
        start: &Rc<Zone>,
        end: &Rc<Zone>,
        kind: ConnectionType,
        expires_at: Timestamp,
    ) -> &Connection {
        if let Some(existing) = self.find_connection(&start.name, &end.name).map(|c| c.id.clone()) {
            info!(
                id = %existing,
                start = %start.name,
                end = %end.name,
                "Replacing existing connection"
            );
            self.remove_connection(&existing);
        }

        let id = self.generate_id();
        self.insert_connection(id, start, end, kind, expires_at)
    }

    fn insert_connection(
        &mut self,
        id: String,
        start: &Rc<Zone>,
        end: &Rc<Zone>,
        kind: ConnectionType,
        expires_at: Timestamp,
    ) -> &Connection {
        let start_id = self.get_or_create_node(start);
        let end_id = self.get_or_create_node(end);

        debug!(id = %id, start = %start.name, end = %end.name, kind = kind.name(), "Connection added");

        let idx = self.connections.len();
        self.connections.push(Connection {
            id,
            start: start_id,
            end: end_id,
            kind,
            expires_at,
        });
        &self.connections[idx]
    }

    /// Remove a connection by id, dropping endpoints left without edges
    ///
    /// Returns the removed connection in record form, since its endpoint
    /// nodes may no longer exist afterwards.
    pub fn remove_connection(&mut self, id: &str) -> Option<ConnectionRecord> {
        let idx = self.connections.iter().position(|c| c.id == id)?;
        let record = self.record_of(&self.connections[idx]);
        let removed = self.connections.remove(idx);

        // Each endpoint is checked on its own
        self.remove_node_if_isolated(removed.start);
        self.remove_node_if_isolated(removed.end);

        Some(record)
    }

    fn remove_node_if_isolated(&mut self, node: NodeId) {
        if self.connections.iter().any(|c| c.touches(node)) {
            return;
        }
        self.nodes.retain(|n| n.id != node);
    }

    /// Remove every connection of `node` (and so the node itself)
    pub fn delete_node(&mut self, node: NodeId) -> Vec<ConnectionRecord> {
        let ids: Vec<String> = self
            .connections_of(node)
            .into_iter()
            .map(|c| c.id.clone())
            .collect();

        ids.iter()
            .filter_map(|id| self.remove_connection(id))
            .collect()
    }

    /// Remove every connection whose expiry is at or before `now`
    pub fn sweep_expired(&mut self, now: Timestamp) -> Vec<ConnectionRecord> {
        let expired: Vec<String> = self
            .connections
            .iter()
            .filter(|c| c.is_expired(now))
            .map(|c| c.id.clone())
            .collect();

        let removed: Vec<ConnectionRecord> = expired
            .iter()
            .filter_map(|id| self.remove_connection(id))
            .collect();

        if !removed.is_empty() {
            info!(count = removed.len(), "Expired connections removed");
        }
        removed
    }

    /// Replace the whole graph with `records`, then lay it out
    ///
    /// Records naming unknown zones, or repeating an already-loaded pair,
    /// are skipped.
    pub fn bulk_reload(
        &mut self,
        records: &[ConnectionRecord],
        directory: &ZoneDirectory,
    ) -> ReloadSummary {
        self.connections.clear();
        self.nodes.clear();

        let mut summary = ReloadSummary::default();
        for record in records {
            let (Some(start), Some(end)) = (directory.lookup(&record.start), directory.lookup(&record.end))
            else {
                warn!(
                    id = %record.id,
                    start = %record.start,
                    end = %record.end,
                    "Skipping connection record with unknown zone"
                );
                summary.skipped += 1;
                continue;
            };

            if self.find_connection(&start.name, &end.name).is_some() {
                debug!(id = %record.id, "Skipping duplicate connection record");
                summary.skipped += 1;
                continue;
            }

            self.insert_connection(record.id.clone(), &start, &end, record.kind, record.end_time);
            summary.loaded += 1;
        }

        info!(loaded = summary.loaded, skipped = summary.skipped, "Connections reloaded");
        self.layout_all();
        summary
    }

    /// Random 32-symbol id
    fn generate_id(&mut self) -> String {
        (0..CONNECTION_ID_LENGTH)
            .map(|_| {
                let idx = self.rng.gen_range(0..CONNECTION_ID_ALPHABET.len());
                CONNECTION_ID_ALPHABET[idx] as char
            })
            .collect()
    }
}
