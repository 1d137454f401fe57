// Layout solver configuration
//
// Constants and tunables for the multi-restart placement search and the
// viewport safety margins.

// ============================================================================
// Constants
// ============================================================================

/// Number of full layout attempts per `layout_all` call
pub const LAYOUT_TRIALS: usize = 40;

/// Random candidates sampled per node that propagation could not reach
pub const RANDOM_SAMPLES: usize = 1000;

/// Target distance between node centres
pub const DEFAULT_SEPARATION: f64 = 200.0;

/// Display radius of a node in world units
pub const NODE_RADIUS: f64 = 20.0;

/// Score deducted for every pair of crossing connections
pub const CROSSING_PENALTY: f64 = 2000.0;

/// Score returned for a candidate outside the viewport margin
pub const OUT_OF_BOUNDS_SCORE: f64 = -1.0e9;

/// Position given to every node at the start of a trial ("unplaced")
pub const UNPLACED_POSITION: f64 = -10000.0;

/// Zones preferred as the seed of a trial, in order
pub const DEFAULT_HOME_ZONES: [&str; 2] = ["Setent-Qintis", "Everwinter Expanse"];

// ============================================================================
// Configuration Structs
// ============================================================================

/// Inset from each viewport edge, in world units at zoom 1.0
///
/// The bottom inset is larger because zone names are drawn below the node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            left: 55.0,
            right: 55.0,
            top: 20.0,
            bottom: 50.0,
        }
    }
}

/// Tunables for the layout solver
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Outer restarts; the best-scoring trial wins
    pub trials: usize,

    /// Random candidates per disconnected node
    pub random_samples: usize,

    /// Target separation distance, also the "good enough" score
    pub separation: f64,

    /// Node display radius (hit-testing uses it too)
    pub node_radius: f64,

    /// Penalty per crossing pair of connections
    pub crossing_penalty: f64,

    /// Viewport safety margin, scaled by the zoom factor
    pub margin: Margin,

    /// Zone names tried as the trial seed before falling back to random
    pub home_zones: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            trials: LAYOUT_TRIALS,
            random_samples: RANDOM_SAMPLES,
            separation: DEFAULT_SEPARATION,
            node_radius: NODE_RADIUS,
            crossing_penalty: CROSSING_PENALTY,
            margin: Margin::default(),
            home_zones: DEFAULT_HOME_ZONES.iter().map(|z| z.to_string()).collect(),
        }
    }
}
