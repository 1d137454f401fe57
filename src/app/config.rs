// Application configuration types
//
// Constants and configuration structs for:
// - The host loop refresh interval
// - The add-connection form limits
// - Mapping terminal cells to world units

use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

/// Minimum UI poll interval in milliseconds
pub const MIN_REFRESH_MS: u64 = 50;

/// Maximum UI poll interval in milliseconds
pub const MAX_REFRESH_MS: u64 = 1000;

/// Default UI poll interval (also the expiry sweep cadence)
pub const DEFAULT_REFRESH_MS: u64 = 250;

/// Largest accepted hours value in the form
pub const MAX_HOURS: u64 = 24;

/// Largest accepted minutes value in the form
pub const MAX_MINUTES: u64 = 60;

/// Milliseconds per minute
pub const MINUTE_MS: u64 = 60_000;

/// World units covered by one terminal column
pub const CELL_WIDTH_UNITS: f64 = 16.0;

/// World units covered by one terminal row (cells are ~2x taller than wide)
pub const CELL_HEIGHT_UNITS: f64 = 32.0;

/// Number of entries kept in the activity log
pub const ACTIVITY_LOG_CAPACITY: usize = 50;

/// Zoom factor step for the +/- keys
pub const SCALE_STEP: f64 = 0.25;

// ============================================================================
// Configuration Structs
// ============================================================================

/// Configuration for the host loop interval
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Poll interval in milliseconds
    pub refresh_ms: u64,
}

impl RefreshConfig {
    pub fn new() -> Self {
        Self {
            refresh_ms: DEFAULT_REFRESH_MS,
        }
    }

    /// Poll interval as Duration
    pub fn ui_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.clamp(MIN_REFRESH_MS, MAX_REFRESH_MS))
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::new()
    }
}
