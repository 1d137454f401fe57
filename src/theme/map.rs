// Map colors
//
// Zone fill colors follow the in-game category of the zone; connection
// colors follow the portal size.

use ratatui::style::Color;

use super::{ERROR, TEXT, WARNING};
use crate::world::ConnectionType;

/// Remaining time under which a countdown turns red
pub const URGENT_REMAINING_MS: u64 = 30 * 60_000;

/// Remaining time under which a countdown turns orange
pub const SOON_REMAINING_MS: u64 = 2 * 3_600_000;

/// Fill color for a zone category (`"blue"`, `"red"`, `"road"`, ...)
///
/// Unknown categories fall back to gray.
pub fn zone_color(category: &str) -> Color {
    match category {
        "blue" | "city" => Color::Rgb(100, 149, 237),
        "red" => Color::Rgb(219, 112, 147),
        "yellow" => Color::Rgb(218, 165, 32),
        // Pure black disappears on dark terminals
        "black" => Color::Rgb(90, 90, 90),
        "road" => Color::Rgb(64, 224, 208),
        "road-ho" => Color::Rgb(102, 51, 153),
        _ => Color::Gray,
    }
}

/// Line color for a connection type
pub fn connection_color(kind: ConnectionType) -> Color {
    match kind {
        ConnectionType::Green => Color::Rgb(0, 128, 0),
        ConnectionType::Blue => Color::Rgb(0, 0, 255),
        ConnectionType::Yellow => Color::Rgb(214, 157, 0),
        ConnectionType::Royal => Color::Rgb(128, 0, 128),
    }
}

/// Text color for a countdown label
///
/// Color coding:
/// - Red (ERROR): under half an hour left
/// - Orange (WARNING): under two hours left
/// - Default text otherwise
pub fn countdown_color(remaining_ms: u64) -> Color {
    if remaining_ms < URGENT_REMAINING_MS {
        ERROR
    } else if remaining_ms < SOON_REMAINING_MS {
        WARNING
    } else {
        TEXT
    }
}
