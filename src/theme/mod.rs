// Theme module - Color constants and theme re-exports
//
// Interface palette used by the panels, plus the map colors for zone
// categories and connection types (see `map.rs`).

pub mod map;

use ratatui::style::Color;

/// Primary accent color - borders, titles, key hints
/// RGB: (187, 154, 247)
pub const ACCENT: Color = Color::Rgb(187, 154, 247);

/// Notice color - connections close to expiry
/// RGB: (255, 158, 100)
pub const WARNING: Color = Color::Rgb(255, 158, 100);

/// Error color - rejected requests, store failures
/// RGB: (247, 118, 142)
pub const ERROR: Color = Color::Rgb(247, 118, 142);

/// Success color - added connections, focused field
/// RGB: (158, 206, 106)
pub const SUCCESS: Color = Color::Rgb(158, 206, 106);

/// General text
/// RGB: (169, 177, 214)
pub const TEXT: Color = Color::Rgb(169, 177, 214);

/// Background of the highlighted list row
pub const SELECTED_BG: Color = Color::Rgb(47, 51, 77);

/// Outline drawn around the selected node
pub const SELECTION_RING: Color = Color::Rgb(255, 255, 255);

pub use map::*;
