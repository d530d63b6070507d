//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Status bar and active-tab accent.
pub const ACCENT: Color = Color::Rgb(0, 95, 135);
/// Overdue due dates.
pub const OVERDUE: Color = Color::Rgb(200, 40, 40);
/// Due today or tomorrow.
pub const DUE_SOON: Color = Color::Rgb(255, 215, 0);
