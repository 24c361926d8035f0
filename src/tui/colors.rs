//! Colour palette shared by every screen

use ratatui::style::Color;

/// Destructive actions and errors
pub const ACCENT_PRIMARY: Color = Color::Rgb(239, 83, 80);
/// Moves and confirmations
pub const ACCENT_SECONDARY: Color = Color::Rgb(102, 187, 106);
/// Titles, focus and the active swipe hint
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(255, 193, 7);
pub const TEXT_PRIMARY: Color = Color::Rgb(236, 239, 241);
pub const TEXT_SECONDARY: Color = Color::Rgb(144, 164, 174);
/// Card text while it fades out
pub const TEXT_DIM: Color = Color::Rgb(96, 110, 118);
pub const BG_DARK: Color = Color::Rgb(24, 26, 31);
pub const BORDER_COLOR: Color = Color::Rgb(84, 110, 122);
