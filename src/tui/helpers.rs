//! Formatting and coordinate helpers for the terminal UI

use crate::gesture::Offset;

/// Gesture units covered by one terminal column
pub const CELL_WIDTH_UNITS: f32 = 10.0;
/// Gesture units covered by one terminal row
pub const CELL_HEIGHT_UNITS: f32 = 20.0;

/// Formats a byte count with two decimals, e.g. "1.50 MB"
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", value, UNITS[unit])
}

/// `m:ss`, or `h:mm:ss` from one hour up
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Share of the session already decided, in `0.0..=1.0`
pub fn calculate_progress(processed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (processed as f64 / total as f64).min(1.0)
    }
}

/// Gesture-unit position of a terminal cell
pub fn cell_to_units(column: u16, row: u16) -> (f32, f32) {
    (
        f32::from(column) * CELL_WIDTH_UNITS,
        f32::from(row) * CELL_HEIGHT_UNITS,
    )
}

/// Gesture-unit size of a terminal area
pub fn viewport_units(columns: u16, rows: u16) -> (f32, f32) {
    cell_to_units(columns, rows)
}

/// Offset in whole cells, rounded towards the nearest cell
pub fn offset_to_cells(offset: Offset) -> (i32, i32) {
    (
        (offset.x / CELL_WIDTH_UNITS).round() as i32,
        (offset.y / CELL_HEIGHT_UNITS).round() as i32,
    )
}
