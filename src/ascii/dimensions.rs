//! Pixel-to-cell dimension calculation.

/// Width of one character cell in pixels.
pub const CELL_WIDTH: u32 = 6;

/// Height of one character cell in pixels.
pub const CELL_HEIGHT: u32 = 10;

/// Number of whole character cells that fit in a pixel area.
///
/// # Returns
/// A tuple of (cols, rows). Partial cells are dropped.
pub fn grid_dimensions(width_px: u32, height_px: u32) -> (u32, u32) {
    (width_px / CELL_WIDTH, height_px / CELL_HEIGHT)
}

/// Height that keeps `aspect` (height / width) for the given width.
pub fn locked_height(width_px: u32, aspect: f64) -> u32 {
    let height = (width_px as f64 * aspect).round();
    if height.is_finite() && height > 0.0 {
        height.min(u32::MAX as f64) as u32
    } else {
        0
    }
}
