//! Pure calculation functions for bleed geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Pixel layout of one bleed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BleedGeometry {
    /// Whole pixels per millimetre, derived from the trim width.
    pub scale: u32,
    /// Margin added on each side, in pixels.
    pub bleed_px: u32,
    /// Output canvas `(width, height)`.
    pub canvas: (u32, u32),
}

/// Whole pixels per millimetre of a source image.
///
/// The source is assumed to be exactly `card_width` mm wide at some integer
/// resolution; anything else truncates toward zero.
///
/// ```
/// # use card_bleeder::imaging::pixels_per_mm;
/// assert_eq!(pixels_per_mm(630, 63), 10);
/// assert_eq!(pixels_per_mm(700, 63), 11);
/// assert_eq!(pixels_per_mm(50, 63), 0);
/// ```
pub fn pixels_per_mm(source_width: u32, card_width: u32) -> u32 {
    source_width.checked_div(card_width).unwrap_or(0)
}

/// Size of the bled canvas.
///
/// One pixel narrower and shorter than `source + 2 * bleed_px`. Page sizes
/// are computed separately from the config in millimetres, so the missing
/// pixel row and column never show up in the merged documents.
pub fn bled_canvas_size(source: (u32, u32), bleed_px: u32) -> (u32, u32) {
    let (w, h) = source;
    let margin = bleed_px.saturating_mul(2);
    (
        w.saturating_add(margin).saturating_sub(1),
        h.saturating_add(margin).saturating_sub(1),
    )
}

/// Compute the full geometry for bleeding a `source`-sized image.
pub fn calculate_bleed_geometry(
    source: (u32, u32),
    bleed_width_mm: u32,
    card_width_mm: u32,
) -> BleedGeometry {
    let scale = pixels_per_mm(source.0, card_width_mm);
    let bleed_px = scale.saturating_mul(bleed_width_mm);
    BleedGeometry {
        scale,
        bleed_px,
        canvas: bled_canvas_size(source, bleed_px),
    }
}
