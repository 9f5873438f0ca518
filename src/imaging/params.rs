//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides sizes and output paths) and the [`backend`](super::backend)
//! (which does the actual pixel work).

use std::path::PathBuf;

/// Canvas colour under the bleed margin before edge extension.
///
/// Every margin pixel is overwritten, so this only shows if the extension
/// misses a pixel. It is deliberately loud.
pub const SENTINEL_FILL: [u8; 3] = [0xff, 0x07, 0xb0];

/// Parameters for one bleed operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BleedParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Margin added on each side, in pixels.
    pub bleed_px: u32,
    pub fill: [u8; 3],
}
