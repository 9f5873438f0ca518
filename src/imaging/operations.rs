//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{BleedGeometry, calculate_bleed_geometry};
use super::params::{BleedParams, SENTINEL_FILL};
use crate::config::CardSize;
use crate::naming;
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// A written bleed artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BledImage {
    pub output: PathBuf,
    pub geometry: BleedGeometry,
}

/// Plan a bleed operation without executing it.
pub fn plan_bleed(source: &Path, geometry: &BleedGeometry) -> BleedParams {
    BleedParams {
        source: source.to_path_buf(),
        output: naming::bleed_output_path(source),
        bleed_px: geometry.bleed_px,
        fill: SENTINEL_FILL,
    }
}

/// Bleed one image and write the result beside it.
///
/// The pixel scale comes from the source width and the trim width, so the
/// source must already be exactly trim-sized at some resolution.
pub fn bleed_image(
    backend: &impl ImageBackend,
    source: &Path,
    bleed_width_mm: u32,
    card_size: CardSize,
) -> Result<BledImage> {
    let dims = backend.identify(source)?;
    let geometry = calculate_bleed_geometry((dims.width, dims.height), bleed_width_mm, card_size.width);
    if geometry.scale == 0 {
        tracing::warn!(
            "{} is narrower ({}px) than the {}mm trim width; no bleed added",
            source.display(),
            dims.width,
            card_size.width
        );
    }

    let params = plan_bleed(source, &geometry);
    let written = backend.bleed(&params)?;

    tracing::info!(
        "bleeding {} --> bleed: {}px, ratio: {}, {}x{}, {}x{}",
        source.display(),
        geometry.bleed_px,
        geometry.scale,
        dims.width,
        dims.height,
        written.width,
        written.height
    );

    Ok(BledImage {
        output: params.output,
        geometry,
    })
}
