//! Pure Rust image backend built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only) |
//! | Decode (JPEG, PNG) | `image::ImageReader` |
//! | Edge extension | [`extend_edges`](super::edges::extend_edges) |
//! | Encode | `ImageBuffer::save`, format from the output extension |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::edges::extend_edges;
use super::params::BleedParams;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to read dimensions of {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Dimensions { width, height })
    }

    fn bleed(&self, params: &BleedParams) -> Result<Dimensions, BackendError> {
        let source = load_image(&params.source)?.to_rgb8();
        let bled = extend_edges(&source, params.bleed_px, params.fill);
        if bled.width() == 0 || bled.height() == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "{} is too small to bleed ({}x{})",
                params.source.display(),
                source.width(),
                source.height()
            )));
        }

        bled.save(&params.output).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to write {}: {}",
                params.output.display(),
                e
            ))
        })?;

        Ok(Dimensions {
            width: bled.width(),
            height: bled.height(),
        })
    }
}
