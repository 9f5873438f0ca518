//! Backend decorator that reads but never writes.
//!
//! Used by `check` to resolve the whole job tree (every source is still
//! identified, so unreadable images surface) without producing artifacts.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::bled_canvas_size;
use super::params::BleedParams;
use std::path::Path;

pub struct DryRunBackend<'a, B> {
    inner: &'a B,
}

impl<'a, B: ImageBackend> DryRunBackend<'a, B> {
    pub fn new(inner: &'a B) -> Self {
        Self { inner }
    }
}

impl<B: ImageBackend> ImageBackend for DryRunBackend<'_, B> {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        self.inner.identify(path)
    }

    /// Reports the size the bled image would have.
    fn bleed(&self, params: &BleedParams) -> Result<Dimensions, BackendError> {
        let source = self.inner.identify(&params.source)?;
        let (width, height) = bled_canvas_size((source.width, source.height), params.bleed_px);
        Ok(Dimensions { width, height })
    }
}
