//! Image processing: the bleed generator.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Bleed** | decode → [`edges::extend_edges`] → encode beside the source |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for bleed geometry (unit testable)
//! - **Edges**: The pixel-exact edge extension on an in-memory raster
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`], and [`DryRunBackend`] for `check`
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod dry_run;
pub mod edges;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{BleedGeometry, bled_canvas_size, calculate_bleed_geometry, pixels_per_mm};
pub use dry_run::DryRunBackend;
pub use operations::{BledImage, bleed_image};
pub use params::{BleedParams, SENTINEL_FILL};
pub use rust_backend::RustBackend;
