//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the pipeline needs:
//! `identify` (read dimensions) and `bleed` (decode, extend, encode).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) on top of the `image`
//! crate. Tests use the recording `MockBackend` below so tree building can be
//! exercised without decoding anything.

use super::params::BleedParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` because bleeds run on the rayon pool.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Write the bled version of `params.source` to `params.output`.
    /// Returns the dimensions of the written image.
    fn bleed(&self, params: &BleedParams) -> Result<Dimensions, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    ///
    /// Every identified image reports `dimensions`; paths in `failing` error.
    pub struct MockBackend {
        pub dimensions: Dimensions,
        pub failing: HashSet<PathBuf>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Bleed {
            source: String,
            output: String,
            bleed_px: u32,
        },
    }

    impl Default for MockBackend {
        fn default() -> Self {
            // 63x89 mm at 10 px/mm
            Self::with_dimensions(Dimensions {
                width: 630,
                height: 890,
            })
        }
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dimensions: Dimensions) -> Self {
            Self {
                dimensions,
                failing: HashSet::new(),
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn failing_on(mut self, path: impl Into<PathBuf>) -> Self {
            self.failing.insert(path.into());
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// Sources of every recorded bleed, sorted (rayon runs them in any order).
        pub fn bled_sources(&self) -> Vec<String> {
            let mut sources: Vec<String> = self
                .get_operations()
                .into_iter()
                .filter_map(|op| match op {
                    RecordedOp::Bleed { source, .. } => Some(source),
                    RecordedOp::Identify(_) => None,
                })
                .collect();
            sources.sort();
            sources
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            if self.failing.contains(path) {
                return Err(BackendError::ProcessingFailed(format!(
                    "mock decode failure: {}",
                    path.display()
                )));
            }
            Ok(self.dimensions)
        }

        fn bleed(&self, params: &BleedParams) -> Result<Dimensions, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Bleed {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                bleed_px: params.bleed_px,
            });
            let (width, height) = crate::imaging::calculations::bled_canvas_size(
                (self.dimensions.width, self.dimensions.height),
                params.bleed_px,
            );
            Ok(Dimensions { width, height })
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(Dimensions {
            width: 800,
            height: 600,
        });

        let result = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_records_bleed() {
        let backend = MockBackend::new();

        let dims = backend
            .bleed(&BleedParams {
                source: "/deck/1.png".into(),
                output: "/deck/1__bleed__.png".into(),
                bleed_px: 30,
                fill: [0, 0, 0],
            })
            .unwrap();

        assert_eq!(dims, Dimensions { width: 689, height: 949 });
        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Bleed { bleed_px: 30, .. }));
    }

    #[test]
    fn mock_fails_on_configured_path() {
        let backend = MockBackend::new().failing_on("/deck/bad.png");
        assert!(backend.identify(Path::new("/deck/bad.png")).is_err());
        assert!(backend.identify(Path::new("/deck/good.png")).is_ok());
    }
}
