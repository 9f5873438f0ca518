//! Shared test utilities for building card trees on disk.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let deck = tmp.path().join("deck");
//! touch_all(&deck, &["back.png", "1.png"]);
//! write_config(&deck, r#"{"quantity": 2}"#);
//! ```

use crate::naming;
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

// =========================================================================
// Tree setup
// =========================================================================

/// Create `dir` (and parents) plus one empty file per name.
///
/// Enough for anything that runs against `MockBackend`, which never reads
/// file contents.
pub fn touch_all(dir: &Path, names: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    for name in names {
        std::fs::write(dir.join(name), b"").unwrap();
    }
}

/// Write `content` as the directory's config file.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(naming::CONFIG_MARKER);
    std::fs::write(&path, content).unwrap();
    path
}

/// Write a real PNG with a gradient so edge pixels are distinguishable.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
    .save(path)
    .unwrap();
}

// =========================================================================
// Inspection
// =========================================================================

/// Every bleed artifact under `root`, sorted.
pub fn artifacts_under(root: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && naming::is_bleed_artifact(e.path()))
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found
}

/// File names of `paths`, in order.
pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| {
            p.file_name()
                .unwrap_or_else(|| panic!("no file name in {}", p.display()))
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}
