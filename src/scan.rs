//! Single-directory scanning.
//!
//! [`scan_directory`] lists exactly one directory (no recursion) and sorts
//! its entries into the roles the pipeline cares about:
//!
//! ```text
//! monsters/
//! ├── config.ini        → config_file
//! ├── back.png          → back_image
//! ├── 1.png             → front_images[0]
//! ├── 2.png             → front_images[1]
//! ├── 10.png            → front_images[2]
//! ├── notes.txt         (ignored)
//! └── elite/            → subdirectories[0]
//! ```
//!
//! ## Ordering
//!
//! Entries are first listed by name, then stably sorted by
//! [`naming::sort_key`]. Numeric stems therefore come out in numeric order,
//! and every non-numeric stem shares key `0`, keeping name order among
//! themselves. Negative numeric stems sort before them.
//!
//! ## Modes
//!
//! [`ScanMode::Sources`] is used by the tree builder. [`ScanMode::BleedArtifacts`]
//! is used only by the cleanup pass and lists generated files instead of
//! source images.

use crate::naming;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Source images, back image and config file.
    Sources,
    /// Previously generated bleed files only.
    BleedArtifacts,
}

/// What one directory contains.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DirectoryContents {
    pub config_file: Option<PathBuf>,
    pub back_image: Option<PathBuf>,
    /// Front images in [`ScanMode::Sources`], bleed files in
    /// [`ScanMode::BleedArtifacts`].
    pub images: Vec<PathBuf>,
    pub subdirectories: Vec<PathBuf>,
}

/// Scan one directory.
///
/// A path that does not exist or is not a directory scans as empty.
pub fn scan_directory(path: &Path, mode: ScanMode) -> Result<DirectoryContents, ScanError> {
    if !path.is_dir() {
        return Ok(DirectoryContents::default());
    }

    let (mut files, subdirectories) = collect_entries(path)?;
    files.sort_by_key(|f| naming::sort_key(f));

    let config_file = files.iter().find(|f| naming::is_config_file(f)).cloned();

    let (back_image, images) = match mode {
        ScanMode::BleedArtifacts => (
            None,
            files
                .into_iter()
                .filter(|f| naming::is_bleed_artifact(f))
                .collect(),
        ),
        ScanMode::Sources => {
            let mut images: Vec<PathBuf> = files
                .into_iter()
                .filter(|f| naming::is_image(f) && !naming::is_bleed_artifact(f))
                .collect();
            let back = images
                .iter()
                .position(|f| naming::is_back_image(f))
                .map(|idx| images.remove(idx));
            (back, images)
        }
    };

    Ok(DirectoryContents {
        config_file,
        back_image,
        images,
        subdirectories,
    })
}

/// List a directory into (files, subdirectories), both in name order.
fn collect_entries(path: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), ScanError> {
    let io_err = |source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in fs::read_dir(path).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let entry_path = entry.path();
        if entry_path.is_dir() {
            dirs.push(entry_path);
        } else if entry_path.is_file() {
            files.push(entry_path);
        }
    }

    files.sort();
    dirs.sort();
    Ok((files, dirs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "x").unwrap();
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn partitions_directory_entries() {
        let tmp = TempDir::new().unwrap();
        for name in ["config.ini", "back.png", "1.png", "2.jpg", "notes.txt"] {
            touch(tmp.path(), name);
        }
        fs::create_dir(tmp.path().join("elite")).unwrap();

        let contents = scan_directory(tmp.path(), ScanMode::Sources).unwrap();

        assert_eq!(contents.config_file, Some(tmp.path().join("config.ini")));
        assert_eq!(contents.back_image, Some(tmp.path().join("back.png")));
        assert_eq!(names(&contents.images), vec!["1.png", "2.jpg"]);
        assert_eq!(names(&contents.subdirectories), vec!["elite"]);
    }

    #[test]
    fn fronts_sorted_numerically() {
        let tmp = TempDir::new().unwrap();
        for name in ["10.png", "2.png", "1.png"] {
            touch(tmp.path(), name);
        }

        let contents = scan_directory(tmp.path(), ScanMode::Sources).unwrap();
        assert_eq!(names(&contents.images), vec!["1.png", "2.png", "10.png"]);
    }

    #[test]
    fn non_numeric_stems_sort_as_zero() {
        let tmp = TempDir::new().unwrap();
        for name in ["3.png", "zebra.png", "1.png", "ace.png", "-1.png"] {
            touch(tmp.path(), name);
        }

        let contents = scan_directory(tmp.path(), ScanMode::Sources).unwrap();
        assert_eq!(
            names(&contents.images),
            vec!["-1.png", "ace.png", "zebra.png", "1.png", "3.png"]
        );
    }

    #[test]
    fn first_back_wins() {
        let tmp = TempDir::new().unwrap();
        for name in ["a_back.png", "b_back.png", "1.png"] {
            touch(tmp.path(), name);
        }

        let contents = scan_directory(tmp.path(), ScanMode::Sources).unwrap();
        assert_eq!(contents.back_image, Some(tmp.path().join("a_back.png")));
        // The other back stays a front: only one is extracted.
        assert_eq!(names(&contents.images), vec!["b_back.png", "1.png"]);
    }

    #[test]
    fn sources_mode_skips_artifacts() {
        let tmp = TempDir::new().unwrap();
        for name in ["1.png", "1__bleed__.png"] {
            touch(tmp.path(), name);
        }

        let contents = scan_directory(tmp.path(), ScanMode::Sources).unwrap();
        assert_eq!(names(&contents.images), vec!["1.png"]);
    }

    #[test]
    fn artifacts_mode_lists_only_bleed_files() {
        let tmp = TempDir::new().unwrap();
        for name in ["1.png", "1__bleed__.png", "back__bleed__.jpg", "back.png"] {
            touch(tmp.path(), name);
        }

        let contents = scan_directory(tmp.path(), ScanMode::BleedArtifacts).unwrap();
        assert_eq!(contents.back_image, None);
        assert_eq!(
            names(&contents.images),
            vec!["1__bleed__.png", "back__bleed__.jpg"]
        );
    }

    #[test]
    fn missing_directory_scans_empty() {
        let contents =
            scan_directory(Path::new("/nonexistent/card/dir"), ScanMode::Sources).unwrap();
        assert_eq!(contents, DirectoryContents::default());
    }

    #[test]
    fn file_path_scans_empty() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "1.png");
        let contents = scan_directory(&tmp.path().join("1.png"), ScanMode::Sources).unwrap();
        assert!(contents.images.is_empty());
        assert!(contents.subdirectories.is_empty());
    }
}
