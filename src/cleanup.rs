//! Removal of generated bleed files.
//!
//! The cleanup pass runs before a build (so every run starts from scratch)
//! and after it (so only the merged documents are left behind). It ignores
//! the config cascade: ignored directories are cleaned like any other.

use crate::naming;
use crate::scan::{self, ScanError, ScanMode};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Delete every bleed artifact under `path`. Returns how many were removed.
///
/// A missing `path` removes nothing.
pub fn cleanup(path: &Path) -> Result<usize, CleanupError> {
    let contents = scan::scan_directory(path, ScanMode::BleedArtifacts)?;

    let mut removed = 0;
    for artifact in &contents.images {
        std::fs::remove_file(artifact).map_err(|source| CleanupError::Remove {
            path: artifact.clone(),
            source,
        })?;
        tracing::info!("Removed {}", artifact.display());
        removed += 1;
    }

    for sub in &contents.subdirectories {
        removed += cleanup(sub)?;
    }
    Ok(removed)
}

/// List bleed artifacts under `root` without touching them.
///
/// Unreadable entries are logged and skipped.
pub fn find_artifacts(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && naming::is_bleed_artifact(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}
