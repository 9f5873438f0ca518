//! Whole-run orchestration.
//!
//! ```text
//! cleanup → build + bleed → assemble → cleanup
//! ```
//!
//! [`run`] is what the `run` command executes; [`check`] resolves the same
//! job tree and document plan without writing or deleting anything.

use crate::assemble::{self, AssembleError};
use crate::cleanup::{self, CleanupError};
use crate::imaging::{DryRunBackend, ImageBackend};
use crate::pdf::DocumentWriter;
use crate::process::{self, ProcessError};
use crate::types::{DocumentPlan, JobNode};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),
    #[error(transparent)]
    Cleanup(#[from] CleanupError),
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Leave the bled images in place after merging.
    pub keep_bleeds: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub root: PathBuf,
    /// Stale artifacts removed before the build.
    pub removed_before: usize,
    /// Fronts bled across the tree.
    pub fronts: usize,
    pub documents: Vec<PathBuf>,
    /// Artifacts removed after merging; `None` with `keep_bleeds`.
    pub removed_after: Option<usize>,
}

/// What a run would do, computed without side effects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub root: PathBuf,
    /// `None` when the root itself is ignored.
    pub tree: Option<JobNode>,
    pub documents: Vec<DocumentPlan>,
    /// Artifacts a run would remove first.
    pub stale_artifacts: Vec<PathBuf>,
}

/// Canonicalize the root; it must be an existing directory.
pub fn resolve_root(root: &Path) -> Result<PathBuf, PipelineError> {
    if !root.is_dir() {
        return Err(PipelineError::RootNotFound(root.to_path_buf()));
    }
    root.canonicalize()
        .map_err(|_| PipelineError::RootNotFound(root.to_path_buf()))
}

/// Run the full pipeline on `root`.
pub fn run(
    root: &Path,
    backend: &impl ImageBackend,
    writer: &impl DocumentWriter,
    options: RunOptions,
) -> Result<RunSummary, PipelineError> {
    let root = resolve_root(root)?;

    tracing::info!("Cleaning up {}", root.display());
    let removed_before = cleanup::cleanup(&root)?;

    tracing::info!("Bleeding images under {}", root.display());
    let tree = process::build_job_tree(backend, &root)?;

    let (fronts, documents) = match &tree {
        Some(tree) => {
            tracing::info!("Merging documents");
            (tree.front_count(), assemble::assemble(&root, tree, writer)?)
        }
        None => {
            tracing::warn!("{} is ignored, nothing to merge", root.display());
            (0, Vec::new())
        }
    };

    let removed_after = if options.keep_bleeds {
        tracing::info!("Keeping bled images");
        None
    } else {
        tracing::info!("Final cleanup");
        Some(cleanup::cleanup(&root)?)
    };

    tracing::info!("Done: {} document(s)", documents.len());
    Ok(RunSummary {
        root,
        removed_before,
        fronts,
        documents,
        removed_after,
    })
}

/// Resolve the job tree and document plan for `root` without writing.
///
/// Images are still identified through `backend`, so unreadable sources and
/// malformed configs fail here just as they would in [`run`].
pub fn check(root: &Path, backend: &impl ImageBackend) -> Result<CheckReport, PipelineError> {
    let root = resolve_root(root)?;
    let stale_artifacts = cleanup::find_artifacts(&root);
    let tree = process::build_job_tree(&DryRunBackend::new(backend), &root)?;
    let documents = tree
        .as_ref()
        .map(|tree| assemble::plan_documents(&root, tree))
        .unwrap_or_default();

    Ok(CheckReport {
        root,
        tree,
        documents,
        stale_artifacts,
    })
}

/// Remove every artifact under `root` (the `clean` command).
pub fn clean(root: &Path) -> Result<usize, PipelineError> {
    let root = resolve_root(root)?;
    Ok(cleanup::cleanup(&root)?)
}
