//! Job tree construction and bleeding.
//!
//! [`build_job_tree`] walks the card tree depth-first. At each directory it
//! scans, resolves the config cascade, picks the back (its own, or the one
//! inherited from the parent) and lists every front, then recurses with the
//! resolved config and the effective back as the children's inheritance:
//!
//! ```text
//! deck/                       back: -            fronts: -
//! ├── monsters/  back.png     back: monsters/    fronts: 1, 2
//! │   └── elite/              back: monsters/    fronts: 1
//! ├── tokens/                 back: -            fronts: skipped (no back)
//! └── drafts/    ignore=true  (no node)
//! ```
//!
//! Ignored directories produce no node, and nothing below them is scanned,
//! so a back defined inside one is invisible to the rest of the tree.
//!
//! ## Two Phases
//!
//! The walk itself only reads: it records a [`BleedRequest`] for every back
//! and front, in the order a sequential walk would bleed them. Bled paths are
//! known up front (`<stem>__bleed__<ext>` beside the source), so the tree is
//! complete before any pixels are touched.
//!
//! The requests then run in parallel using [rayon](https://docs.rs/rayon).
//! Several requests can target the same file: two sibling configs naming the
//! same `backfile`, or a directory whose back is also a front somewhere else.
//! Walking sequentially, the last of them would overwrite the others, so only
//! that one runs. No two workers ever write the same file, and the result on
//! disk is the same on every run.

use crate::config::{self, CardSize, ConfigError, FolderConfig};
use crate::imaging::{BackendError, ImageBackend, bleed_image};
use crate::naming;
use crate::scan::{self, ScanError, ScanMode};
use crate::types::JobNode;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to bleed {path}: {source}")]
    Bleed {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// One image to bleed, with the parameters of the directory that uses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BleedRequest {
    pub source: PathBuf,
    pub bleed_width: u32,
    pub card_size: CardSize,
}

impl BleedRequest {
    fn new(source: &Path, config: &FolderConfig) -> Self {
        Self {
            source: source.to_path_buf(),
            bleed_width: config.bleed_width,
            card_size: config.card_size,
        }
    }

    /// Where the bled image will be written.
    pub fn output(&self) -> PathBuf {
        naming::bleed_output_path(&self.source)
    }
}

/// Build the job tree rooted at `root`, bleeding every reachable image.
///
/// Returns `None` when the root itself is ignored or does not exist.
pub fn build_job_tree(
    backend: &impl ImageBackend,
    root: &Path,
) -> Result<Option<JobNode>, ProcessError> {
    build_and_bleed(backend, root, None, None)
}

/// Build the subtree at `dir` given what its parent hands down, then bleed
/// every image it references.
///
/// `inherited_back` is the parent's bled back image, if any.
pub fn build_and_bleed(
    backend: &impl ImageBackend,
    dir: &Path,
    inherited_back: Option<&Path>,
    parent_config: Option<&FolderConfig>,
) -> Result<Option<JobNode>, ProcessError> {
    let mut requests = Vec::new();
    let tree = plan_subtree(dir, inherited_back, parent_config, &mut requests)?;
    bleed_all(backend, &requests)?;
    Ok(tree)
}

/// Walk the subtree at `dir`, appending its bleeds to `requests` in walk order.
fn plan_subtree(
    dir: &Path,
    inherited_back: Option<&Path>,
    parent_config: Option<&FolderConfig>,
    requests: &mut Vec<BleedRequest>,
) -> Result<Option<JobNode>, ProcessError> {
    tracing::debug!("Scanning {}", dir.display());
    if !dir.is_dir() {
        tracing::warn!("Skipping {}: not a directory", dir.display());
        return Ok(None);
    }

    let contents = scan::scan_directory(dir, ScanMode::Sources)?;
    let config = config::resolve_config(contents.config_file.as_deref(), parent_config)?;
    if config.ignore {
        tracing::info!("Ignoring {}", dir.display());
        return Ok(None);
    }

    let mut enqueue = |source: &Path| {
        let request = BleedRequest::new(source, &config);
        let output = request.output();
        requests.push(request);
        output
    };

    // An explicit backfile wins over a back image found in the directory.
    let back = match config.back_override.as_ref().or(contents.back_image.as_ref()) {
        Some(source) => Some(enqueue(source)),
        None => inherited_back.map(Path::to_path_buf),
    };

    let fronts = if back.is_some() {
        contents.images.iter().map(|image| enqueue(image)).collect()
    } else {
        if !contents.images.is_empty() {
            tracing::warn!(
                "Back image is missing. Skipping {} front(s) in {}",
                contents.images.len(),
                dir.display()
            );
        }
        Vec::new()
    };

    let mut children = Vec::new();
    for sub in &contents.subdirectories {
        if let Some(node) = plan_subtree(sub, back.as_deref(), Some(&config), requests)? {
            children.push(node);
        }
    }

    Ok(Some(JobNode {
        directory: dir.to_path_buf(),
        config,
        back,
        fronts,
        children,
    }))
}

/// Run the requests in parallel, one per output file.
fn bleed_all(backend: &impl ImageBackend, requests: &[BleedRequest]) -> Result<(), ProcessError> {
    let pending = last_per_output(requests);
    if pending.len() < requests.len() {
        tracing::debug!(
            "{} bleed(s) superseded by a later request for the same file",
            requests.len() - pending.len()
        );
    }

    pending.par_iter().try_for_each(|request| {
        bleed_image(backend, &request.source, request.bleed_width, request.card_size)
            .map(|_| ())
            .map_err(|source| ProcessError::Bleed {
                path: request.source.clone(),
                source,
            })
    })
}

/// Requests in walk order, keeping only the last one for each output file.
///
/// Outputs are derived from the source path, so sources are compared after
/// canonicalization (`a/../back.png` and `back.png` are the same file).
pub fn last_per_output(requests: &[BleedRequest]) -> Vec<&BleedRequest> {
    let keys: Vec<PathBuf> = requests
        .iter()
        .map(|r| std::fs::canonicalize(&r.source).unwrap_or_else(|_| r.source.clone()))
        .collect();
    let last: HashMap<&PathBuf, usize> = keys.iter().enumerate().map(|(i, k)| (k, i)).collect();

    requests
        .iter()
        .enumerate()
        .filter(|(i, _)| last.get(&keys[*i]) == Some(i))
        .map(|(_, r)| r)
        .collect()
}
