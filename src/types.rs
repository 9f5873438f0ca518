//! Types shared by the build, assembly and output stages.

use crate::config::{CardSize, FolderConfig};
use serde::Serialize;
use std::path::PathBuf;

/// One resolved directory of the card tree.
///
/// Built once by [`process::build_job_tree`](crate::process::build_job_tree)
/// and read-only afterwards. Ignored directories have no node at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobNode {
    pub directory: PathBuf,
    pub config: FolderConfig,
    /// Bled back used by this directory's fronts: its own if it has one,
    /// otherwise the nearest ancestor's. Shared, never copied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<PathBuf>,
    /// Bled fronts, in scan order. Always empty when `back` is `None`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fronts: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JobNode>,
}

impl JobNode {
    /// Depth-first, pre-order iterator over this node and its descendants.
    pub fn iter(&self) -> impl Iterator<Item = &JobNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Number of bled fronts in this subtree.
    pub fn front_count(&self) -> usize {
        self.iter().map(|n| n.fronts.len()).sum()
    }
}

/// Which face of a card a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

/// One page of a merged document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagePlan {
    pub image: PathBuf,
    /// Physical size (mm) the image is drawn at: its node's card size plus bleed.
    pub size: CardSize,
    pub side: Side,
}

/// A document ready to be written.
///
/// `page_size` comes from the node that opened the document; pages appended
/// by descendants keep their own `size`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentPlan {
    pub output: PathBuf,
    pub page_size: CardSize,
    pub pages: Vec<PagePlan>,
}
