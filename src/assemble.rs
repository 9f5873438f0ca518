//! Document assembly: turns the finished job tree into merged documents.
//!
//! Assembly is split in two so the document forest can be inspected without
//! writing anything (`check` prints it):
//!
//! 1. [`plan_documents`] walks the tree depth-first and decides, per node,
//!    whether it opens a new document or appends to its parent's.
//! 2. [`assemble`] hands each plan to a [`DocumentWriter`], in the order the
//!    documents were finalized.
//!
//! ## Ownership
//!
//! The root always opens a document, and so does every node whose config
//! sets `output`. A node appends its pages (and its descendants' pages,
//! unless they open their own) to whatever document it owns or inherits:
//!
//! ```text
//! deck/                  → deck.pdf
//! ├── monsters/          → deck.pdf
//! ├── promo/  output=1   → deck-promo.pdf
//! │   └── foil/          → deck-promo.pdf
//! └── tokens/            → deck.pdf
//! ```
//!
//! A document is finalized when the node that opened it has been fully
//! visited, so nested documents come out before their enclosing one.
//! Documents without pages are dropped.

use crate::config::CardSize;
use crate::naming;
use crate::pdf::{DocumentError, DocumentWriter};
use crate::types::{DocumentPlan, JobNode, PagePlan, Side};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root name used when the root path has no final component (e.g. `/`).
const FALLBACK_ROOT_NAME: &str = "cards";

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("Failed to remove existing {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Write(#[from] DocumentError),
}

/// Plan every document for the tree rooted at `node`.
///
/// `root` is the scan root: documents are written there and named after it.
pub fn plan_documents(root: &Path, node: &JobNode) -> Vec<DocumentPlan> {
    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_ROOT_NAME.to_string());

    let mut planner = Planner {
        root,
        root_name,
        open: Vec::new(),
        finished: Vec::new(),
    };
    planner.visit(node, None);
    planner.finished
}

/// Write every planned document, replacing existing files.
///
/// Returns the written paths in finalization order.
pub fn assemble(
    root: &Path,
    node: &JobNode,
    writer: &impl DocumentWriter,
) -> Result<Vec<PathBuf>, AssembleError> {
    let plans = plan_documents(root, node);
    if plans.is_empty() {
        tracing::warn!("No pages to merge under {}", root.display());
    }

    let mut written = Vec::with_capacity(plans.len());
    for plan in &plans {
        remove_existing(&plan.output)?;
        writer.write(plan)?;
        tracing::info!(
            "Merged {} page(s) into {}",
            plan.pages.len(),
            plan.output.display()
        );
        written.push(plan.output.clone());
    }
    Ok(written)
}

fn remove_existing(path: &Path) -> Result<(), AssembleError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("Removed previous {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(AssembleError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

struct OpenDocument {
    output: PathBuf,
    page_size: CardSize,
    pages: Vec<PagePlan>,
}

struct Planner<'a> {
    root: &'a Path,
    root_name: String,
    /// Every document opened so far; indices are stable handles.
    open: Vec<OpenDocument>,
    finished: Vec<DocumentPlan>,
}

impl Planner<'_> {
    fn visit(&mut self, node: &JobNode, current: Option<usize>) {
        let (doc, owned) = match current {
            Some(idx) if !node.config.document_boundary => (idx, false),
            _ => (self.open_document(node), true),
        };

        if let Some(back) = &node.back {
            let size = node.config.page_size();
            let pages = &mut self.open[doc].pages;
            for front in &node.fronts {
                for _ in 0..node.config.quantity {
                    pages.push(PagePlan {
                        image: front.clone(),
                        size,
                        side: Side::Front,
                    });
                    pages.push(PagePlan {
                        image: back.clone(),
                        size,
                        side: Side::Back,
                    });
                }
            }
        }

        for child in &node.children {
            self.visit(child, Some(doc));
        }

        if owned {
            self.finalize(doc);
        }
    }

    fn open_document(&mut self, node: &JobNode) -> usize {
        let relative = node
            .directory
            .strip_prefix(self.root)
            .unwrap_or(Path::new(""));
        let output = self
            .root
            .join(naming::document_file_name(&self.root_name, relative));
        tracing::debug!(
            "{} opens {}",
            node.directory.display(),
            output.display()
        );

        self.open.push(OpenDocument {
            output,
            page_size: node.config.page_size(),
            pages: Vec::new(),
        });
        self.open.len() - 1
    }

    fn finalize(&mut self, doc: usize) {
        let document = &mut self.open[doc];
        if document.pages.is_empty() {
            tracing::debug!("Dropping empty {}", document.output.display());
            return;
        }
        self.finished.push(DocumentPlan {
            output: document.output.clone(),
            page_size: document.page_size,
            pages: std::mem::take(&mut document.pages),
        });
    }
}
