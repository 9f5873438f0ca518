//! # Card Bleeder
//!
//! Prepares tabletop card artwork for printing. Every card image in a
//! directory tree gets a print bleed (a margin extended from its edge
//! pixels), then the bled fronts and their shared back are merged into
//! print-ready PDFs.
//!
//! # Architecture: One Run, Four Steps
//!
//! ```text
//! 1. Cleanup    remove *__bleed__* files left by a previous run
//! 2. Build      walk the tree, resolve configs, bleed backs and fronts → JobNode tree
//! 3. Assemble   plan documents from the tree and write them as PDFs
//! 4. Cleanup    remove the bled images again
//! ```
//!
//! Every run starts from scratch; nothing is cached between runs.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Filename conventions: numeric order, back/config/bleed markers, document names |
//! | [`config`] | Per-directory `config.ini` loading, validation and cascade |
//! | [`scan`] | Lists one directory into config, back, fronts and subdirectories |
//! | [`imaging`] | Bleed geometry, edge extension, image backends |
//! | [`types`] | Shared types: the `JobNode` tree and document plans |
//! | [`process`] | Step 2: builds the job tree and bleeds images in parallel |
//! | [`assemble`] | Step 3: decides document ownership and page order |
//! | [`pdf`] | `DocumentWriter` trait and the `lopdf` PDF writer |
//! | [`cleanup`] | Steps 1 and 4: removes generated files |
//! | [`pipeline`] | Runs the steps in order; also the side-effect free `check` |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## The Filesystem Is the Project File
//!
//! There is no project manifest. Directories group cards, a `back.png` (or
//! `*_back.png`) next to the fronts is their back, and a `config.ini` in any
//! directory overrides its parent's settings:
//!
//! ```text
//! deck/config.ini                ← root (overrides stock defaults)
//! deck/monsters/config.ini       ← overrides deck/
//! deck/monsters/elite/           ← no file: same config as monsters/
//! ```
//!
//! ## Edge Extension, Not Scaling
//!
//! The bleed is produced by repeating the outermost row/column of pixels
//! outward (corners repeat the corner pixel). The artwork itself is never
//! resampled, so what is inside the trim line prints exactly as drawn. See
//! [`imaging::edges`].
//!
//! ## Documents Follow the Tree
//!
//! The root always gets a PDF; a directory with `output` set starts its own.
//! Everything else lands in the nearest enclosing document, in depth-first
//! order. See [`assemble`].

pub mod assemble;
pub mod cleanup;
pub mod config;
pub mod imaging;
pub mod logging;
pub mod naming;
pub mod output;
pub mod pdf;
pub mod pipeline;
pub mod process;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
