//! Centralized filename conventions.
//!
//! Every decision the pipeline makes from a file *name* lives here, so the
//! heuristics stay in one place and can be tested in isolation:
//!
//! | Convention | Rule | Example |
//! |---|---|---|
//! | Sort key | filename stem parsed as an integer, else `0` | `12.png` → 12, `ace.png` → 0 |
//! | Back image | name contains `_back.`, or stem is exactly `back` (case-sensitive) | `back.png`, `goblins_back.jpg`, `card_back.v2.png` |
//! | Config file | name contains `config.ini` | `config.ini`, `deck.config.ini` |
//! | Bleed artifact | name contains `__bleed__` | `12__bleed__.png` |
//! | Merged document | root name + relative segments, hyphen-joined | `deck-monsters-elite.pdf` |
//!
//! Matching is substring/suffix based and first-match-wins. That is fragile
//! by nature; keep new call sites going through these functions rather than
//! re-implementing the checks.

use std::path::{Component, Path, PathBuf};

/// Marker inserted between stem and extension of every generated bleed file.
pub const BLEED_MARKER: &str = "__bleed__";

/// Substring identifying a directory's config file.
pub const CONFIG_MARKER: &str = "config.ini";

/// Substring identifying a directory's back image.
pub const BACK_MARKER: &str = "_back.";

/// Stem of a back image that carries no card name.
pub const BARE_BACK_STEM: &str = "back";

/// Raster extensions the pipeline reads (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Numeric ordering key for a front image.
///
/// The whole stem must parse as an integer (surrounding whitespace and a
/// sign are accepted). Anything else sorts as `0`.
///
/// - `"7.png"` → 7
/// - `"007.png"` → 7
/// - `"-2.png"` → -2
/// - `"ace.png"` → 0
/// - `"01-ace.png"` → 0  (prefix numbers do not count)
pub fn sort_key(path: &Path) -> i64 {
    file_stem(path).trim().parse::<i64>().unwrap_or(0)
}

/// Whether the file has one of the allowed raster extensions.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether an image is a directory's back image.
pub fn is_back_image(path: &Path) -> bool {
    file_name(path).contains(BACK_MARKER) || file_stem(path) == BARE_BACK_STEM
}

/// Whether a file is a directory config file.
pub fn is_config_file(path: &Path) -> bool {
    file_name(path).contains(CONFIG_MARKER)
}

/// Whether a file was produced by the bleed generator.
pub fn is_bleed_artifact(path: &Path) -> bool {
    file_name(path).contains(BLEED_MARKER)
}

/// Path of the bleed artifact for `source`: `<stem>__bleed__.<ext>` beside it.
///
/// `cards/12.png` → `cards/12__bleed__.png`
pub fn bleed_output_path(source: &Path) -> PathBuf {
    let stem = file_stem(source);
    let name = match source.extension() {
        Some(ext) => format!("{stem}{BLEED_MARKER}.{}", ext.to_string_lossy()),
        None => format!("{stem}{BLEED_MARKER}"),
    };
    source.with_file_name(name)
}

/// File name of a merged document.
///
/// `relative` is the path from the root to the directory that opened the
/// document; the root itself passes an empty path.
///
/// - `("deck", "")` → `deck.pdf`
/// - `("deck", "monsters/elite")` → `deck-monsters-elite.pdf`
pub fn document_file_name(root_name: &str, relative: &Path) -> String {
    let mut parts = vec![root_name.to_string()];
    parts.extend(relative.components().filter_map(|c| match c {
        Component::Normal(seg) => Some(seg.to_string_lossy().into_owned()),
        _ => None,
    }));
    format!("{}.pdf", parts.join("-"))
}
