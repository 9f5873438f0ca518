//! Per-directory configuration and its cascade.
//!
//! Any directory in the card tree may hold a config file (any file whose name
//! contains `config.ini`). Its keys override the resolved config of the parent
//! directory; the stock defaults are the implicit parent of the root.
//!
//! ```text
//! deck/
//! ├── config.ini               ← root (overrides stock defaults)
//! ├── monsters/
//! │   ├── config.ini           ← overrides deck/
//! │   └── elite/               ← no file: identical to monsters/
//! └── tokens/
//!     └── config.ini           ← overrides deck/
//! ```
//!
//! ## Keys
//!
//! ```toml
//! bleed = 3          # bleed width in mm
//! width = 63         # trim width in mm
//! height = 89        # trim height in mm
//! quantity = 3       # copies of each front/back pair
//! output = false     # start a separate PDF at this directory
//! ignore = false     # skip this directory and everything below it
//! backfile = "art/shared_back.png"   # opened from the working directory
//! ```
//!
//! The original JSON form (`{"bleed": 3, "quantity": 2}`) is still accepted:
//! a document starting with `{` is read as JSON, anything else as TOML.
//!
//! ## Inheritance
//!
//! - `bleed`, `width`, `height`, `quantity` inherit from the parent when the
//!   key is absent or cannot be read as a number.
//! - `output` and `ignore` never inherit: absent means `false`. They are read
//!   by truthiness, so any non-empty string (even `"false"`) enables them.
//! - `backfile` does not inherit through the config either; the bled back
//!   image is inherited through the job tree instead.
//! - A directory *without* a config file takes its parent's resolved config
//!   verbatim, flags and `backfile` included.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BLEED: u32 = 3;
pub const DEFAULT_CARD_SIZE: CardSize = CardSize {
    width: 63,
    height: 89,
};
pub const DEFAULT_QUANTITY: u32 = 3;

/// Largest accepted `bleed`, `width` or `height`, in mm.
pub const MAX_DIMENSION_MM: u32 = 10_000;

const KNOWN_KEYS: &[&str] = &[
    "bleed", "width", "height", "quantity", "output", "ignore", "backfile",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config {path}: {message}")]
    Malformed { path: PathBuf, message: String },
    #[error("Invalid config {path}: {message}")]
    Validation { path: PathBuf, message: String },
}

/// Trim size of a card in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardSize {
    pub width: u32,
    pub height: u32,
}

impl CardSize {
    /// Size including `bleed` on every side.
    ///
    /// Saturates; validated configs stay far below `u32::MAX`.
    pub fn with_bleed(self, bleed: u32) -> CardSize {
        let margin = bleed.saturating_mul(2);
        CardSize {
            width: self.width.saturating_add(margin),
            height: self.height.saturating_add(margin),
        }
    }
}

/// Fully resolved configuration of one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderConfig {
    /// Bleed added on each side, in mm.
    pub bleed_width: u32,
    /// Trim size, before bleed.
    pub card_size: CardSize,
    /// Front/back page pairs emitted per front image.
    pub quantity: u32,
    /// This directory starts its own output document.
    pub document_boundary: bool,
    /// This directory and its subtree are excluded from the run.
    pub ignore: bool,
    /// Explicit back image exactly as written in the config file. Relative
    /// paths open from the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_override: Option<PathBuf>,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            bleed_width: DEFAULT_BLEED,
            card_size: DEFAULT_CARD_SIZE,
            quantity: DEFAULT_QUANTITY,
            document_boundary: false,
            ignore: false,
            back_override: None,
        }
    }
}

impl FolderConfig {
    /// Physical page size of a document opened with this config.
    pub fn page_size(&self) -> CardSize {
        self.card_size.with_bleed(self.bleed_width)
    }
}

/// Resolve the config of one directory.
///
/// With no config file the parent config (or the stock defaults at the root)
/// is returned unchanged. A malformed or invalid file is an error; it is never
/// replaced by defaults.
pub fn resolve_config(
    config_file: Option<&Path>,
    parent: Option<&FolderConfig>,
) -> Result<FolderConfig, ConfigError> {
    let base = parent.cloned().unwrap_or_default();
    let Some(path) = config_file else {
        return Ok(base);
    };

    tracing::debug!("Loading config {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_document(path, &content)?;
    merge_document(path, &document, &base)
}

/// Parse config text into a JSON object, whichever syntax it was written in.
fn parse_document(path: &Path, content: &str) -> Result<serde_json::Map<String, Value>, ConfigError> {
    let malformed = |message: String| ConfigError::Malformed {
        path: path.to_path_buf(),
        message,
    };

    let value = if content.trim_start().starts_with('{') {
        serde_json::from_str::<Value>(content).map_err(|e| malformed(e.to_string()))?
    } else {
        let table: toml::Table = toml::from_str(content).map_err(|e| malformed(e.to_string()))?;
        serde_json::to_value(table).map_err(|e| malformed(e.to_string()))?
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(malformed(format!(
            "expected a table of settings, found {}",
            json_kind(&other)
        ))),
    }
}

fn merge_document(
    path: &Path,
    doc: &serde_json::Map<String, Value>,
    base: &FolderConfig,
) -> Result<FolderConfig, ConfigError> {
    let invalid = |message: String| ConfigError::Validation {
        path: path.to_path_buf(),
        message,
    };

    for key in doc.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        tracing::warn!("Unknown key '{}' in {}", key, path.display());
    }

    let bleed = int_or(doc.get("bleed"), i64::from(base.bleed_width));
    let width = int_or(doc.get("width"), i64::from(base.card_size.width));
    let height = int_or(doc.get("height"), i64::from(base.card_size.height));
    let quantity = int_or(doc.get("quantity"), i64::from(base.quantity));

    let bleed_width = dimension(bleed, 0).ok_or_else(|| {
        invalid(format!("bleed must be between 0 and {MAX_DIMENSION_MM}, got {bleed}"))
    })?;
    let width = dimension(width, 1).ok_or_else(|| {
        invalid(format!("width must be between 1 and {MAX_DIMENSION_MM}, got {width}"))
    })?;
    let height = dimension(height, 1).ok_or_else(|| {
        invalid(format!("height must be between 1 and {MAX_DIMENSION_MM}, got {height}"))
    })?;
    let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);

    let back_override = match doc.get("backfile") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(PathBuf::from(s)),
        Some(other) => {
            return Err(invalid(format!(
                "backfile must be a path string, found {}",
                json_kind(other)
            )));
        }
    };

    Ok(FolderConfig {
        bleed_width,
        card_size: CardSize { width, height },
        quantity,
        document_boundary: truthy(doc.get("output")),
        ignore: truthy(doc.get("ignore")),
        back_override,
    })
}

fn dimension(value: i64, min: u32) -> Option<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| (min..=MAX_DIMENSION_MM).contains(v))
}

/// Read a value as an integer, or fall back.
///
/// Integers pass through, floats truncate toward zero, booleans count as
/// 0/1 and strings must hold a whole integer. Everything else falls back.
fn int_or(value: Option<&Value>, fallback: i64) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(fallback),
        Some(Value::Bool(b)) => i64::from(*b),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(fallback),
        _ => fallback,
    }
}

/// Truthiness of a config value; absent is `false`.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a table",
    }
}

/// Returns a fully commented stock config with every key and its default.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r#"# card-bleeder directory config
# ============================
#
# Save as `config.ini` in any directory of the card tree. Every key is
# optional; numeric keys left out are taken from the parent directory.

# Bleed added to every side of a card, in millimetres.
bleed = 3

# Trim size of the card, in millimetres. The source images are expected to
# be exactly this size at some whole number of pixels per millimetre.
width = 63
height = 89

# How many front/back page pairs to print for each front image.
quantity = 3

# Start a separate PDF at this directory instead of adding its cards to the
# parent's PDF. Not inherited by child directories that have their own config.
output = false

# Skip this directory and everything below it.
ignore = false

# Use this image as the back for this directory and below, instead of a
# `back.png` / `*_back.png` found in the directory. Used exactly as written:
# a relative path is opened from the directory card-bleeder runs in.
# backfile = "art/shared_back.png"
"#
}

/// Resolve the worker thread count.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(requested: Option<usize>) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    requested.map(|n| n.clamp(1, cores)).unwrap_or(cores)
}
