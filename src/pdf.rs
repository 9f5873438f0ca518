//! Merged document output.
//!
//! [`DocumentWriter`] is the seam between assembly and the file format;
//! [`PdfWriter`] is the production implementation on top of `lopdf`.
//!
//! ## Layout
//!
//! Every page has the document's page size (card size plus bleed on each
//! side, of the node that opened the document) and shows one image drawn at
//! its own node's physical size, anchored at the top-left corner:
//!
//! ```text
//! MediaBox [0 0 W H]             1 mm = 72 / 25.4 pt
//! q  w 0 0 h  0 (H - h)  cm  /Im0 Do  Q
//! ```
//!
//! Each distinct image is stored once per document and referenced from every
//! page that shows it, so a back repeated on every other page costs one copy.
//! JPEGs are embedded as-is (`DCTDecode`); anything else is decoded to RGB
//! and Flate-compressed when the document is saved.

use crate::types::DocumentPlan;
use image::ImageDecoder;
use image::codecs::jpeg::JpegDecoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

const PT_PER_MM: f32 = 72.0 / 25.4;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to embed {path}: {message}")]
    Image { path: PathBuf, message: String },
    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Serializes a planned document to `plan.output`, overwriting it.
pub trait DocumentWriter {
    fn write(&self, plan: &DocumentPlan) -> Result<(), DocumentError>;
}

/// PDF writer built on `lopdf`.
#[derive(Debug, Default)]
pub struct PdfWriter;

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentWriter for PdfWriter {
    fn write(&self, plan: &DocumentPlan) -> Result<(), DocumentError> {
        let mut doc = build_document(plan)?;
        doc.compress();
        doc.save(&plan.output).map_err(|e| DocumentError::Write {
            path: plan.output.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

pub fn mm_to_pt(mm: u32) -> f32 {
    mm as f32 * PT_PER_MM
}

/// Build the in-memory PDF for a plan.
pub fn build_document(plan: &DocumentPlan) -> Result<Document, DocumentError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_width = mm_to_pt(plan.page_size.width);
    let page_height = mm_to_pt(plan.page_size.height);

    let mut embedded: HashMap<&Path, ObjectId> = HashMap::new();
    let mut kids: Vec<Object> = Vec::with_capacity(plan.pages.len());

    for page in &plan.pages {
        let image_id = match embedded.get(page.image.as_path()) {
            Some(id) => *id,
            None => {
                let id = doc.add_object(image_xobject(&page.image)?);
                embedded.insert(page.image.as_path(), id);
                id
            }
        };

        let width = mm_to_pt(page.size.width);
        let height = mm_to_pt(page.size.height);
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width.into(),
                        Object::Integer(0),
                        Object::Integer(0),
                        height.into(),
                        Object::Integer(0),
                        (page_height - height).into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content.encode().map_err(|e| DocumentError::Write {
            path: plan.output.clone(),
            message: e.to_string(),
        })?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                page_width.into(),
                page_height.into(),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| ext == "jpg" || ext == "jpeg")
}

fn image_xobject(path: &Path) -> Result<Stream, DocumentError> {
    let embed_error = |message: String| DocumentError::Image {
        path: path.to_path_buf(),
        message,
    };

    if is_jpeg(path) {
        let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (width, height, channels) = {
            let decoder = JpegDecoder::new(Cursor::new(bytes.as_slice()))
                .map_err(|e| embed_error(e.to_string()))?;
            let (width, height) = decoder.dimensions();
            (width, height, decoder.color_type().channel_count())
        };
        let color_space = if channels == 1 { "DeviceGray" } else { "DeviceRGB" };
        let dict = image_dictionary(width, height, color_space);
        let mut stream = Stream::new(dict, bytes).with_compression(false);
        stream.dict.set("Filter", "DCTDecode");
        return Ok(stream);
    }

    let rgb = image::open(path)
        .map_err(|e| embed_error(e.to_string()))?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Stream::new(
        image_dictionary(width, height, "DeviceRGB"),
        rgb.into_raw(),
    ))
}

fn image_dictionary(width: u32, height: u32, color_space: &str) -> Dictionary {
    dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => color_space,
        "BitsPerComponent" => Object::Integer(8),
    }
}
