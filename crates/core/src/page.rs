//! The page abstraction handed over by the upstream OCR/layout collaborator.
//!
//! Everything here is read-only input to the extraction engines: ordered text
//! lines with bounding boxes and font metrics, embedded image regions with a
//! table/figure classification, and the page dimensions. Text lines carry
//! both the raw OCR text and a cleaned variant (see [`crate::utils::clean_text`]);
//! the location patterns are explicit about which variant they scan.
//!
//! Line and image bounding boxes use page space: origin at the bottom-left
//! corner of the page, y increasing upward.

use serde::Serialize;

use crate::utils::{BBox, Point, clean_text};

/// A single line of text as emitted by the upstream text layer.
///
/// Immutable once produced. Lines are ordered top-to-bottom within their page
/// as emitted by the collaborator; no re-sorting is performed here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    /// Raw text, exactly as extracted.
    pub raw_text: String,
    /// Cleaned text: non-ASCII replaced by spaces, hyphens normalized.
    pub text: String,
    pub bbox: BBox,
    /// The largest font size used on the line.
    pub max_font_size: f64,
    /// Every font size used on the line.
    pub font_sizes: Vec<f64>,
}

impl TextLine {
    /// Builds a line from raw OCR text; the cleaned variant is derived here.
    pub fn new(raw_text: impl Into<String>, bbox: BBox, font_sizes: Vec<f64>) -> Self {
        let raw_text = raw_text.into();
        let text = clean_text(&raw_text);
        let max_font_size = font_sizes.iter().copied().fold(0.0_f64, f64::max);
        Self {
            raw_text,
            text,
            bbox,
            max_font_size,
            font_sizes,
        }
    }

    pub fn center(&self) -> Point {
        self.bbox.center()
    }
}

/// An image region detected on a page.
///
/// The `is_table` flag comes from the collaborator that performs visual table
/// detection; it is read-only here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageImage {
    pub bbox: BBox,
    pub is_table: bool,
}

impl PageImage {
    pub fn new(bbox: BBox, is_table: bool) -> Self {
        Self { bbox, is_table }
    }

    pub fn center(&self) -> Point {
        self.bbox.center()
    }
}

/// One page of a document: dimensions, ordered text lines, detected images.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    pub lines: Vec<TextLine>,
    pub images: Vec<PageImage>,
}

impl Page {
    pub fn new(width: f64, height: f64, lines: Vec<TextLine>, images: Vec<PageImage>) -> Self {
        Self {
            width,
            height,
            lines,
            images,
        }
    }

    /// The raw text of every line, in page order.
    pub fn raw_lines(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.raw_text.as_str()).collect()
    }

    /// The cleaned text of every line, in page order.
    pub fn cleaned_lines(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    pub fn has_text(&self) -> bool {
        !self.lines.is_empty()
    }
}

/// An ordered collection of pages. Page order is reading order; the
/// association engine's cross-page heuristics depend on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }
}
