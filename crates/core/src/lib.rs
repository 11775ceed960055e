//! tamarack - report mining for engineering and regulatory documents.
//!
//! Given OCR'd pages (text lines with layout geometry, detected image
//! regions), this crate extracts geographic location references written in
//! four surveying notations and associates figure/table images with their
//! caption labels, cross-checked against a reconstructed table of contents.

pub mod error;
pub mod gis;
pub mod high_level;
pub mod labels;
pub mod locations;
pub mod page;
pub mod tagging;
pub mod utils;

pub use error::{Result, TamarackError};
pub use gis::NtsTable;
pub use high_level::{DocumentAnalysis, analyze_document, extract_document_locations};
pub use labels::toc::document_toc_labels;
pub use locations::{Location, PageLocations, find_page_locations};
pub use page::{Document, Page, PageImage, TextLine};
pub use tagging::{TaggedImage, tag_document, tag_images};
