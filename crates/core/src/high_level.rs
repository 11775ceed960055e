//! Document-level entry points.
//!
//! These wrap the per-page engines for callers that hand over a whole
//! document: parallel location extraction, the merged TOC index, and a
//! one-call analysis that produces everything the downstream persistence
//! layer stores per document.

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::gis::NtsTable;
use crate::labels::extract_title;
use crate::labels::toc::document_toc_labels;
use crate::locations::{PageLocations, find_page_locations};
use crate::page::Document;
use crate::tagging::{TaggedImage, tag_document};

/// Extracts location records from every page, one result per page in page
/// order. Pages are independent here, so the work is spread across the
/// rayon pool.
pub fn extract_document_locations(
    document: &Document,
    nts_table: &NtsTable,
) -> Vec<PageLocations> {
    document
        .pages
        .par_iter()
        .map(|page| find_page_locations(page, nts_table))
        .collect()
}

/// Everything this crate derives from one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentAnalysis {
    pub title: Option<String>,
    /// TOC caption index, keyed by label key.
    pub toc_labels: FxHashMap<String, String>,
    /// Per-page location records, in page order.
    pub locations: Vec<PageLocations>,
    /// Per-page tagged images, in page order.
    pub tagged_pages: Vec<Vec<TaggedImage>>,
}

/// Runs the full analysis: title, TOC index, locations, image tagging.
/// Location extraction is parallel; tagging walks the pages in reading
/// order because of its cross-page table heuristic.
pub fn analyze_document(document: &Document, nts_table: &NtsTable) -> DocumentAnalysis {
    let toc_labels = document_toc_labels(document);
    DocumentAnalysis {
        title: extract_title(document),
        locations: extract_document_locations(document, nts_table),
        tagged_pages: tag_document(document, &toc_labels),
        toc_labels,
    }
}
