//! End-to-end tests: image tagging with TOC cross-references, the
//! cross-page fold, and the whole-document analysis entry point.

use rustc_hash::FxHashMap;
use tamarack_core::gis::NtsTable;
use tamarack_core::labels::MergeStrategy;
use tamarack_core::labels::extract_labels;
use tamarack_core::page::{Document, Page, PageImage, TextLine};
use tamarack_core::tagging::{tag_document, tag_images};
use tamarack_core::utils::BBox;
use tamarack_core::{analyze_document, document_toc_labels};

fn line(text: &str, y: f64, height: f64) -> TextLine {
    TextLine::new(text, BBox::new(36.0, y, 400.0, height), vec![height])
}

fn toc_page() -> Page {
    let texts = [
        "TABLE OF CONTENTS",
        "Figure 1 Crossing overview ........ 3",
        "Table 1 Sampling results ........ 4",
    ];
    Page::new(
        612.0,
        792.0,
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| line(t, 700.0 - 14.0 * i as f64, 12.0))
            .collect(),
        Vec::new(),
    )
}

#[test]
fn tagging_picks_up_toc_captions() {
    let figure_page = Page::new(
        612.0,
        792.0,
        vec![line("Figure 1: Crossing overview", 360.0, 12.0)],
        vec![PageImage::new(BBox::new(50.0, 380.0, 500.0, 300.0), false)],
    );
    let doc = Document::new(vec![toc_page(), figure_page]);

    let toc_labels = document_toc_labels(&doc);
    assert_eq!(
        toc_labels.get("figure1").map(String::as_str),
        Some("Crossing overview")
    );

    let labels = extract_labels(&doc.pages[1], MergeStrategy::Height);
    let tagged = tag_images(&doc.pages[1], &labels, &toc_labels, &[]);
    assert_eq!(tagged.len(), 1);
    assert_eq!(
        tagged[0].label.as_ref().map(|l| l.text.as_str()),
        Some("Figure 1: Crossing overview")
    );
    assert_eq!(tagged[0].toc_caption.as_deref(), Some("Crossing overview"));
}

#[test]
fn tag_document_threads_table_continuations() {
    let first = Page::new(
        612.0,
        792.0,
        vec![line("Table 1: Sampling results", 660.0, 12.0)],
        vec![PageImage::new(BBox::new(40.0, 300.0, 500.0, 340.0), true)],
    );
    // The table continues onto the next page with the same width and no
    // caption of its own.
    let second = Page::new(
        612.0,
        792.0,
        Vec::new(),
        vec![PageImage::new(BBox::new(40.0, 200.0, 502.0, 500.0), true)],
    );
    // A third page with an unrelated narrow table: the chain does not
    // keep propagating.
    let third = Page::new(
        612.0,
        792.0,
        Vec::new(),
        vec![PageImage::new(BBox::new(40.0, 200.0, 200.0, 300.0), true)],
    );
    let doc = Document::new(vec![first, second, third]);

    let tagged = tag_document(&doc, &FxHashMap::default());
    assert_eq!(tagged.len(), 3);
    assert_eq!(
        tagged[0][0].label.as_ref().map(|l| l.text.as_str()),
        Some("Table 1: Sampling results")
    );
    assert_eq!(
        tagged[1][0].label.as_ref().map(|l| l.text.as_str()),
        Some("Table 1: Sampling results")
    );
    assert!(tagged[2][0].label.is_none());
}

#[test]
fn analyze_document_combines_all_engines() {
    let cover = Page::new(
        612.0,
        792.0,
        vec![line("Subject: Wapiti River Crossing Monitoring Report", 720.0, 12.0)],
        Vec::new(),
    );
    let body = Page::new(
        612.0,
        792.0,
        vec![
            line("The site is at 49.7384N; 101.2399W.", 700.0, 10.0),
            line("Figure 1: Crossing overview", 360.0, 10.0),
        ],
        vec![PageImage::new(BBox::new(50.0, 380.0, 500.0, 300.0), false)],
    );
    let doc = Document::new(vec![cover, toc_page(), body]);

    let analysis = analyze_document(&doc, &NtsTable::default());
    assert_eq!(
        analysis.title.as_deref(),
        Some("Subject: Wapiti River Crossing Monitoring Report")
    );
    assert_eq!(
        analysis.toc_labels.get("table1").map(String::as_str),
        Some("Sampling results")
    );
    assert_eq!(analysis.locations.len(), 3);
    assert_eq!(analysis.locations[2].lat_longs.len(), 1);
    assert_eq!(analysis.tagged_pages.len(), 3);
    assert_eq!(
        analysis.tagged_pages[2][0].toc_caption.as_deref(),
        Some("Crossing overview")
    );
}
