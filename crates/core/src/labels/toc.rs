//! Table-of-contents detection and reconstruction.
//!
//! TOC pages are detected by title lines ("TABLE OF CONTENTS", "LIST OF
//! FIGURES", ...) and by the dotted leader rows that connect captions to
//! page numbers. Physical lines are then re-merged into logical rows, and
//! each row's caption is indexed by its label key for cross-referencing
//! during image tagging.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::page::{Document, Page};

use super::{LABEL_RE, label_key};

static DOT_LEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").unwrap());
static TRAILING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+$").unwrap());
/// Strips a dot leader and everything after it (the page number column).
static LEADER_AND_TRAILER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\.{2,})+.*").unwrap());

const LIST_HEADINGS: [&str; 6] = [
    "list of plates",
    "list of figures",
    "list of photos",
    "list of images",
    "list of tables",
    "list of appendices",
];

/// Fraction of a line that must be dot leader for the line alone to mark a
/// TOC page.
const DOT_LEADER_LINE_RATIO: f64 = 0.3;
/// Fraction of a page's lines that must end in a number for the page to
/// count as a likely TOC continuation.
const LIKELY_ROW_RATIO: f64 = 0.3;
const LIKELY_MIN_LINES: usize = 10;

/// Finds the contiguous run of table-of-contents pages in a document.
///
/// The first accepted page must be certain (a TOC title line, or a line
/// that is mostly dot leader); once one is found, following pages are
/// accepted while they are certain or likely (many lines, a large share of
/// them ending in a page number) and contiguous. The first gap ends the
/// scan.
pub fn get_toc_pages(document: &Document) -> Vec<usize> {
    let mut toc_pages = Vec::new();
    let mut title_found = false;

    for (index, page) in document.pages.iter().enumerate() {
        let mut certain = false;
        let mut likely_rows = 0usize;

        for line in &page.lines {
            let text = line.text.trim();
            if text.is_empty() {
                continue;
            }
            let lower = text.to_lowercase();
            if lower.contains("table of contents")
                || LIST_HEADINGS.iter().any(|h| lower.contains(h))
            {
                certain = true;
            }
            let leader_len: usize = DOT_LEADER_RE
                .find_iter(text)
                .map(|m| m.as_str().len())
                .sum();
            if leader_len as f64 / text.chars().count() as f64 > DOT_LEADER_LINE_RATIO {
                certain = true;
                break;
            }
            if TRAILING_NUMBER_RE.is_match(text) {
                likely_rows += 1;
            }
        }

        title_found |= certain;
        let likely = page.lines.len() > LIKELY_MIN_LINES
            && likely_rows as f64 / page.lines.len() as f64 > LIKELY_ROW_RATIO;
        if title_found && (certain || likely) {
            match toc_pages.last() {
                None => toc_pages.push(index),
                Some(&last) if last + 1 == index => toc_pages.push(index),
                Some(_) => break,
            }
        }
    }
    toc_pages
}

/// Re-merges a TOC page's physical lines into logical rows.
///
/// A dotted-leader line closes the pending row (or stands alone); a label
/// line opens a new row, closing any pending one; other lines extend the
/// pending row and are dropped when none is open.
pub fn construct_toc(page: &Page) -> Vec<String> {
    let mut rows: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for line in page.cleaned_lines() {
        let has_label = LABEL_RE.is_match(line);
        if DOT_LEADER_RE.is_match(line) {
            match current.take() {
                Some(pending) => rows.push(format!("{pending} {line}")),
                None => rows.push(line.to_string()),
            }
        } else if let Some(pending) = current.as_mut() {
            if has_label {
                rows.push(std::mem::replace(pending, line.to_string()));
            } else {
                pending.push(' ');
                pending.push_str(line);
            }
        } else if has_label {
            current = Some(line.to_string());
        }
    }
    if let Some(pending) = current {
        rows.push(pending);
    }
    rows
}

/// Indexes a TOC page's rows by label key. The stored caption is the text
/// between the label and the dot leader.
pub fn extract_toc_labels(page: &Page) -> FxHashMap<String, String> {
    let mut toc_labels = FxHashMap::default();
    for row in construct_toc(page) {
        let Some(caps) = LABEL_RE.captures(&row) else {
            continue;
        };
        let Some(key) = label_key(&row) else { continue };
        let after_label = &row[caps.get(0).map_or(0, |m| m.end())..];
        let caption = LEADER_AND_TRAILER_RE
            .replace(after_label, "")
            .trim()
            .to_string();
        toc_labels.insert(key, caption);
    }
    toc_labels
}

/// TOC labels for a whole document: every detected TOC page's rows, merged
/// into one map. Later pages win key collisions, which matches reading
/// order (a "list of tables" page overrides a sparser contents page).
pub fn document_toc_labels(document: &Document) -> FxHashMap<String, String> {
    let mut merged = FxHashMap::default();
    for index in get_toc_pages(document) {
        if let Some(page) = document.pages.get(index) {
            merged.extend(extract_toc_labels(page));
        }
    }
    merged
}
