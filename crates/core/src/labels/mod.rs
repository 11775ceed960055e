//! Caption labels: finding them, growing them to their full extent, and
//! reconstructing document titles.
//!
//! A label is a line (plus its continuation lines) that starts with a
//! caption category word such as `Figure 2.2` or `Table B-1`. The extent
//! logic also serves the title heuristics, which look for address-style
//! lines on the opening pages.

pub mod toc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::page::{Document, Page, TextLine};
use crate::utils::Point;

/// The caption-label pattern. Matches a category word, an optional colon,
/// and an identifier: either digits with internal `.`/`-` separators
/// (`2.2`, `1-1`, `B-1` via the letter-digit form) or a lone letter that
/// must not run into more letters ("table of contents" is not label
/// "table o").
pub(crate) static LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)((plate|figure|photo|image|table|appendix):?(?:\s*((?:\d+(?:[.\-]?\d+)*)|(?:[a-z](?:[.\-]?\d+)+))|\s+([a-z])(?:$|[^a-z])))",
    )
    .unwrap()
});

/// Same pattern anchored to the start of a line; a label line begins with
/// its category word.
pub(crate) static LABEL_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^((plate|figure|photo|image|table|appendix):?(?:\s*((?:\d+(?:[.\-]?\d+)*)|(?:[a-z](?:[.\-]?\d+)+))|\s+([a-z])(?:$|[^a-z])))",
    )
    .unwrap()
});

/// Builds the lookup key for a caption label: the lower-cased category word
/// concatenated with the lower-cased identifier. Returns `None` when `text`
/// contains no caption label.
pub fn label_key(text: &str) -> Option<String> {
    let caps = LABEL_RE.captures(text)?;
    let heading = caps.get(2)?.as_str().to_lowercase();
    let id = caps.get(3).or_else(|| caps.get(4))?.as_str().to_lowercase();
    Some(format!("{heading}{id}"))
}

/// How [`get_line_extent`] decides whether the next line continues the
/// current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Continue while the candidate's bounding-box height equals the
    /// starting line's.
    Height,
    /// Continue while the candidate's font sizes are a subset of the
    /// starting line's.
    FontSize,
    /// No layout check; only the caller's predicate can stop the scan.
    None,
}

/// Accumulates `lines[start]` and the consecutive lines after it that match
/// the starting line under `strategy`. Candidates shorter than four
/// characters always pass the strategy check (sub/superscripts and page
/// furniture should not end a caption). `continue_check` is consulted for
/// every candidate and can stop the scan independently.
///
/// Returns an empty vector when `start` is out of range.
pub fn get_line_extent<F>(
    lines: &[TextLine],
    start: usize,
    strategy: MergeStrategy,
    continue_check: F,
) -> Vec<TextLine>
where
    F: Fn(&TextLine, &TextLine) -> bool,
{
    let Some(first) = lines.get(start) else {
        return Vec::new();
    };
    let mut extent = vec![first.clone()];
    for candidate in &lines[start + 1..] {
        if candidate.text.chars().count() > 3 {
            let matches = match strategy {
                MergeStrategy::Height => candidate.bbox.height == first.bbox.height,
                MergeStrategy::FontSize => candidate
                    .font_sizes
                    .iter()
                    .all(|size| first.font_sizes.contains(size)),
                MergeStrategy::None => true,
            };
            if !matches {
                break;
            }
        }
        if !continue_check(first, candidate) {
            break;
        }
        extent.push(candidate.clone());
    }
    extent
}

/// A caption label: its anchoring position and full (possibly multi-line)
/// text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    /// Center of the label's first line, used for proximity matching.
    pub center: Point,
    /// The line the label starts on.
    pub first_line: TextLine,
    /// The label's complete text, continuation lines joined with spaces.
    pub text: String,
}

impl Label {
    /// Whether this label captions a table-class region (tables and
    /// appendices) rather than a figure-class one.
    pub fn is_table_label(&self) -> bool {
        let lower = self.text.to_lowercase();
        lower.starts_with("table") || lower.starts_with("appendix")
    }
}

/// Collapses an extent into one [`Label`].
pub fn lines_to_label(lines: &[TextLine]) -> Option<Label> {
    let first = lines.first()?;
    let text = lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();
    Some(Label {
        center: first.center(),
        first_line: first.clone(),
        text,
    })
}

/// Finds every caption label on a page. A line starting with the caption
/// pattern opens a label; its extent runs until layout changes or another
/// label line begins.
pub fn extract_labels(page: &Page, strategy: MergeStrategy) -> Vec<Label> {
    let mut labels = Vec::new();
    for (index, line) in page.lines.iter().enumerate() {
        if !LABEL_START_RE.is_match(&line.text) {
            continue;
        }
        let extent = get_line_extent(&page.lines, index, strategy, |_, candidate| {
            !LABEL_START_RE.is_match(&candidate.text)
        });
        if let Some(label) = lines_to_label(&extent) {
            labels.push(label);
        }
    }
    labels
}

const TITLE_PREFIXES: [&str; 4] = ["subject", "title", "project title", "re:"];
const SALUTATION_PREFIXES: [&str; 2] = ["dear", "to:"];

/// Reconstructs the document title.
///
/// Three heuristics, tried in order over the first three pages: an explicit
/// subject/title line (the title is its extent, or the next line's extent
/// when the prefix line itself is short), the line after a salutation, and
/// finally the leading run of the largest-height lines on the first page
/// with any text.
pub fn extract_title(document: &Document) -> Option<String> {
    let opening_pages = document.pages.iter().take(3);

    for page in opening_pages.clone() {
        for (index, line) in page.lines.iter().enumerate() {
            let lower = line.text.to_lowercase();
            if !TITLE_PREFIXES.iter().any(|p| lower.starts_with(p)) {
                continue;
            }
            let extent = if index == page.lines.len() - 1 {
                vec![line.clone()]
            } else if line.text.split(' ').count() >= 4 {
                get_line_extent(&page.lines, index, MergeStrategy::Height, |_, _| true)
            } else {
                let mut extent = vec![line.clone()];
                extent.extend(get_line_extent(
                    &page.lines,
                    index + 1,
                    MergeStrategy::Height,
                    |_, _| true,
                ));
                extent
            };
            return Some(join_title(&extent));
        }
    }

    for page in opening_pages {
        for (index, line) in page.lines.iter().enumerate() {
            let lower = line.text.to_lowercase();
            if SALUTATION_PREFIXES.iter().any(|p| lower.starts_with(p))
                && index + 1 < page.lines.len()
            {
                let extent =
                    get_line_extent(&page.lines, index + 1, MergeStrategy::Height, |_, _| true);
                return Some(join_title(&extent));
            }
        }
    }

    let page = document.pages.iter().find(|p| p.has_text())?;
    let mut heights: Vec<f64> = page.lines.iter().map(|l| l.bbox.height).collect();
    heights.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    heights.dedup();
    let keep = if heights.len() > 2 { 2 } else { 1 };
    let valid = &heights[..keep.min(heights.len())];

    let mut title_lines: Vec<TextLine> = Vec::new();
    for line in &page.lines {
        if valid.contains(&line.bbox.height) {
            title_lines.push(line.clone());
        } else if !title_lines.is_empty() {
            break;
        }
    }
    Some(join_title(&title_lines))
}

fn join_title(lines: &[TextLine]) -> String {
    lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
