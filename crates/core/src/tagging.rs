//! Associates each detected image region with its caption label.
//!
//! The page's labels and images are merged into one vertically-sorted
//! sequence to infer the layout direction (captions consistently before or
//! after their images); each image then takes its layout neighbor when
//! compatible, falls back to the nearest compatible label, and finally to
//! the cross-page and title heuristics. A found label is cross-referenced
//! against the table-of-contents index.

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::labels::{Label, MergeStrategy, extract_labels, get_line_extent, label_key, lines_to_label};
use crate::page::{Document, Page, PageImage};
use crate::utils::Point;

/// Two bounding boxes whose widths differ by less than this are treated as
/// the same table split across a page break.
const TABLE_CONTINUATION_WIDTH_TOLERANCE: f64 = 5.0;
/// An untabled image covering at least this share of the page is assumed to
/// be a full-page plate whose caption is the page's heading text.
const FULL_PAGE_AREA_RATIO: f64 = 0.7;
/// A heading candidate must contribute at least this many alphabetic
/// characters to count as a caption.
const MIN_CAPTION_ALPHA_CHARS: usize = 5;

/// An image region together with whatever caption could be resolved for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedImage {
    pub image: PageImage,
    pub label: Option<Label>,
    /// The table-of-contents caption for the label's key, when the TOC
    /// lists it.
    pub toc_caption: Option<String>,
}

#[derive(Clone, Copy)]
enum Element {
    Label(usize),
    Image(usize),
}

fn distance(a: Point, b: Point) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

fn alpha_chars(text: &str) -> usize {
    text.chars().filter(|c| c.is_ascii_alphabetic()).count()
}

/// Tags every image on a page with its most plausible caption label,
/// preserving image order. `previous_page_tagged` is the previous page's
/// output, used for table continuations across page breaks; pass an empty
/// slice for the first page.
pub fn tag_images(
    page: &Page,
    labels: &[Label],
    toc_labels: &FxHashMap<String, String>,
    previous_page_tagged: &[TaggedImage],
) -> Vec<TaggedImage> {
    // Labels first so that stable sorting keeps a label ahead of an image
    // at the same height.
    let mut elements: Vec<Element> = (0..labels.len()).map(Element::Label).collect();
    elements.extend((0..page.images.len()).map(Element::Image));
    let center_y = |e: &Element| match e {
        Element::Label(i) => labels[*i].center.1,
        Element::Image(i) => page.images[*i].center().1,
    };
    elements.sort_by_key(|e| OrderedFloat(center_y(e)));

    // Alternating caption/image layouts show up as a label at one end of
    // the sequence and an image at the other; the offset then points every
    // image at its caption-side neighbor.
    let offset: isize = match (elements.first(), elements.last()) {
        (Some(Element::Label(_)), Some(Element::Image(_))) if elements.len() > 1 => -1,
        (Some(Element::Image(_)), Some(Element::Label(_))) if elements.len() > 1 => 1,
        _ => 0,
    };

    let mut tagged = Vec::with_capacity(page.images.len());
    for (image_index, image) in page.images.iter().enumerate() {
        let mut label: Option<Label> = None;

        if offset != 0 {
            label = layout_neighbor(&elements, offset, image_index, labels, image);
        }
        if label.is_none() {
            label = nearest_compatible(labels, image);
        }
        if label.is_none() && image.is_table {
            label = continued_table_label(image, previous_page_tagged);
        }
        if label.is_none()
            && !image.is_table
            && image.bbox.size() / (page.width * page.height) >= FULL_PAGE_AREA_RATIO
            && page.has_text()
        {
            label = heading_label(page);
        }

        let toc_caption = label
            .as_ref()
            .and_then(|l| label_key(&l.text))
            .and_then(|key| toc_labels.get(&key).cloned());
        tagged.push(TaggedImage {
            image: image.clone(),
            label,
            toc_caption,
        });
    }
    tagged
}

/// Convenience wrapper that extracts the page's labels itself.
pub fn tag_page(
    page: &Page,
    toc_labels: &FxHashMap<String, String>,
    previous_page_tagged: &[TaggedImage],
) -> Vec<TaggedImage> {
    let labels = extract_labels(page, MergeStrategy::Height);
    tag_images(page, &labels, toc_labels, previous_page_tagged)
}

/// Tags every page of a document in reading order, threading each page's
/// results into the next page's table-continuation check. Pages must not be
/// reordered or parallelized here; the continuation heuristic reads its
/// predecessor.
pub fn tag_document(
    document: &Document,
    toc_labels: &FxHashMap<String, String>,
) -> Vec<Vec<TaggedImage>> {
    let mut tagged_pages: Vec<Vec<TaggedImage>> = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let previous = tagged_pages.last().map_or(&[][..], Vec::as_slice);
        let tagged = tag_page(page, toc_labels, previous);
        tagged_pages.push(tagged);
    }
    tagged_pages
}

/// The element adjacent to `image` in the inferred layout direction, if it
/// is a label of the right category.
fn layout_neighbor(
    elements: &[Element],
    offset: isize,
    image_index: usize,
    labels: &[Label],
    image: &PageImage,
) -> Option<Label> {
    let position = elements
        .iter()
        .position(|e| matches!(e, Element::Image(i) if *i == image_index))?;
    let neighbor = position.checked_add_signed(offset)?;
    match elements.get(neighbor)? {
        Element::Label(i) if labels[*i].is_table_label() == image.is_table => {
            Some(labels[*i].clone())
        }
        _ => None,
    }
}

/// Nearest-neighbor search over the page's labels. For tables, labels whose
/// center lies inside the image are excluded (a table often mentions other
/// tables in its body) unless that exclusion would leave no candidates.
/// Incompatible candidates are discarded nearest-first until one matches.
fn nearest_compatible(labels: &[Label], image: &PageImage) -> Option<Label> {
    let mut candidates: Vec<&Label> = labels.iter().collect();
    if image.is_table {
        let outside: Vec<&Label> = candidates
            .iter()
            .copied()
            .filter(|l| !image.bbox.contains_point(l.center))
            .collect();
        if !outside.is_empty() {
            candidates = outside;
        }
    }
    while !candidates.is_empty() {
        let mut best = 0;
        let mut best_distance = distance(candidates[0].center, image.center());
        for (i, candidate) in candidates.iter().enumerate().skip(1) {
            let d = distance(candidate.center, image.center());
            if d < best_distance {
                best = i;
                best_distance = d;
            }
        }
        if candidates[best].is_table_label() == image.is_table {
            return Some(candidates[best].clone());
        }
        candidates.remove(best);
    }
    None
}

/// A table at the top of a page with the same width as the previous page's
/// last table is its continuation and inherits that table's label, found or
/// not.
fn continued_table_label(image: &PageImage, previous: &[TaggedImage]) -> Option<Label> {
    let last_table = previous.iter().filter(|t| t.image.is_table).last()?;
    if (image.bbox.width - last_table.image.bbox.width).abs() < TABLE_CONTINUATION_WIDTH_TOLERANCE
    {
        last_table.label.clone()
    } else {
        None
    }
}

/// Caption for a full-page plate: the tallest heading in the bottom band of
/// the page (or anywhere, when that band has no text), grown to its extent.
/// Candidates are consumed tallest-first until one yields enough alphabetic
/// text; when none does, the last one tried is kept anyway.
fn heading_label(page: &Page) -> Option<Label> {
    let band = page.height / 5.0;
    let mut remaining: Vec<usize> = (0..page.lines.len())
        .filter(|&i| page.lines[i].bbox.y <= band)
        .collect();
    if remaining.is_empty() {
        remaining = (0..page.lines.len()).collect();
    }

    let mut label: Option<Label> = None;
    while !remaining.is_empty() {
        if let Some(found) = &label {
            if alpha_chars(&found.text) >= MIN_CAPTION_ALPHA_CHARS {
                break;
            }
        }
        let mut best = 0;
        for (i, &line_index) in remaining.iter().enumerate().skip(1) {
            if page.lines[line_index].max_font_size
                > page.lines[remaining[best]].max_font_size
            {
                best = i;
            }
        }
        let line_index = remaining.remove(best);
        let extent = get_line_extent(&page.lines, line_index, MergeStrategy::Height, |_, _| true);
        label = lines_to_label(&extent);
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::TextLine;
    use crate::utils::BBox;

    fn text_line(text: &str, y: f64, font_size: f64) -> TextLine {
        TextLine::new(
            text,
            BBox::new(36.0, y, 300.0, font_size),
            vec![font_size],
        )
    }

    fn page_with(lines: Vec<TextLine>, images: Vec<PageImage>) -> Page {
        Page::new(612.0, 792.0, lines, images)
    }

    fn no_toc() -> FxHashMap<String, String> {
        FxHashMap::default()
    }

    #[test]
    fn single_label_is_assigned_to_single_image() {
        let page = page_with(
            vec![text_line("Table 1: Results", 380.0, 12.0)],
            vec![PageImage::new(BBox::new(50.0, 400.0, 500.0, 300.0), true)],
        );
        let labels = extract_labels(&page, MergeStrategy::Height);
        let tagged = tag_images(&page, &labels, &no_toc(), &[]);
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].label.as_ref().map(|l| l.text.as_str()), Some("Table 1: Results"));
        assert_eq!(tagged[0].toc_caption, None);
    }

    #[test]
    fn toc_caption_is_cross_referenced() {
        let page = page_with(
            vec![text_line("Table 1: Results", 380.0, 12.0)],
            vec![PageImage::new(BBox::new(50.0, 400.0, 500.0, 300.0), true)],
        );
        let labels = extract_labels(&page, MergeStrategy::Height);
        let mut toc = FxHashMap::default();
        toc.insert("table1".to_string(), "Results of the 2019 survey".to_string());
        let tagged = tag_images(&page, &labels, &toc, &[]);
        assert_eq!(
            tagged[0].toc_caption.as_deref(),
            Some("Results of the 2019 survey")
        );
    }

    #[test]
    fn alternating_layout_pairs_each_image_with_its_neighbor() {
        // Two caption-above-figure pairs down the page.
        let page = page_with(
            vec![
                text_line("Figure 1: North approach", 700.0, 12.0),
                text_line("Figure 2: South approach", 340.0, 12.0),
            ],
            vec![
                PageImage::new(BBox::new(50.0, 420.0, 400.0, 260.0), false),
                PageImage::new(BBox::new(50.0, 60.0, 400.0, 260.0), false),
            ],
        );
        let labels = extract_labels(&page, MergeStrategy::Height);
        let tagged = tag_images(&page, &labels, &no_toc(), &[]);
        assert_eq!(
            tagged[0].label.as_ref().map(|l| l.text.as_str()),
            Some("Figure 1: North approach")
        );
        assert_eq!(
            tagged[1].label.as_ref().map(|l| l.text.as_str()),
            Some("Figure 2: South approach")
        );
    }

    #[test]
    fn incompatible_nearest_label_is_skipped() {
        // The table label sits closer to the figure than the figure label
        // does, but category compatibility rules it out.
        let page = page_with(
            vec![
                text_line("Table 2: Flow rates", 420.0, 12.0),
                text_line("Figure 5: Flow chart", 360.0, 12.0),
            ],
            vec![PageImage::new(BBox::new(50.0, 430.0, 400.0, 200.0), false)],
        );
        let labels = extract_labels(&page, MergeStrategy::Height);
        let tagged = tag_images(&page, &labels, &no_toc(), &[]);
        assert_eq!(
            tagged[0].label.as_ref().map(|l| l.text.as_str()),
            Some("Figure 5: Flow chart")
        );
    }

    #[test]
    fn label_inside_table_is_excluded_when_alternatives_exist() {
        // "Table 7" is referenced inside the table body; the real caption
        // sits outside the region.
        let page = page_with(
            vec![
                text_line("Table 7: See appendix", 500.0, 10.0),
                text_line("Table 6: Measured depths", 652.0, 12.0),
            ],
            vec![PageImage::new(BBox::new(30.0, 400.0, 550.0, 240.0), true)],
        );
        let labels = extract_labels(&page, MergeStrategy::Height);
        let tagged = tag_images(&page, &labels, &no_toc(), &[]);
        assert_eq!(
            tagged[0].label.as_ref().map(|l| l.text.as_str()),
            Some("Table 6: Measured depths")
        );
    }

    #[test]
    fn table_continuation_inherits_previous_label() {
        let first = page_with(
            vec![text_line("Table 9: Bore logs", 660.0, 12.0)],
            vec![PageImage::new(BBox::new(40.0, 300.0, 500.0, 340.0), true)],
        );
        let labels = extract_labels(&first, MergeStrategy::Height);
        let first_tagged = tag_images(&first, &labels, &no_toc(), &[]);
        assert!(first_tagged[0].label.is_some());

        // Continuation page: same-width table, no labels at all.
        let second = page_with(
            Vec::new(),
            vec![PageImage::new(BBox::new(40.0, 200.0, 501.0, 500.0), true)],
        );
        let tagged = tag_images(&second, &[], &no_toc(), &first_tagged);
        assert_eq!(
            tagged[0].label.as_ref().map(|l| l.text.as_str()),
            Some("Table 9: Bore logs")
        );
    }

    #[test]
    fn width_mismatch_blocks_table_continuation() {
        let previous = vec![TaggedImage {
            image: PageImage::new(BBox::new(40.0, 300.0, 500.0, 340.0), true),
            label: None,
            toc_caption: None,
        }];
        let page = page_with(
            Vec::new(),
            vec![PageImage::new(BBox::new(40.0, 200.0, 450.0, 500.0), true)],
        );
        let tagged = tag_images(&page, &[], &no_toc(), &previous);
        assert!(tagged[0].label.is_none());
    }

    #[test]
    fn full_page_plate_takes_the_bottom_heading() {
        let page = page_with(
            vec![
                text_line("x", 100.0, 9.0),
                text_line("Wapiti River crossing, looking east", 80.0, 14.0),
            ],
            vec![PageImage::new(BBox::new(0.0, 150.0, 612.0, 642.0), false)],
        );
        let tagged = tag_images(&page, &[], &no_toc(), &[]);
        assert_eq!(
            tagged[0].label.as_ref().map(|l| l.text.as_str()),
            Some("Wapiti River crossing, looking east")
        );
    }

    #[test]
    fn small_figure_without_labels_stays_untagged() {
        let page = page_with(
            vec![text_line("body text only", 400.0, 12.0)],
            vec![PageImage::new(BBox::new(50.0, 500.0, 100.0, 80.0), false)],
        );
        let tagged = tag_images(&page, &[], &no_toc(), &[]);
        assert!(tagged[0].label.is_none());
        assert!(tagged[0].toc_caption.is_none());
    }
}
