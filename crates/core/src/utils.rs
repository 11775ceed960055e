//! Low-level utilities shared by the extraction engines:
//! - Bounding-box geometry (containment, overlap, merging, filtering)
//! - OCR text cleaning
//! - The leading-digit truncation heuristic for implausible values
//!
//! A note about bounding-box conventions: upstream layout collaborators emit
//! boxes in either layout space (origin at the top-left corner, y increasing
//! downward) or page space (origin at the bottom-left corner, y increasing
//! upward). The geometry routines here are convention-agnostic interval
//! checks, but both boxes of any one call must use the same convention;
//! [`crate::page`] normalizes everything it holds to page space.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// A 2D point (x, y).
pub type Point = (f64, f64);

/// An axis-aligned bounding box in (x, y, width, height) form, where (x, y)
/// is the corner nearest the coordinate origin.
///
/// Invariant: width and height are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area of the box.
    pub fn size(&self) -> f64 {
        self.width * self.height
    }

    /// Center point of the box.
    pub fn center(&self) -> Point {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Converts to corner form (x0, y0, x1, y1) where (x0, y0) is the corner
    /// nearest the origin and (x1, y1) the corner farthest from it.
    pub fn coords(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Returns whether a point lies within the box, boundary inclusive.
    pub fn contains_point(&self, point: Point) -> bool {
        point.0 >= self.x
            && point.0 <= self.x + self.width
            && point.1 >= self.y
            && point.1 <= self.y + self.height
    }
}

/// Returns whether `inner` is contained within `outer`, boundary inclusive.
/// Two identical boxes are considered contained within each other.
pub fn contains(outer: &BBox, inner: &BBox) -> bool {
    // impossible when the inner box is wider or taller
    if inner.width > outer.width || inner.height > outer.height {
        return false;
    }

    let (ox0, oy0, ox1, oy1) = outer.coords();
    let (ix0, iy0, ix1, iy1) = inner.coords();

    ix0 >= ox0 && iy0 >= oy0 && ix1 <= ox1 && iy1 <= oy1
}

/// Returns whether two 1-D intervals overlap, boundary inclusive.
fn overlap_1d(a: (f64, f64), b: (f64, f64)) -> bool {
    a.1 >= b.0 && b.1 >= a.0
}

/// Returns whether two boxes overlap, boundary inclusive.
pub fn overlaps(a: &BBox, b: &BBox) -> bool {
    let (ax0, ay0, ax1, ay1) = a.coords();
    let (bx0, by0, bx1, by1) = b.coords();

    overlap_1d((ay0, ay1), (by0, by1)) && overlap_1d((ax0, ax1), (bx0, bx1))
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut i = i;
        while self.parent[i] != root {
            let next = self.parent[i];
            self.parent[i] = root;
            i = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // attach the larger root index under the smaller so component
            // ordering follows the smallest member index
            if ra < rb {
                self.parent[rb] = ra;
            } else {
                self.parent[ra] = rb;
            }
        }
    }
}

/// Merges overlapping boxes.
///
/// Treats each box as a graph node with an edge between every overlapping
/// pair (every box trivially belongs to its own component, so isolated boxes
/// survive), computes connected components, and replaces each component with
/// the minimal box covering all its members. Components are emitted in order
/// of their smallest member index, so the output is deterministic for a given
/// input order.
pub fn merge_overlapping(boxes: &[BBox]) -> Vec<BBox> {
    let mut uf = UnionFind::new(boxes.len());

    for (i, j) in (0..boxes.len()).tuple_combinations() {
        if overlaps(&boxes[i], &boxes[j]) {
            uf.union(i, j);
        }
    }

    let mut merged: Vec<BBox> = Vec::new();
    let mut component_slot: Vec<Option<usize>> = vec![None; boxes.len()];

    for i in 0..boxes.len() {
        let root = uf.find(i);
        let (x0, y0, x1, y1) = boxes[i].coords();
        match component_slot[root] {
            Some(slot) => {
                let (mx0, my0, mx1, my1) = merged[slot].coords();
                let (nx0, ny0) = (mx0.min(x0), my0.min(y0));
                let (nx1, ny1) = (mx1.max(x1), my1.max(y1));
                merged[slot] = BBox::new(nx0, ny0, nx1 - nx0, ny1 - ny0);
            }
            None => {
                component_slot[root] = Some(merged.len());
                merged.push(boxes[i]);
            }
        }
    }

    merged
}

/// Filters out every box that is contained in another, distinct box.
///
/// Only the box's own index is excluded from the comparison, so two separate
/// but identical boxes eliminate each other and neither survives. That
/// matches the observed extraction behaviour; in the detection pipeline
/// duplicates have already been collapsed by `merge_overlapping` before this
/// runs.
pub fn remove_contained(boxes: &[BBox]) -> Vec<BBox> {
    boxes
        .iter()
        .enumerate()
        .filter(|(i, bbox)| {
            boxes
                .iter()
                .enumerate()
                .all(|(n, other)| n == *i || !contains(other, bbox))
        })
        .map(|(_, bbox)| *bbox)
        .collect()
}

/// Truncates a number's digits from the most significant digit until the
/// absolute value no longer exceeds `max_abs`.
///
/// OCR output often runs the tail of one line into the head of the next, so
/// an implausibly large coordinate usually means extra leading digits rather
/// than genuine data. A value that reaches exactly zero is treated as no
/// value at all, so nonsensical matches can be discarded.
///
/// ```
/// use tamarack_core::utils::truncate_to_abs_value;
/// assert_eq!(truncate_to_abs_value(123.0, 5.0), Some(3.0));
/// assert_eq!(truncate_to_abs_value(-11.0, 1.0), Some(-1.0));
/// assert_eq!(truncate_to_abs_value(0.0, 90.0), None);
/// ```
pub fn truncate_to_abs_value(value: f64, max_abs: f64) -> Option<f64> {
    let negative = value < 0.0;
    let mut val = value;

    while val.abs() > max_abs {
        let digits = format!("{}", val.abs());
        let rest = &digits[1..];
        let magnitude = if rest.is_empty() {
            return None;
        } else if rest.starts_with('.') {
            format!("0{rest}").parse::<f64>().ok()?
        } else {
            rest.parse::<f64>().ok()?
        };
        val = if negative { -magnitude } else { magnitude };
    }

    if val == 0.0 { None } else { Some(val) }
}

static EXOTIC_HYPHEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{2010}\u{2013}\u{2014}]").unwrap());
static NON_ASCII_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\x00-\x7F°’”]").unwrap());

/// Replaces all non-ASCII characters with a space (keeping the degree sign
/// and curly quote marks used by coordinate notation), normalizes
/// non-breaking and en/em hyphens to `-`, and trims surrounding whitespace.
pub fn clean_text(text: &str) -> String {
    let text = EXOTIC_HYPHEN_RE.replace_all(text, "-");
    NON_ASCII_RE.replace_all(&text, " ").trim().to_string()
}
