//! Compiled pattern grammars for the location notations.
//!
//! Each pattern documents which text variant it scans (raw vs cleaned, see
//! [`crate::utils::clean_text`]) and how lines are prepared (kept separate,
//! joined with spaces, or whitespace-stripped). OCR splits identifiers
//! across lines unpredictably, so the preparation choice per family is part
//! of the grammar.
//!
//! The reference patterns for DLS and NTS used backreferences to force one
//! consistent delimiter character through an identifier, and lookaheads to
//! reject direction letters embedded in words. This engine supports neither,
//! so the delimiters are captured as separate groups and compared after the
//! match, and trailing context is checked against the haystack by the
//! extractor.

use once_cell::sync::Lazy;
use regex::Regex;

/// Decimal-degree coordinates with an N/W/S/E suffix, e.g. `50.1 N;` or
/// `102.3002W`. Scans cleaned text line by line, spaces intact (spaces help
/// reject dotted section numbers like `5.1.2  Waterbody`). The extractor
/// checks that the direction letter is not followed by a lowercase letter or
/// digit.
pub(crate) static LAT_LONG_DD_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3}(?:\.\d+))\s*([NWSE])").unwrap());

/// Labelled decimal-degree coordinates, e.g. `Lat: 49.738174` or
/// `Long: -94.663485`. Scans cleaned text with lines joined by spaces
/// (these labels often span a line break).
pub(crate) static LAT_LONG_DD_LABELLED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(lat|long|latitude|longitude)[:\s]+(-?\d{1,3}(?:\.\d+))").unwrap());

/// Degrees-minutes-seconds coordinates, e.g. `53°55'59.772"N` or
/// `43°47’57”N` (curly prime/double-prime variants accepted). Scans cleaned
/// text, whitespace stripped and lines joined; the pattern is restrictive
/// enough that joining does not produce false matches.
pub(crate) static LAT_LONG_DMS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\d{1,3}(?:\.\d+)?)°(\d+(?:\.\d+)?)['’](\d+(?:\.\d+)?)['"’”]+([NWSE])"#).unwrap()
});

/// Dominion Land Survey identifiers, e.g. `4-23-95-13W6M`, `NE17-9-28WPM`,
/// `4-23-95-13,W.6M`. Scans raw text (delimiters frequently come through as
/// exotic characters that cleaning would erase), whitespace stripped and
/// lines joined. The optional legal-subdivision prefix is either a number
/// 1-16 followed by a delimiter or a two-letter quadrant code. `d1` and `d2`
/// must capture the same delimiter character for a match to count.
pub(crate) static DLS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:(?P<lsdn>1[1-6]|0?[1-9])[^a-zA-Z0-9]|(?P<lsdq>NW|NE|SW|SE)[^a-zA-Z0-9]?|[^a-zA-Z0-9]?)(?P<section>\d{1,3})(?P<d1>[^a-zA-Z0-9])(?P<township>\d{1,3})(?P<d2>[^a-zA-Z0-9])(?P<range>\d{1,3})\s*[^a-zA-Z0-9]?W[^a-zA-Z0-9]?(?P<meridian>[0-9P])M?",
    )
    .unwrap()
});

/// National Topographic System identifiers, e.g. `a-1-A/94-H-8` or
/// `d‐83‐C/94‐P‐8`. Scans raw text per original line, whitespace stripped
/// (these rarely span lines). All four numbered delimiter groups must
/// capture the same character.
pub(crate) static NTS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<q>[a-dA-D])(?P<d1>[^a-zA-Z0-9])(?P<unit>\d{1,3})(?P<d2>[^a-zA-Z0-9])(?P<block>[a-lA-L])[^a-zA-Z0-9](?P<series>\d{1,3})(?P<d3>[^a-zA-Z0-9])(?P<area>[a-pA-P])(?P<d4>[^a-zA-Z0-9])(?P<sheet>1[1-6]|0?[1-9])",
    )
    .unwrap()
});

/// Mainline Valve markers, e.g. `MLV47+11.40`, `MLV1216+10.3km`, `MLV1217`.
/// Scans cleaned text, whitespace stripped and lines joined.
pub(crate) static MLV_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"MLV\)?(\d+)(?:\+(\d+(?:\.\d+)?)(km|m)?)?").unwrap());
