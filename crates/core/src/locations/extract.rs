//! Location extraction over the text of a single page.
//!
//! Lat/long candidates from the three coordinate families are pooled in
//! family order and then paired positionally: a latitude followed by a
//! longitude yields one coordinate. DLS, NTS and MLV identifiers are
//! self-contained and extracted independently.

use std::collections::VecDeque;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::gis::{NtsTable, dls_to_lat_long};
use crate::page::Page;
use crate::utils::truncate_to_abs_value;

use super::patterns::{
    DLS_RE, LAT_LONG_DD_LABELLED_RE, LAT_LONG_DD_SUFFIX_RE, LAT_LONG_DMS_RE, MLV_RE, NTS_RE,
};
use super::types::{
    DlsLocation, LatLong, LegalSubdivision, Meridian, MlvLocation, MlvUnit, NtsLocation,
    PageLocations, Quadrant,
};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn strip_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, "").into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    fn from_letter(letter: &str) -> Option<Direction> {
        match letter {
            "N" => Some(Direction::North),
            "S" => Some(Direction::South),
            "E" => Some(Direction::East),
            "W" => Some(Direction::West),
            _ => None,
        }
    }

    fn is_latitude(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }

    fn degree_limit(self) -> f64 {
        if self.is_latitude() { 90.0 } else { 180.0 }
    }
}

/// Extract every location notation found on a page.
pub fn find_page_locations(page: &Page, nts_table: &NtsTable) -> PageLocations {
    extract_locations(&page.raw_lines(), &page.cleaned_lines(), nts_table)
}

/// Extract locations from pre-split page text. `raw_lines` and
/// `cleaned_lines` must come from the same page; the notations disagree on
/// which variant they need.
pub fn extract_locations(
    raw_lines: &[&str],
    cleaned_lines: &[&str],
    nts_table: &NtsTable,
) -> PageLocations {
    PageLocations {
        lat_longs: extract_lat_longs(cleaned_lines),
        dls: extract_dls(raw_lines),
        nts: extract_nts(raw_lines, nts_table),
        mlv: extract_mlv(cleaned_lines),
    }
}

/// Pool coordinate candidates from all three families, gate on having both
/// a latitude and a longitude somewhere on the page, then pair front to
/// back. A candidate whose successor is not of the opposite axis is
/// dropped; pairs whose magnitudes cannot be truncated into range are
/// consumed without producing a coordinate.
fn extract_lat_longs(cleaned_lines: &[&str]) -> Vec<LatLong> {
    let mut pool: Vec<(f64, Direction)> = Vec::new();

    // Family 1: bare decimal degrees with a direction suffix, per line. The
    // letter must not run into a lowercase word or a digit ("102.5 North
    // Road" is not a coordinate).
    for line in cleaned_lines {
        for caps in LAT_LONG_DD_SUFFIX_RE.captures_iter(line) {
            let Some(letter) = caps.get(2) else { continue };
            if line[letter.end()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            {
                continue;
            }
            let Ok(degrees) = caps[1].parse::<f64>() else { continue };
            let Some(direction) = Direction::from_letter(letter.as_str()) else { continue };
            pool.push((degrees, direction));
        }
    }

    let joined = cleaned_lines.join(" ");

    // Family 2: labelled decimal degrees, sign carries the hemisphere.
    for caps in LAT_LONG_DD_LABELLED_RE.captures_iter(&joined) {
        let Ok(value) = caps[2].parse::<f64>() else { continue };
        let label = caps[1].to_lowercase();
        let direction = if label == "lat" || label == "latitude" {
            if value > 0.0 { Direction::North } else { Direction::South }
        } else if value > 0.0 {
            Direction::East
        } else {
            Direction::West
        };
        pool.push((value.abs(), direction));
    }

    // Family 3: degrees-minutes-seconds. Degrees are clamped into range
    // before conversion; minutes and seconds pass through as written.
    let stripped = strip_whitespace(&joined);
    for caps in LAT_LONG_DMS_RE.captures_iter(&stripped) {
        let (Ok(degrees), Ok(minutes), Ok(seconds)) = (
            caps[1].parse::<f64>(),
            caps[2].parse::<f64>(),
            caps[3].parse::<f64>(),
        ) else {
            continue;
        };
        let Some(direction) = Direction::from_letter(&caps[4]) else { continue };
        let Some(degrees) = truncate_to_abs_value(degrees, direction.degree_limit()) else {
            continue;
        };
        pool.push((degrees + minutes / 60.0 + seconds / 3600.0, direction));
    }

    if !pool.iter().any(|&(_, d)| d.is_latitude())
        || !pool.iter().any(|&(_, d)| !d.is_latitude())
    {
        return Vec::new();
    }

    let mut unmatched: VecDeque<(f64, Direction)> = pool.into();
    let mut lat_longs = Vec::new();
    while unmatched.len() >= 2 {
        let Some((value, direction)) = unmatched.pop_front() else { break };
        if !direction.is_latitude() {
            continue;
        }
        let Some(&(pair_value, pair_direction)) = unmatched.front() else { break };
        if pair_direction.is_latitude() {
            continue;
        }
        unmatched.pop_front();
        let north = if direction == Direction::North { value } else { -value };
        let west = if pair_direction == Direction::West { pair_value } else { -pair_value };
        if let (Some(north), Some(west)) =
            (truncate_to_abs_value(north, 90.0), truncate_to_abs_value(west, 180.0))
        {
            lat_longs.push(LatLong::new(north, west));
        }
    }
    lat_longs
}

fn extract_dls(raw_lines: &[&str]) -> Vec<DlsLocation> {
    let haystack = strip_whitespace(&raw_lines.join(" "));
    let mut locations = Vec::new();
    for caps in DLS_RE.captures_iter(&haystack) {
        // The two delimiters inside the section-township-range core must be
        // the same character.
        if caps.name("d1").map(|m| m.as_str()) != caps.name("d2").map(|m| m.as_str()) {
            continue;
        }
        let legal_subdivision = match (caps.name("lsdn"), caps.name("lsdq")) {
            (Some(number), _) => number
                .as_str()
                .parse::<f64>()
                .ok()
                .and_then(|v| truncate_to_abs_value(v, 16.0))
                .map(|v| LegalSubdivision::Number(v as u8)),
            (None, Some(quadrant)) => {
                Quadrant::from_code(quadrant.as_str()).map(LegalSubdivision::Quadrant)
            }
            (None, None) => None,
        };
        let (Ok(section), Ok(township), Ok(range)) = (
            caps["section"].parse::<u32>(),
            caps["township"].parse::<u32>(),
            caps["range"].parse::<u32>(),
        ) else {
            continue;
        };
        let meridian = match &caps["meridian"] {
            "P" => Meridian::Prime,
            digit => match digit.parse::<u8>() {
                Ok(n) => Meridian::Number(n),
                Err(_) => continue,
            },
        };
        let text = match legal_subdivision {
            Some(lsd) => format!("{lsd}-{section}-{township}-{range}-W{meridian}M"),
            None => format!("{section}-{township}-{range}-W{meridian}M"),
        };
        let lat_long = dls_to_lat_long(legal_subdivision, section, township, range, meridian);
        locations.push(DlsLocation {
            legal_subdivision,
            section,
            township,
            range,
            meridian,
            text,
            lat_long,
        });
    }
    locations
}

fn extract_nts(raw_lines: &[&str], nts_table: &NtsTable) -> Vec<NtsLocation> {
    let mut locations = Vec::new();
    for line in raw_lines {
        let haystack = strip_whitespace(line);
        for caps in NTS_RE.captures_iter(&haystack) {
            let delim = |name: &str| caps.name(name).map(|m| m.as_str());
            if delim("d1") != delim("d2")
                || delim("d2") != delim("d3")
                || delim("d3") != delim("d4")
            {
                continue;
            }
            let (Some(quarter), Some(block), Some(area)) = (
                caps["q"].chars().next(),
                caps["block"].chars().next(),
                caps["area"].chars().next(),
            ) else {
                continue;
            };
            let quarter_unit = quarter.to_ascii_lowercase();
            let block = block.to_ascii_uppercase();
            let map_area = area.to_ascii_uppercase();
            let (Ok(unit), Ok(series_number), Ok(map_sheet)) = (
                caps["unit"].parse::<u32>(),
                caps["series"].parse::<u32>(),
                caps["sheet"].parse::<u32>(),
            ) else {
                continue;
            };
            let text =
                format!("{quarter_unit}-{unit}-{block}/{series_number}-{map_area}-{map_sheet}");
            // An identifier naming an unknown map sheet is logged and
            // dropped by the table lookup.
            if let Some(lat_long) = nts_table.nts_to_lat_long(
                quarter_unit,
                unit,
                block,
                series_number,
                map_area,
                map_sheet,
            ) {
                locations.push(NtsLocation {
                    quarter_unit,
                    unit,
                    block,
                    series_number,
                    map_area,
                    map_sheet,
                    text,
                    lat_long,
                });
            }
        }
    }
    locations
}

fn extract_mlv(cleaned_lines: &[&str]) -> Vec<MlvLocation> {
    let haystack = strip_whitespace(&cleaned_lines.join(" "));
    let mut locations = Vec::new();
    for caps in MLV_RE.captures_iter(&haystack) {
        let valve_text = &caps[1];
        let Ok(valve) = valve_text.parse::<u64>() else { continue };
        let offset_match = caps.get(2);
        let unit_match = caps.get(3);
        // The display text keeps the digits as written, leading zeros and
        // all.
        let text = match offset_match {
            Some(offset) => format!(
                "MLV {} + {}{}",
                valve_text,
                offset.as_str(),
                unit_match.map_or("", |m| m.as_str())
            ),
            None => format!("MLV {valve_text}"),
        };
        let offset = offset_match.and_then(|m| m.as_str().parse::<f64>().ok());
        let offset_unit = unit_match.map(|m| match m.as_str() {
            "km" => MlvUnit::Kilometres,
            _ => MlvUnit::Metres,
        });
        locations.push(MlvLocation {
            valve,
            offset,
            offset_unit,
            text,
        });
    }
    locations
}
