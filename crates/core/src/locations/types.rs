//! Location record types: canonical forms of the four surveying notations
//! recognized in page text.
//!
//! All record types are derived, read-only facts computed once per text
//! match; persistence is the downstream consumer's concern.

use std::fmt;

use serde::Serialize;

/// A latitude-longitude coordinate in decimal degrees.
///
/// `north` is signed degrees North (negative means South), `west` is signed
/// degrees West (negative means East). `text` is the canonical display form
/// `"<N> N, <W> W"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatLong {
    pub north: f64,
    pub west: f64,
    pub text: String,
}

impl LatLong {
    pub fn new(north: f64, west: f64) -> Self {
        let text = format!("{} N, {} W", north, west);
        Self { north, west, text }
    }
}

/// A quadrant (quarter-section) code used as a DLS legal subdivision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quadrant {
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Quadrant {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NE" => Some(Self::NorthEast),
            "NW" => Some(Self::NorthWest),
            "SE" => Some(Self::SouthEast),
            "SW" => Some(Self::SouthWest),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::NorthEast => "NE",
            Self::NorthWest => "NW",
            Self::SouthEast => "SE",
            Self::SouthWest => "SW",
        }
    }

    /// Whether the quadrant lies in the northern half of its section.
    pub fn is_north(&self) -> bool {
        matches!(self, Self::NorthEast | Self::NorthWest)
    }

    /// Whether the quadrant lies in the western half of its section.
    pub fn is_west(&self) -> bool {
        matches!(self, Self::NorthWest | Self::SouthWest)
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// The finest DLS subdivision: either a numbered sixteenth of a section
/// (1-16) or a two-letter quadrant code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LegalSubdivision {
    Number(u8),
    Quadrant(Quadrant),
}

impl fmt::Display for LegalSubdivision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Quadrant(q) => write!(f, "{q}"),
        }
    }
}

/// A DLS meridian: the Prime Meridian or a numbered meridian west of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Meridian {
    Prime,
    Number(u8),
}

impl fmt::Display for Meridian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prime => f.write_str("P"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A Dominion Land Survey location, e.g. `4-23-95-W6M` or `SE-30-42-9-W4M`.
///
/// `text` is the canonical rendering; `lat_long` is the estimated center of
/// the region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DlsLocation {
    pub legal_subdivision: Option<LegalSubdivision>,
    pub section: u32,
    pub township: u32,
    pub range: u32,
    pub meridian: Meridian,
    pub text: String,
    pub lat_long: LatLong,
}

/// A National Topographic System location, e.g. `a-76-K/94-A-12`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NtsLocation {
    pub quarter_unit: char,
    pub unit: u32,
    pub block: char,
    pub series_number: u32,
    pub map_area: char,
    pub map_sheet: u32,
    pub text: String,
    pub lat_long: LatLong,
}

/// Unit of a mainline-valve chainage offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MlvUnit {
    Kilometres,
    Metres,
}

impl MlvUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kilometres => "km",
            Self::Metres => "m",
        }
    }
}

/// A Mainline Valve location, e.g. `MLV 1216 + 10.3km`.
///
/// No coordinate derivation is attempted; no public data source maps valve
/// numbers to coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MlvLocation {
    pub valve: u64,
    pub offset: Option<f64>,
    pub offset_unit: Option<MlvUnit>,
    pub text: String,
}

/// Any location record found on a page, for callers that want one flat list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Location {
    LatLong(LatLong),
    Dls(DlsLocation),
    Nts(NtsLocation),
    Mlv(MlvLocation),
}

/// All location records extracted from one page, by notation family.
///
/// No cross-family deduplication is performed: a coordinate found by several
/// families appears once per family. Downstream consumers deduplicate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageLocations {
    pub lat_longs: Vec<LatLong>,
    pub dls: Vec<DlsLocation>,
    pub nts: Vec<NtsLocation>,
    pub mlv: Vec<MlvLocation>,
}

impl PageLocations {
    pub fn is_empty(&self) -> bool {
        self.lat_longs.is_empty() && self.dls.is_empty() && self.nts.is_empty() && self.mlv.is_empty()
    }

    /// Flattens the per-family lists into one list of [`Location`] records.
    pub fn into_locations(self) -> Vec<Location> {
        let mut out = Vec::with_capacity(
            self.lat_longs.len() + self.dls.len() + self.nts.len() + self.mlv.len(),
        );
        out.extend(self.lat_longs.into_iter().map(Location::LatLong));
        out.extend(self.dls.into_iter().map(Location::Dls));
        out.extend(self.nts.into_iter().map(Location::Nts));
        out.extend(self.mlv.into_iter().map(Location::Mlv));
        out
    }
}
