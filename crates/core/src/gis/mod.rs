//! Conversion of DLS and NTS survey identifiers into estimated
//! latitude-longitude coordinates.
//!
//! Constants and grid layouts follow the Dominion Land Survey and National
//! Topographic System conventions for the Canadian western provinces. Both
//! conversions assume the location is in the north-west hemisphere and use a
//! flat-earth approximation for small mile offsets; more accurate geodesy is
//! deliberately out of scope.

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::error::{Result, TamarackError};
use crate::locations::{LatLong, LegalSubdivision, Meridian};

/// Mean Earth radius in miles, used by the flat-earth offset approximation.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

const DLS_MERIDIAN_DEGREES: f64 = 4.0;
const DLS_BASELINE: f64 = 49.0;
const DLS_RANGE_WIDTH_MILES: f64 = 6.0;
const DLS_TOWNSHIP_WIDTH_MILES: f64 = 6.0;
const DLS_SECTION_WIDTH_MILES: f64 = 1.0;
const DLS_LSD_WIDTH_MILES: f64 = 0.25;

/// Offsets a coordinate by a distance in miles, North and West positive.
///
/// The latitude is updated first and the longitude term uses the updated
/// latitude; preserve this ordering, it is what the extraction results are
/// calibrated against.
fn offset_miles(
    latitude: f64,
    longitude: f64,
    miles_latitude: f64,
    miles_longitude: f64,
) -> (f64, f64) {
    let latitude = latitude + (miles_latitude / EARTH_RADIUS_MILES).to_degrees();
    let longitude = longitude
        + (miles_longitude / (EARTH_RADIUS_MILES * latitude.to_radians().cos())).to_degrees();

    (latitude, longitude)
}

/// Longitude in degrees West of the given DLS meridian.
pub fn dls_meridian_to_longitude(meridian: Meridian) -> f64 {
    match meridian {
        Meridian::Prime | Meridian::Number(1) => 97.45789,
        Meridian::Number(m) => DLS_MERIDIAN_DEGREES * (f64::from(m) - 1.0) + 98.0,
    }
}

/// Position of a cell in a serpentine (boustrophedon) grid, at the given
/// cell width. Rows alternate direction: the first row increases westward,
/// the next decreases. Returns (west offset, north offset).
fn serpentine_offset(index: i64, row_width: i64, cell_miles: f64) -> (f64, f64) {
    let row = index.div_euclid(row_width);
    let col = index.rem_euclid(row_width);

    let west = if row.rem_euclid(2) == 0 {
        col as f64 * cell_miles
    } else {
        (row_width - col - 1) as f64 * cell_miles
    };

    (west, row as f64 * cell_miles)
}

/// Estimates the latitude-longitude coordinate of the center of a Dominion
/// Land Survey region.
///
/// The range and township give 6-mile offsets West and North of the meridian
/// and the 49°N baseline; sections (1-36) are laid out in a 6-wide serpentine
/// grid of 1-mile cells, and a numeric legal subdivision in a 4-wide
/// serpentine grid of quarter-mile cells. The accumulated offset locates the
/// south-east corner of the region; a final midpoint offset moves to its
/// center.
pub fn dls_to_lat_long(
    legal_subdivision: Option<LegalSubdivision>,
    section: u32,
    township: u32,
    range: u32,
    meridian: Meridian,
) -> LatLong {
    let meridian_longitude = dls_meridian_to_longitude(meridian);

    let mut longitude_offset = DLS_RANGE_WIDTH_MILES * (i64::from(range) - 1) as f64;
    let mut latitude_offset = DLS_TOWNSHIP_WIDTH_MILES * (i64::from(township) - 1) as f64;

    let (section_west, section_north) =
        serpentine_offset(i64::from(section) - 1, 6, DLS_SECTION_WIDTH_MILES);
    longitude_offset += section_west;
    latitude_offset += section_north;

    let midpoint_offset = match legal_subdivision {
        Some(LegalSubdivision::Number(lsd)) => {
            let (lsd_west, lsd_north) =
                serpentine_offset(i64::from(lsd) - 1, 4, DLS_LSD_WIDTH_MILES);
            longitude_offset += lsd_west;
            latitude_offset += lsd_north;
            DLS_LSD_WIDTH_MILES / 2.0
        }
        Some(LegalSubdivision::Quadrant(q)) => {
            if q.is_north() {
                latitude_offset += 2.0 * DLS_LSD_WIDTH_MILES;
            }
            if q.is_west() {
                longitude_offset += 2.0 * DLS_LSD_WIDTH_MILES;
            }
            DLS_LSD_WIDTH_MILES
        }
        None => DLS_SECTION_WIDTH_MILES / 2.0,
    };

    let (lat, long) = offset_miles(
        DLS_BASELINE,
        meridian_longitude,
        latitude_offset + midpoint_offset,
        longitude_offset + midpoint_offset,
    );

    LatLong::new(lat, long)
}

/// The static NTS identifier table: maps `"{series:03}{AREA}{sheet:02}"` keys
/// to the `[lat1, long1, lat2, long2]` bounding box of that map sheet.
///
/// Loaded once per process from a JSON resource and shared read-only; it is
/// injected into whatever needs it rather than living in a global.
#[derive(Debug, Clone, Default)]
pub struct NtsTable {
    entries: FxHashMap<String, [f64; 4]>,
}

impl NtsTable {
    /// Parses the table from its JSON resource, a single object mapping
    /// identifier strings to 4-element arrays.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: FxHashMap<String, Vec<f64>> = serde_json::from_str(json)?;
        let mut entries = FxHashMap::default();
        for (id, bbox) in raw {
            let len = bbox.len();
            let bbox: [f64; 4] = bbox
                .try_into()
                .map_err(|_| TamarackError::NtsTableEntry {
                    id: id.clone(),
                    len,
                })?;
            entries.insert(id, bbox);
        }
        Ok(Self { entries })
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, [f64; 4])>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The canonical table key for a series/area/sheet triple.
    pub fn key(series_number: u32, map_area: char, map_sheet: u32) -> String {
        format!(
            "{:03}{}{:02}",
            series_number,
            map_area.to_ascii_uppercase(),
            map_sheet
        )
    }

    pub fn get(&self, key: &str) -> Option<[f64; 4]> {
        self.entries.get(key).copied()
    }

    /// Estimates the latitude-longitude coordinate of an NTS region, or
    /// `None` when the series/area/sheet identifier is not in the table.
    ///
    /// The sheet's bounding box is subdivided from its south-east corner:
    /// blocks A-L occupy a 4-wide by 3-tall serpentine grid, units 1-100 a
    /// 10x10 serpentine sub-grid of the block cell, and the quarter-unit
    /// letter selects a quadrant of the unit cell (b and c are the east
    /// half, c and d the north half).
    ///
    /// The final midpoint step mixes the longitude width into the latitude
    /// term and vice versa. Stored datasets were produced with this
    /// arithmetic, so it stays as is even though the axes look swapped.
    pub fn nts_to_lat_long(
        &self,
        quarter_unit: char,
        unit: u32,
        block: char,
        series_number: u32,
        map_area: char,
        map_sheet: u32,
    ) -> Option<LatLong> {
        let key = Self::key(series_number, map_area, map_sheet);
        let Some(bbox) = self.get(&key) else {
            warn!(identifier = %key, "unknown NTS identifier");
            return None;
        };

        let bbox_lat_height = (bbox[0] - bbox[2]).abs();
        let bbox_long_width = (bbox[1] - bbox[3]).abs();

        // start at the south-east corner of the sheet
        let mut corner_lat = bbox[0];
        let mut corner_long = bbox[1];

        let block_index = i64::from(block.to_ascii_uppercase() as u8) - i64::from(b'A');
        let block_row = block_index.div_euclid(4);
        let block_col = block_index.rem_euclid(4);
        if block_row.rem_euclid(2) == 0 {
            corner_long += block_col as f64 * bbox_long_width / 4.0;
        } else {
            corner_long += (4 - block_col - 1) as f64 * bbox_long_width / 4.0;
        }
        corner_lat += block_row as f64 * bbox_lat_height / 3.0;

        let unit_index = i64::from(unit) - 1;
        corner_long += unit_index.rem_euclid(10) as f64 * bbox_long_width / (4.0 * 10.0);
        corner_lat += unit_index.div_euclid(10) as f64 * bbox_lat_height / (3.0 * 10.0);

        let quarter = quarter_unit.to_ascii_lowercase();
        if quarter == 'b' || quarter == 'c' {
            corner_long += bbox_long_width / (4.0 * 10.0 * 2.0);
        }
        if quarter == 'c' || quarter == 'd' {
            corner_lat += bbox_lat_height / (3.0 * 10.0 * 2.0);
        }

        let lat = corner_lat + bbox_long_width / (3.0 * 10.0 * 2.0) / 2.0;
        let long = corner_long + bbox_lat_height / (4.0 * 10.0 * 2.0) / 2.0;

        Some(LatLong::new(lat, long))
    }
}
