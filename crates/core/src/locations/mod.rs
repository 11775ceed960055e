//! Recognition of surveying location notations in page text.
//!
//! Four families are recognized: latitude-longitude coordinates (decimal
//! degrees with direction suffixes, labelled decimal degrees, and
//! degrees-minutes-seconds), Dominion Land Survey identifiers, National
//! Topographic System identifiers, and Mainline Valve markers.

mod extract;
mod patterns;
pub mod types;

pub use extract::{extract_locations, find_page_locations};
pub use types::{
    DlsLocation, LatLong, LegalSubdivision, Location, Meridian, MlvLocation, MlvUnit,
    NtsLocation, PageLocations, Quadrant,
};
