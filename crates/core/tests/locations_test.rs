//! End-to-end tests for the location pattern extractor, driven through the
//! page structure the way production callers use it.

use tamarack_core::gis::NtsTable;
use tamarack_core::locations::{
    LegalSubdivision, Location, Meridian, MlvUnit, Quadrant, extract_locations,
    find_page_locations,
};
use tamarack_core::page::{Page, TextLine};
use tamarack_core::utils::BBox;

fn line(text: &str, y: f64) -> TextLine {
    TextLine::new(text, BBox::new(36.0, y, 400.0, 12.0), vec![12.0])
}

fn page(texts: &[&str]) -> Page {
    let lines = texts
        .iter()
        .enumerate()
        .map(|(i, t)| line(t, 700.0 - 14.0 * i as f64))
        .collect();
    Page::new(612.0, 792.0, lines, Vec::new())
}

fn empty_table() -> NtsTable {
    NtsTable::default()
}

#[test]
fn suffix_pair_yields_one_coordinate() {
    let found = find_page_locations(
        &page(&["The site is at 49.7384N; 101.2399W, near the crossing."]),
        &empty_table(),
    );
    assert_eq!(found.lat_longs.len(), 1);
    assert!((found.lat_longs[0].north - 49.7384).abs() < 1e-9);
    assert!((found.lat_longs[0].west - 101.2399).abs() < 1e-9);
    assert!(found.dls.is_empty());
    assert!(found.mlv.is_empty());
}

#[test]
fn labelled_coordinates_split_across_lines() {
    let found = find_page_locations(
        &page(&["Latitude: 53.9166", "Longitude: -122.7497"]),
        &empty_table(),
    );
    assert_eq!(found.lat_longs.len(), 1);
    assert!((found.lat_longs[0].north - 53.9166).abs() < 1e-9);
    assert!((found.lat_longs[0].west - 122.7497).abs() < 1e-9);
}

#[test]
fn dms_coordinates_with_curly_quotes() {
    let found = find_page_locations(
        &page(&["43°47\u{2019}57\u{201d}N 79°37\u{2019}41\u{201d}W"]),
        &empty_table(),
    );
    assert_eq!(found.lat_longs.len(), 1);
    let expected_north = 43.0 + 47.0 / 60.0 + 57.0 / 3600.0;
    assert!((found.lat_longs[0].north - expected_north).abs() < 1e-9);
}

#[test]
fn latitudes_without_longitudes_are_unreliable() {
    let found = find_page_locations(
        &page(&["49.7384 N", "and later 53.9166 N"]),
        &empty_table(),
    );
    assert!(found.lat_longs.is_empty());
}

#[test]
fn oversized_values_are_truncated_at_pairing() {
    // 149.7384 exceeds 90 degrees of latitude; the leading digit is OCR
    // bleed from the previous line.
    let found = find_page_locations(&page(&["149.7384N 101.2399W"]), &empty_table());
    assert_eq!(found.lat_longs.len(), 1);
    assert!((found.lat_longs[0].north - 49.7384).abs() < 1e-9);
}

#[test]
fn dls_capture_groups_follow_pattern_order() {
    let found = find_page_locations(&page(&["well location 4-23-95-13W6M"]), &empty_table());
    assert_eq!(found.dls.len(), 1);
    let dls = &found.dls[0];
    assert_eq!(dls.legal_subdivision, Some(LegalSubdivision::Number(4)));
    assert_eq!(dls.section, 23);
    assert_eq!(dls.township, 95);
    assert_eq!(dls.range, 13);
    assert_eq!(dls.meridian, Meridian::Number(6));
    assert_eq!(dls.text, "4-23-95-13-W6M");
    // Township 95 is far north of the 49th parallel.
    assert!(dls.lat_long.north > 53.0);
}

#[test]
fn dls_exotic_hyphens_survive_in_raw_text() {
    // Raw text keeps the U+2010 hyphens; the DLS family scans raw text for
    // exactly this reason.
    let found = find_page_locations(&page(&["23\u{2010}14\u{2010}30W1M"]), &empty_table());
    assert_eq!(found.dls.len(), 1);
    assert_eq!(found.dls[0].section, 23);
    assert_eq!(found.dls[0].township, 14);
    assert_eq!(found.dls[0].range, 30);
    assert_eq!(found.dls[0].meridian, Meridian::Number(1));
}

#[test]
fn dls_quadrant_prefix() {
    let found = find_page_locations(&page(&["NE17-9-28WPM"]), &empty_table());
    assert_eq!(found.dls.len(), 1);
    assert_eq!(
        found.dls[0].legal_subdivision,
        Some(LegalSubdivision::Quadrant(Quadrant::NorthEast))
    );
    assert_eq!(found.dls[0].meridian, Meridian::Prime);
}

#[test]
fn dls_trailing_meridian_punctuation() {
    let found = find_page_locations(&page(&["4-23-95-13,W.6M"]), &empty_table());
    assert_eq!(found.dls.len(), 1);
    assert_eq!(found.dls[0].range, 13);
    assert_eq!(found.dls[0].meridian, Meridian::Number(6));
}

#[test]
fn nts_resolves_through_the_table() {
    let table = NtsTable::from_entries([("094H08".to_string(), [57.25, 121.0, 57.5, 121.5])]);
    let found = find_page_locations(&page(&["site a-1-A/94-H-8 upstream"]), &table);
    assert_eq!(found.nts.len(), 1);
    let nts = &found.nts[0];
    assert_eq!(nts.quarter_unit, 'a');
    assert_eq!(nts.unit, 1);
    assert_eq!(nts.block, 'A');
    assert_eq!(nts.series_number, 94);
    assert_eq!(nts.map_area, 'H');
    assert_eq!(nts.map_sheet, 8);
    assert_eq!(nts.text, "a-1-A/94-H-8");
    assert!(nts.lat_long.north > 57.25);
}

#[test]
fn nts_unknown_sheet_is_dropped() {
    let found = find_page_locations(&page(&["site a-1-A/94-H-8"]), &empty_table());
    assert!(found.nts.is_empty());
}

#[test]
fn nts_does_not_join_lines() {
    // The NTS family scans each line on its own; an identifier split by a
    // line break is not recognized.
    let table = NtsTable::from_entries([("094H08".to_string(), [57.25, 121.0, 57.5, 121.5])]);
    let found = find_page_locations(&page(&["site a-1-", "A/94-H-8"]), &table);
    assert!(found.nts.is_empty());
}

#[test]
fn mlv_markers() {
    let found = find_page_locations(
        &page(&["shutoff at MLV 1216 + 10.3km, then MLV 47"]),
        &empty_table(),
    );
    assert_eq!(found.mlv.len(), 2);
    assert_eq!(found.mlv[0].valve, 1216);
    assert_eq!(found.mlv[0].offset, Some(10.3));
    assert_eq!(found.mlv[0].offset_unit, Some(MlvUnit::Kilometres));
    assert_eq!(found.mlv[0].text, "MLV 1216 + 10.3km");
    assert_eq!(found.mlv[1].valve, 47);
    assert_eq!(found.mlv[1].text, "MLV 47");
}

#[test]
fn families_accumulate_independently() {
    let raw = ["Lat: 49.5 Long: -101.25", "4-23-95-13W6M and MLV12+3m"];
    let cleaned = raw; // already ASCII
    let found = extract_locations(&raw, &cleaned, &empty_table());
    assert_eq!(found.lat_longs.len(), 1);
    assert_eq!(found.dls.len(), 1);
    assert_eq!(found.mlv.len(), 1);
    assert!(!found.is_empty());

    let all: Vec<Location> = found.into_locations();
    assert_eq!(all.len(), 3);
    assert!(matches!(all[0], Location::LatLong(_)));
    assert!(matches!(all[1], Location::Dls(_)));
    assert!(matches!(all[2], Location::Mlv(_)));
}

#[test]
fn empty_page_yields_nothing() {
    let found = find_page_locations(&page(&[]), &empty_table());
    assert!(found.is_empty());
}
