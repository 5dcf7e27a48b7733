use crate::models::{StationIds, TimeRange};
use crate::readers::StationLookup;
use crate::utils::constants::{ARCHIVE_EXTENSION, DECODED_EXTENSION};
use std::path::Path;
use tracing::warn;

/// File name prefix shared by every yearly file of a station: `{USAF}-{WBAN}-`
pub fn station_file_prefix(ids: &StationIds) -> String {
    format!("{}-{}-", ids.usaf, ids.wban)
}

/// Name of a yearly archive as published by NOAA: `{USAF}-{WBAN}-{YEAR}.gz`
pub fn archive_file_name(ids: &StationIds, year: i32) -> String {
    format!("{}{}.{}", station_file_prefix(ids), year, ARCHIVE_EXTENSION)
}

/// Name of a decompressed yearly file: `{USAF}-{WBAN}-{YEAR}.isd`
pub fn decoded_file_name(ids: &StationIds, year: i32) -> String {
    format!("{}{}.{}", station_file_prefix(ids), year, DECODED_EXTENSION)
}

/// Archive names to fetch for each station over the range's years.
///
/// Stations are resolved through `lookup`; unknown call signs are skipped.
pub fn source_file_names<S: AsRef<str>>(
    lookup: &dyn StationLookup,
    stations: &[S],
    range: &TimeRange,
) -> Vec<String> {
    let mut names = Vec::new();
    for station in stations {
        match lookup.lookup(station.as_ref()) {
            Some(ids) => names.extend(range.years().map(|year| archive_file_name(&ids, year))),
            None => warn!(station = station.as_ref(), "Station not found in station history"),
        }
    }
    names
}

/// True for a decoded file belonging to the given station
pub fn is_station_file(path: &Path, ids: &StationIds) -> bool {
    let prefix = station_file_prefix(ids);
    let extension_matches = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e == DECODED_EXTENSION);

    extension_matches
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.starts_with(&prefix))
}

/// Year component of a `{USAF}-{WBAN}-{YEAR}.{ext}` file name
pub fn file_year(path: &Path) -> Option<i32> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.rsplit('-').next())
        .and_then(|y| y.parse().ok())
}
