use crate::error::Result;
use crate::models::{StationIds, StationMetadata};
use crate::utils::constants::ISD_HISTORY_WIDTHS;
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Reader for the NOAA `isd-history.txt` station list
#[derive(Debug, Default, Clone, Copy)]
pub struct StationReader;

impl StationReader {
    pub fn new() -> Self {
        Self
    }

    /// Read station metadata from an isd-history file
    pub fn read_stations(&self, path: &Path) -> Result<Vec<StationMetadata>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut stations = Vec::new();
        let mut skipped = 0usize;

        for line_result in reader.lines() {
            let line = line_result?;

            if line.trim().is_empty() {
                continue;
            }

            match self.parse_station_line(&line) {
                Some(station) => stations.push(station),
                None => skipped += 1,
            }
        }

        debug!(
            file = %path.display(),
            stations = stations.len(),
            skipped,
            "Read station history"
        );
        Ok(stations)
    }

    /// Parse a single fixed-width station line.
    ///
    /// Returns `None` for preamble and header lines, recognised by the absence
    /// of a USAF/WBAN identifier pair.
    pub fn parse_station_line(&self, line: &str) -> Option<StationMetadata> {
        let columns = split_columns(line);

        let usaf = columns[0].trim();
        let wban = columns[1].trim();
        if !is_identifier_pair(usaf, wban) {
            return None;
        }

        Some(StationMetadata::new(
            StationIds::new(usaf, wban),
            columns[2].trim().to_string(),
            columns[3].trim().to_string(),
            columns[4].trim().to_string(),
            columns[5].trim().to_string(),
            parse_number(&columns[6]),
            parse_number(&columns[7]),
            parse_number(&columns[8]).filter(|e| *e > -999.0),
            parse_date(&columns[9]),
            parse_date(&columns[10]),
        ))
    }
}

fn split_columns(line: &str) -> Vec<String> {
    let bytes = line.as_bytes();
    let mut start = 0;

    ISD_HISTORY_WIDTHS
        .iter()
        .map(|width| {
            let from = start.min(bytes.len());
            let to = (start + width).min(bytes.len());
            start += width;
            String::from_utf8_lossy(&bytes[from..to]).into_owned()
        })
        .collect()
}

fn is_identifier_pair(usaf: &str, wban: &str) -> bool {
    usaf.len() == 6
        && usaf.chars().all(|c| c.is_ascii_alphanumeric())
        && wban.len() == 5
        && wban.chars().all(|c| c.is_ascii_digit())
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y%m%d").ok()
}
