use chrono::{Datelike, NaiveDateTime};
use std::fmt;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::RANGE_DATE_FORMAT;

/// Inclusive observation time range, given on the command line as `YYYYMMDD_HH`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(ProcessingError::Config(format!(
                "Time range start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_range_timestamp(start)?, parse_range_timestamp(end)?)
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        *timestamp >= self.start && *timestamp <= self.end
    }

    /// Calendar years touched by the range, in order
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start.year()..=self.end.year()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(RANGE_DATE_FORMAT),
            self.end.format(RANGE_DATE_FORMAT)
        )
    }
}

/// Parse a `YYYYMMDD_HH` timestamp (minutes and seconds are zero)
pub fn parse_range_timestamp(text: &str) -> Result<NaiveDateTime> {
    let padded = format!("{}0000", text.trim());
    Ok(NaiveDateTime::parse_from_str(
        &padded,
        &format!("{}%M%S", RANGE_DATE_FORMAT),
    )?)
}
