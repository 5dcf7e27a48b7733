use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The identifier pair that names a station's ISD-Lite source files.
///
/// Kept as text so zero padding (e.g. WBAN `00000`) survives into file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StationIds {
    pub usaf: String,
    pub wban: String,
}

impl StationIds {
    pub fn new(usaf: impl Into<String>, wban: impl Into<String>) -> Self {
        Self {
            usaf: usaf.into(),
            wban: wban.into(),
        }
    }
}

impl std::fmt::Display for StationIds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.usaf, self.wban)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StationMetadata {
    pub ids: StationIds,

    pub name: String,

    pub country: String,

    pub state: String,

    /// ICAO call sign, e.g. KRDU
    #[validate(length(min = 1))]
    pub call_sign: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    pub elevation: Option<f64>,

    pub begin: Option<NaiveDate>,

    pub end: Option<NaiveDate>,
}

impl StationMetadata {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ids: StationIds,
        name: String,
        country: String,
        state: String,
        call_sign: String,
        latitude: Option<f64>,
        longitude: Option<f64>,
        elevation: Option<f64>,
        begin: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        Self {
            ids,
            name,
            country,
            state,
            call_sign,
            latitude,
            longitude,
            elevation,
            begin,
            end,
        }
    }

    /// Whether the station's period of record overlaps `[start, end]`.
    /// Unknown bounds are treated as open.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        let begins_before_end = self.begin.map_or(true, |b| b <= end);
        let ends_after_start = self.end.map_or(true, |e| e >= start);
        begins_before_end && ends_after_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(latitude: Option<f64>) -> StationMetadata {
        StationMetadata::new(
            StationIds::new("723060", "13722"),
            "RALEIGH DURHAM INTERNATIONAL AIRPORT".to_string(),
            "US".to_string(),
            "NC".to_string(),
            "KRDU".to_string(),
            latitude,
            Some(-78.782),
            Some(126.8),
            NaiveDate::from_ymd_opt(1973, 1, 1),
            NaiveDate::from_ymd_opt(2023, 7, 1),
        )
    }

    #[test]
    fn test_station_validation() {
        assert!(station(Some(35.892)).validate().is_ok());
        assert!(station(None).validate().is_ok());
        assert!(station(Some(91.0)).validate().is_err());
    }

    #[test]
    fn test_ids_display() {
        assert_eq!(StationIds::new("723060", "13722").to_string(), "723060-13722");
    }

    #[test]
    fn test_overlaps() {
        let s = station(Some(35.892));
        let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert!(s.overlaps(d(2020, 1, 1), d(2021, 12, 31)));
        assert!(s.overlaps(d(1960, 1, 1), d(1973, 1, 1)));
        assert!(!s.overlaps(d(2024, 1, 1), d(2024, 12, 31)));
    }
}
