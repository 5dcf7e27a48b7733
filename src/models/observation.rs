use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::constants::{SIX_HOUR_WINDOW, THREE_HOUR_WINDOW, TWELVE_HOUR_WINDOW};

/// One decoded ISD-Lite hourly observation.
///
/// Scaled fields already hold their physical value (tenths divided out);
/// `None` means the source carried the missing-value sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub timestamp: NaiveDateTime,
    pub air_temperature: Option<f64>,
    pub dew_point_temperature: Option<f64>,
    pub sea_level_pressure: Option<f64>,
    pub wind_direction: Option<i32>,
    pub wind_speed_rate: Option<f64>,
    pub sky_condition_code: Option<i32>,
    pub one_hour_precip: Option<f64>,
    /// Accumulated precipitation whose window (3, 6 or 12 hours) is not encoded
    pub six_hour_precip: Option<f64>,
}

impl ObservationRecord {
    /// A record with every observation field missing
    pub fn empty(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            air_temperature: None,
            dew_point_temperature: None,
            sea_level_pressure: None,
            wind_direction: None,
            wind_speed_rate: None,
            sky_condition_code: None,
            one_hour_precip: None,
            six_hour_precip: None,
        }
    }

    pub fn with_six_hour_precip(mut self, value: Option<f64>) -> Self {
        self.six_hour_precip = value;
        self
    }

    pub fn has_accumulation(&self) -> bool {
        self.six_hour_precip.is_some()
    }
}

/// Accumulation window inferred for a six-hour-field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccumulationWindow {
    ThreeHour,
    SixHour,
    TwelveHour,
    Other,
}

impl AccumulationWindow {
    /// Window matching an exact row distance; smallest window is checked first
    pub fn from_row_distance(distance: usize) -> Self {
        match distance {
            THREE_HOUR_WINDOW => AccumulationWindow::ThreeHour,
            SIX_HOUR_WINDOW => AccumulationWindow::SixHour,
            TWELVE_HOUR_WINDOW => AccumulationWindow::TwelveHour,
            _ => AccumulationWindow::Other,
        }
    }

    pub fn hours(&self) -> Option<u32> {
        match self {
            AccumulationWindow::ThreeHour => Some(3),
            AccumulationWindow::SixHour => Some(6),
            AccumulationWindow::TwelveHour => Some(12),
            AccumulationWindow::Other => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AccumulationWindow::ThreeHour => "3-hour",
            AccumulationWindow::SixHour => "6-hour",
            AccumulationWindow::TwelveHour => "12-hour",
            AccumulationWindow::Other => "other",
        }
    }
}

impl std::fmt::Display for AccumulationWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
