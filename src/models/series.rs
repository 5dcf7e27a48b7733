use serde::{Deserialize, Serialize};

use crate::models::frame::{Column, ColumnData, ObservationFrame};
use crate::models::observation::{AccumulationWindow, ObservationRecord};
use crate::models::variable::Variable;

/// Hourly observations for one station in chronological order.
///
/// A missing hour is an absent row, never a placeholder, so row distance and
/// elapsed time can differ.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationSeries {
    pub station_code: String,
    pub records: Vec<ObservationRecord>,
}

impl StationSeries {
    pub fn new(station_code: impl Into<String>, records: Vec<ObservationRecord>) -> Self {
        Self {
            station_code: station_code.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_chronological(&self) -> bool {
        self.records
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    }

    pub fn accumulation_count(&self) -> usize {
        self.records.iter().filter(|r| r.has_accumulation()).count()
    }
}

/// An observation with its six-hour field resolved into a single window.
///
/// At most one of `six_hour_precip` (on the inner observation),
/// `three_hour_precip`, `twelve_hour_precip` and `other_precip` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisaggregatedRecord {
    pub observation: ObservationRecord,
    pub three_hour_precip: Option<f64>,
    pub twelve_hour_precip: Option<f64>,
    pub other_precip: Option<f64>,
}

impl DisaggregatedRecord {
    /// Place an accumulated value according to its window. Anything but a
    /// 6-hour window clears the original field.
    pub fn classified(
        observation: ObservationRecord,
        window: Option<AccumulationWindow>,
    ) -> Self {
        let value = observation.six_hour_precip;
        let mut record = Self {
            observation,
            three_hour_precip: None,
            twelve_hour_precip: None,
            other_precip: None,
        };

        match window {
            None | Some(AccumulationWindow::SixHour) => {}
            Some(AccumulationWindow::ThreeHour) => {
                record.three_hour_precip = value;
                record.observation.six_hour_precip = None;
            }
            Some(AccumulationWindow::TwelveHour) => {
                record.twelve_hour_precip = value;
                record.observation.six_hour_precip = None;
            }
            Some(AccumulationWindow::Other) => {
                record.other_precip = value;
                record.observation.six_hour_precip = None;
            }
        }

        record
    }

    pub fn six_hour_precip(&self) -> Option<f64> {
        self.observation.six_hour_precip
    }

    /// The window this row's accumulation was assigned to, if it carries one
    pub fn window(&self) -> Option<AccumulationWindow> {
        if self.three_hour_precip.is_some() {
            Some(AccumulationWindow::ThreeHour)
        } else if self.observation.six_hour_precip.is_some() {
            Some(AccumulationWindow::SixHour)
        } else if self.twelve_hour_precip.is_some() {
            Some(AccumulationWindow::TwelveHour)
        } else if self.other_precip.is_some() {
            Some(AccumulationWindow::Other)
        } else {
            None
        }
    }

    /// The accumulated value wherever it ended up
    pub fn accumulation(&self) -> Option<f64> {
        self.three_hour_precip
            .or(self.observation.six_hour_precip)
            .or(self.twelve_hour_precip)
            .or(self.other_precip)
    }

    /// Number of accumulation columns holding a value
    pub fn populated_windows(&self) -> usize {
        [
            self.three_hour_precip,
            self.observation.six_hour_precip,
            self.twelve_hour_precip,
            self.other_precip,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }
}

/// A station series after precipitation disaggregation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisaggregatedSeries {
    pub station_code: String,
    pub records: Vec<DisaggregatedRecord>,
}

impl DisaggregatedSeries {
    pub fn new(station_code: impl Into<String>, records: Vec<DisaggregatedRecord>) -> Self {
        Self {
            station_code: station_code.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn window_count(&self, window: AccumulationWindow) -> usize {
        self.records
            .iter()
            .filter(|r| r.window() == Some(window))
            .count()
    }

    /// Columnar view with identity columns and every variable in schema order
    pub fn to_frame(&self) -> ObservationFrame {
        let timestamps = self.records.iter().map(|r| r.observation.timestamp).collect();
        let station_codes = vec![self.station_code.clone(); self.records.len()];

        let columns = Variable::ALL
            .iter()
            .map(|&variable| Column::new(variable, self.column_data(variable)))
            .collect();

        ObservationFrame::from_parts(timestamps, station_codes, columns)
    }

    fn column_data(&self, variable: Variable) -> ColumnData {
        let scaled = |f: fn(&DisaggregatedRecord) -> Option<f64>| {
            ColumnData::Scaled(self.records.iter().map(f).collect())
        };
        let integer = |f: fn(&DisaggregatedRecord) -> Option<i32>| {
            ColumnData::Integer(self.records.iter().map(f).collect())
        };

        match variable {
            Variable::AirTemperature => scaled(|r| r.observation.air_temperature),
            Variable::DewPointTemperature => scaled(|r| r.observation.dew_point_temperature),
            Variable::SeaLevelPressure => scaled(|r| r.observation.sea_level_pressure),
            Variable::WindDirection => integer(|r| r.observation.wind_direction),
            Variable::WindSpeedRate => scaled(|r| r.observation.wind_speed_rate),
            Variable::SkyConditionCode => integer(|r| r.observation.sky_condition_code),
            Variable::OneHourPrecipDepth => scaled(|r| r.observation.one_hour_precip),
            Variable::ThreeHourPrecipDepth => scaled(|r| r.three_hour_precip),
            Variable::SixHourPrecipDepth => scaled(|r| r.observation.six_hour_precip),
            Variable::TwelveHourPrecipDepth => scaled(|r| r.twelve_hour_precip),
            Variable::OtherPrecipDepth => scaled(|r| r.other_precip),
        }
    }
}
