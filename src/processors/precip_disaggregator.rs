//! Inference of the accumulation window behind the ISD-Lite six-hour field.
//!
//! A non-missing six-hour value is the total since the previous non-missing
//! value in the same station's row sequence. The window is recovered from the
//! row distance between the two reports:
//!
//! * **Lookback**: while the number of empty rows since the last report is
//!   within [`LOOKBACK_HORIZON`], the counter decides. It excludes the marker
//!   row itself, so a counter of 2, 5 or 11 means a 3, 6 or 12 row window.
//! * **Lookforward**: at the first row, or once the counter has passed the
//!   horizon, the distance to the *next* report decides instead (3, 6 or 12
//!   rows exactly). With no later report the end of the series closes the
//!   window, so a report on the last row is always unclassified.
//!
//! Anything else is an unclassified ("other") accumulation. Only genuine
//! 6-hour values stay in the six-hour field.

use crate::models::{
    AccumulationWindow, DisaggregatedRecord, DisaggregatedSeries, ObservationRecord,
    StationSeries,
};
use crate::utils::constants::LOOKBACK_HORIZON;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Lookback,
    Lookforward,
}

/// Row-by-row window inference state
#[derive(Debug, Default)]
struct WindowState {
    rows_since_marker: usize,
}

impl WindowState {
    fn phase(&self, index: usize) -> Phase {
        if index == 0 || self.rows_since_marker > LOOKBACK_HORIZON {
            Phase::Lookforward
        } else {
            Phase::Lookback
        }
    }

    /// Advance over one row. `boundary` is the index of the next row carrying
    /// an accumulation, or the series length if there is none.
    fn step(
        &mut self,
        index: usize,
        has_marker: bool,
        boundary: usize,
    ) -> Option<AccumulationWindow> {
        if !has_marker {
            self.rows_since_marker += 1;
            return None;
        }

        let window = match self.phase(index) {
            Phase::Lookback => AccumulationWindow::from_row_distance(self.rows_since_marker + 1),
            Phase::Lookforward => AccumulationWindow::from_row_distance(boundary - index),
        };

        self.rows_since_marker = 0;
        Some(window)
    }
}

/// Splits the six-hour field of a station series into 3-hour, 6-hour,
/// 12-hour and unclassified accumulations.
///
/// The pass is strictly sequential within a station; separate stations can be
/// processed concurrently since every call returns a fresh series.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrecipDisaggregator;

impl PrecipDisaggregator {
    pub fn new() -> Self {
        Self
    }

    /// Classify each row given which rows carry an accumulation.
    /// Rows without one map to `None`.
    pub fn classify(&self, markers: &[bool]) -> Vec<Option<AccumulationWindow>> {
        let next_markers = next_marker_indices(markers);
        let mut state = WindowState::default();

        markers
            .iter()
            .zip(next_markers)
            .enumerate()
            .map(|(index, (&has_marker, next))| {
                state.step(index, has_marker, next.unwrap_or(markers.len()))
            })
            .collect()
    }

    pub fn disaggregate(&self, series: &StationSeries) -> DisaggregatedSeries {
        self.disaggregate_owned(series.clone())
    }

    pub fn disaggregate_owned(&self, series: StationSeries) -> DisaggregatedSeries {
        let markers: Vec<bool> = series.records.iter().map(|r| r.has_accumulation()).collect();
        let windows = self.classify(&markers);

        let result = DisaggregatedSeries::new(
            series.station_code,
            build_records(series.records, windows),
        );
        log_summary(&result);
        result
    }

    /// Re-run inference on an already disaggregated series. Every row holding
    /// an accumulation in any column counts as a report, so the result matches
    /// the input.
    pub fn redisaggregate(&self, series: &DisaggregatedSeries) -> DisaggregatedSeries {
        let markers: Vec<bool> = series
            .records
            .iter()
            .map(|r| r.accumulation().is_some())
            .collect();
        let windows = self.classify(&markers);

        let observations = series
            .records
            .iter()
            .map(|r| r.observation.clone().with_six_hour_precip(r.accumulation()))
            .collect();

        DisaggregatedSeries::new(
            series.station_code.clone(),
            build_records(observations, windows),
        )
    }
}

fn build_records(
    observations: Vec<ObservationRecord>,
    windows: Vec<Option<AccumulationWindow>>,
) -> Vec<DisaggregatedRecord> {
    observations
        .into_iter()
        .zip(windows)
        .map(|(observation, window)| DisaggregatedRecord::classified(observation, window))
        .collect()
}

/// For each row, the index of the first later row carrying a marker
fn next_marker_indices(markers: &[bool]) -> Vec<Option<usize>> {
    let mut next = vec![None; markers.len()];
    let mut upcoming = None;

    for index in (0..markers.len()).rev() {
        next[index] = upcoming;
        if markers[index] {
            upcoming = Some(index);
        }
    }

    next
}

fn log_summary(series: &DisaggregatedSeries) {
    debug!(
        station = %series.station_code,
        rows = series.len(),
        three_hour = series.window_count(AccumulationWindow::ThreeHour),
        six_hour = series.window_count(AccumulationWindow::SixHour),
        twelve_hour = series.window_count(AccumulationWindow::TwelveHour),
        other = series.window_count(AccumulationWindow::Other),
        "Disaggregated precipitation"
    );
}
