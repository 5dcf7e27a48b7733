use crate::models::{AccumulationWindow, DisaggregatedSeries, StationIds};
use serde::{Deserialize, Serialize};

const WINDOWS: [AccumulationWindow; 4] = [
    AccumulationWindow::ThreeHour,
    AccumulationWindow::SixHour,
    AccumulationWindow::TwelveHour,
    AccumulationWindow::Other,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationOutcome {
    Processed,
    /// Call sign absent from the station history
    NotFound,
    /// Resolved, but no observations fell in the requested range
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationStatistics {
    pub station_code: String,
    pub ids: Option<StationIds>,
    pub outcome: StationOutcome,
    pub rows: usize,
    /// Rows per accumulation window: three, six, twelve hour, other
    pub window_counts: [usize; 4],
}

impl StationStatistics {
    pub fn processed(ids: StationIds, series: &DisaggregatedSeries) -> Self {
        let mut window_counts = [0; 4];
        for (count, window) in window_counts.iter_mut().zip(WINDOWS) {
            *count = series.window_count(window);
        }

        Self {
            station_code: series.station_code.clone(),
            ids: Some(ids),
            outcome: StationOutcome::Processed,
            rows: series.len(),
            window_counts,
        }
    }

    pub fn not_found(station_code: &str) -> Self {
        Self {
            station_code: station_code.to_string(),
            ids: None,
            outcome: StationOutcome::NotFound,
            rows: 0,
            window_counts: [0; 4],
        }
    }

    pub fn empty(station_code: &str, ids: StationIds) -> Self {
        Self {
            station_code: station_code.to_string(),
            ids: Some(ids),
            outcome: StationOutcome::Empty,
            rows: 0,
            window_counts: [0; 4],
        }
    }

    pub fn window_count(&self, window: AccumulationWindow) -> usize {
        WINDOWS
            .iter()
            .position(|w| *w == window)
            .map_or(0, |i| self.window_counts[i])
    }
}

/// Per-station outcomes of a processing run, in request order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub stations: Vec<StationStatistics>,
}

impl ProcessingReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, statistics: StationStatistics) {
        self.stations.push(statistics);
    }

    pub fn total_rows(&self) -> usize {
        self.stations.iter().map(|s| s.rows).sum()
    }

    pub fn count(&self, outcome: StationOutcome) -> usize {
        self.stations.iter().filter(|s| s.outcome == outcome).count()
    }

    pub fn stations_with(&self, outcome: StationOutcome) -> Vec<&str> {
        self.stations
            .iter()
            .filter(|s| s.outcome == outcome)
            .map(|s| s.station_code.as_str())
            .collect()
    }

    pub fn window_total(&self, window: AccumulationWindow) -> usize {
        self.stations.iter().map(|s| s.window_count(window)).sum()
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Processing Report ===\n");
        summary.push_str(&format!("Stations Requested: {}\n", self.stations.len()));
        summary.push_str(&format!(
            "Stations Processed: {}\n",
            self.count(StationOutcome::Processed)
        ));
        summary.push_str(&format!("Total Rows: {}\n", self.total_rows()));

        summary.push_str("\nAccumulation Windows:\n");
        for window in WINDOWS {
            summary.push_str(&format!(
                "  {}: {}\n",
                window.display_name(),
                self.window_total(window)
            ));
        }

        let not_found = self.stations_with(StationOutcome::NotFound);
        if !not_found.is_empty() {
            summary.push_str(&format!("\nStations Not Found: {}\n", not_found.join(", ")));
        }

        let empty = self.stations_with(StationOutcome::Empty);
        if !empty.is_empty() {
            summary.push_str(&format!("\nStations Without Data: {}\n", empty.join(", ")));
        }

        summary
    }
}
