use crate::error::{ProcessingError, Result};
use crate::models::{ObservationFrame, TimeRange};
use crate::processors::{
    PrecipDisaggregator, ProcessingReport, SeriesBuilder, StationStatistics, VariableProjector,
};
use crate::readers::StationLookup;
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of running one station through the pipeline
enum StationResult {
    Processed(StationStatistics, ObservationFrame),
    Skipped(StationStatistics),
}

/// Runs the per-station pipeline (assemble, disaggregate, project) across a
/// rayon pool and joins the results in request order
pub struct ParallelProcessor {
    max_workers: usize,
    data_dir: PathBuf,
    use_mmap: bool,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            max_workers,
            data_dir: data_dir.into(),
            use_mmap: false,
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Process stations in parallel. Unknown and empty stations are reported
    /// and skipped; a decode failure in any station aborts the run.
    pub fn process_stations<S>(
        &self,
        lookup: &dyn StationLookup,
        stations: &[S],
        projector: &VariableProjector,
        range: &TimeRange,
        progress: Option<&ProgressReporter>,
    ) -> Result<(ObservationFrame, ProcessingReport)>
    where
        S: AsRef<str> + Sync,
    {
        let total_stations = stations.len();
        let processed_count = Arc::new(AtomicUsize::new(0));

        if let Some(p) = progress {
            p.set_message(&format!("Processing {} stations...", total_stations));
        }

        // Configure Rayon thread pool
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let builder = SeriesBuilder::new(&self.data_dir).with_mmap(self.use_mmap);

        // Indexed collect keeps request order
        let results: Result<Vec<StationResult>> = pool.install(|| {
            stations
                .par_iter()
                .map(|station| {
                    let result = self.process_single_station(
                        &builder,
                        lookup,
                        station.as_ref(),
                        projector,
                        range,
                    );

                    let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(p) = progress {
                        p.update(count as u64);
                    }

                    result
                })
                .collect()
        });

        let mut frame = ObservationFrame::default();
        let mut report = ProcessingReport::new();

        for result in results? {
            match result {
                StationResult::Processed(statistics, station_frame) => {
                    frame.append(station_frame)?;
                    report.record(statistics);
                }
                StationResult::Skipped(statistics) => report.record(statistics),
            }
        }

        if let Some(p) = progress {
            p.finish_with_message(&format!("Processed {} stations", total_stations));
        }

        info!(
            stations = total_stations,
            rows = frame.len(),
            "Finished processing"
        );
        Ok((frame, report))
    }

    fn process_single_station(
        &self,
        builder: &SeriesBuilder,
        lookup: &dyn StationLookup,
        station_code: &str,
        projector: &VariableProjector,
        range: &TimeRange,
    ) -> Result<StationResult> {
        let Some(ids) = lookup.lookup(station_code) else {
            warn!(station = station_code, "Station not found in station history");
            return Ok(StationResult::Skipped(StationStatistics::not_found(
                station_code,
            )));
        };

        let series = builder.build(station_code, &ids, range)?;
        if series.is_empty() {
            warn!(
                station = station_code,
                ids = %ids,
                range = %range,
                "No observations in requested range"
            );
            return Ok(StationResult::Skipped(StationStatistics::empty(
                station_code,
                ids,
            )));
        }

        let disaggregated = PrecipDisaggregator::new().disaggregate_owned(series);
        let statistics = StationStatistics::processed(ids, &disaggregated);
        let frame = projector.project_series(&disaggregated);

        info!(station = station_code, rows = frame.len(), "Processed station");
        Ok(StationResult::Processed(statistics, frame))
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get(), "data")
    }
}
