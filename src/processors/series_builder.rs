use crate::error::Result;
use crate::models::{ObservationRecord, StationIds, StationSeries, TimeRange};
use crate::readers::IsdLiteReader;
use crate::utils::filename::{file_year, is_station_file};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Builds one station's chronological series from its yearly `.isd` files
pub struct SeriesBuilder {
    data_dir: PathBuf,
    reader: IsdLiteReader,
}

impl SeriesBuilder {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            reader: IsdLiteReader::new(),
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.reader = IsdLiteReader::with_mmap(use_mmap);
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Decoded files for a station, sorted by file name
    pub fn station_files(&self, ids: &StationIds) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if path.is_file() && is_station_file(&path, ids) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Decode, concatenate and order every file of a station, keeping rows
    /// whose timestamp falls inside `range`
    pub fn build(
        &self,
        station_code: &str,
        ids: &StationIds,
        range: &TimeRange,
    ) -> Result<StationSeries> {
        let files = self.station_files(ids)?;
        let mut batches = Vec::with_capacity(files.len());

        for path in &files {
            if let Some(year) = file_year(path) {
                if !range.years().any(|y| y == year) {
                    trace!(file = %path.display(), "Skipping file outside time range");
                    continue;
                }
            }
            batches.push(self.reader.read_file(path)?);
        }

        let series = Self::assemble(station_code, batches, range);
        debug!(
            station = station_code,
            ids = %ids,
            files = files.len(),
            rows = series.len(),
            "Assembled station series"
        );
        Ok(series)
    }

    /// Concatenate decoded batches, stable-sort by timestamp and apply the
    /// inclusive range filter
    pub fn assemble(
        station_code: &str,
        batches: Vec<Vec<ObservationRecord>>,
        range: &TimeRange,
    ) -> StationSeries {
        let mut records: Vec<ObservationRecord> = batches.into_iter().flatten().collect();
        records.sort_by_key(|r| r.timestamp);
        records.retain(|r| range.contains(&r.timestamp));

        StationSeries::new(station_code, records)
    }
}
