use crate::error::Result;
use crate::models::ObservationFrame;
use crate::utils::constants::OUTPUT_TIMESTAMP_FORMAT;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// CSV output for projected frames. Missing values are written as empty cells.
pub struct CsvWriter {
    delimiter: u8,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn write_frame(&self, frame: &ObservationFrame, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(frame, file)?;
        debug!(file = %path.display(), rows = frame.len(), "Wrote CSV file");
        Ok(())
    }

    /// Write header and rows to any writer
    pub fn write_to<W: Write>(&self, frame: &ObservationFrame, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        writer.write_record(frame.column_names())?;

        for row in 0..frame.len() {
            let mut record = Vec::with_capacity(frame.columns.len() + 2);
            record.push(frame.timestamps[row].format(OUTPUT_TIMESTAMP_FORMAT).to_string());
            record.push(frame.station_codes[row].clone());
            for column in &frame.columns {
                record.push(column.data.format_value(row).unwrap_or_default());
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
