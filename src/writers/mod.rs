pub mod csv_writer;
pub mod parquet_writer;

pub use csv_writer::CsvWriter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};

use crate::config::ProcessorConfig;
use crate::error::{ProcessingError, Result};
use crate::models::ObservationFrame;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    /// Format implied by the output file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("csv") => Ok(OutputFormat::Csv),
            Some("parquet") => Ok(OutputFormat::Parquet),
            _ => Err(ProcessingError::InvalidFormat(format!(
                "Unsupported output file '{}', expected .csv or .parquet",
                path.display()
            ))),
        }
    }
}

/// Write a frame in the format chosen by the file extension
pub fn write_frame(frame: &ObservationFrame, path: &Path, config: &ProcessorConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match OutputFormat::from_path(path)? {
        OutputFormat::Csv => CsvWriter::new().write_frame(frame, path),
        OutputFormat::Parquet => ParquetWriter::new()
            .with_compression(&config.compression)?
            .write_frame_batched(frame, path, config.chunk_size),
    }
}
