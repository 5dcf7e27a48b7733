use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// A fixed-width line that does not match the ISD-Lite column layout.
    #[error("Decode error in {} at line {line}: {message}", .file.display())]
    Decode {
        file: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Station {code} not found in station history")]
    StationNotFound { code: String },

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ProcessingError {
    pub fn decode(file: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        ProcessingError::Decode {
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}
