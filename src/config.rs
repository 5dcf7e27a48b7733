//! Processing configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`isd-lite.toml` unless another path is given), then `ISD_LITE_*`
//! environment variables. Command-line flags override the loaded values.

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_CONFIG_FILE, STATION_HISTORY_FILE, SUPPORTED_COMPRESSIONS,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

pub const ENV_PREFIX: &str = "ISD_LITE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProcessorConfig {
    /// Directory holding decompressed `{USAF}-{WBAN}-{YEAR}.isd` files
    pub data_dir: PathBuf,

    /// Path to isd-history.txt
    pub station_history: PathBuf,

    #[validate(range(min = 1, max = 1024))]
    pub max_workers: usize,

    pub use_mmap: bool,

    /// Parquet compression codec
    pub compression: String,

    /// Rows per Parquet record batch
    #[validate(range(min = 1))]
    pub chunk_size: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            station_history: PathBuf::from("data").join(STATION_HISTORY_FILE),
            max_workers: num_cpus::get(),
            use_mmap: false,
            compression: "snappy".to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ProcessorConfig {
    /// Load defaults, the config file and the environment, in that order.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
            .set_default(
                "station_history",
                defaults.station_history.to_string_lossy().to_string(),
            )?
            .set_default("max_workers", defaults.max_workers as i64)?
            .set_default("use_mmap", defaults.use_mmap)?
            .set_default("compression", defaults.compression.clone())?
            .set_default("chunk_size", defaults.chunk_size as i64)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate_settings()?;
        debug!(?config, "Loaded configuration");
        Ok(config)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_station_history(mut self, path: impl Into<PathBuf>) -> Self {
        self.station_history = path.into();
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Check numeric bounds and the compression codec
    pub fn validate_settings(&self) -> Result<()> {
        self.validate()?;

        if !SUPPORTED_COMPRESSIONS.contains(&self.compression.to_lowercase().as_str()) {
            return Err(ProcessingError::Config(format!(
                "Unsupported compression '{}', expected one of: {}",
                self.compression,
                SUPPORTED_COMPRESSIONS.join(", ")
            )));
        }

        Ok(())
    }
}
