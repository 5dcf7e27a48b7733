use crate::error::{ProcessingError, Result};
use crate::models::{StationIds, StationMetadata};
use crate::readers::StationReader;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};
use validator::Validate;

/// Resolves a station call sign to the identifier pair naming its source files
pub trait StationLookup: Send + Sync {
    fn lookup(&self, call_sign: &str) -> Option<StationIds>;

    fn require(&self, call_sign: &str) -> Result<StationIds> {
        self.lookup(call_sign)
            .ok_or_else(|| ProcessingError::StationNotFound {
                code: call_sign.to_string(),
            })
    }
}

impl StationLookup for HashMap<String, StationIds> {
    fn lookup(&self, call_sign: &str) -> Option<StationIds> {
        self.get(call_sign).cloned()
    }
}

/// Call-sign index over the isd-history station list
#[derive(Debug, Default)]
pub struct StationRegistry {
    stations: HashMap<String, StationMetadata>,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let stations = StationReader::new().read_stations(path)?;
        Ok(Self::from_stations(stations))
    }

    /// Index stations by call sign. The first entry for a call sign wins;
    /// stations without a call sign or with invalid coordinates are left out.
    pub fn from_stations(stations: Vec<StationMetadata>) -> Self {
        let mut registry = Self::new();
        let mut invalid = 0usize;

        for station in stations {
            if station.call_sign.is_empty() {
                continue;
            }
            if let Err(e) = station.validate() {
                warn!(
                    call_sign = %station.call_sign,
                    ids = %station.ids,
                    "Skipping invalid station entry: {}",
                    e
                );
                invalid += 1;
                continue;
            }
            registry
                .stations
                .entry(station.call_sign.clone())
                .or_insert(station);
        }

        debug!(stations = registry.len(), invalid, "Built station registry");
        registry
    }

    pub fn get(&self, call_sign: &str) -> Option<&StationMetadata> {
        self.stations.get(call_sign)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl StationLookup for StationRegistry {
    fn lookup(&self, call_sign: &str) -> Option<StationIds> {
        self.get(call_sign).map(|s| s.ids.clone())
    }
}
