//! Analysis settings loadable from TOML or YAML.
//!
//! ```toml
//! [ingest]
//! header_policy = "hardened"
//! coercion = "best_effort"
//! placeholder_pattern = "^Unnamed"
//!
//! [forecast]
//! confidence_band = false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::forecast::{ForecastOptions, TrendForecaster};
use crate::ingest::{IngestOptions, Ingestor};

/// Settings for the ingestion and forecasting components
///
/// Missing sections and keys take their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub ingest: IngestOptions,
    pub forecast: ForecastOptions,
}

impl AnalysisConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Loads a config file, picking the format from the extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Err(Error::Config(format!(
                "unsupported config file extension: {}",
                path.display()
            ))),
        }
    }

    /// Builds an ingestor from the ingest section.
    pub fn ingestor(&self) -> Result<Ingestor> {
        Ingestor::new(self.ingest.clone())
    }

    pub fn forecaster(&self) -> TrendForecaster {
        TrendForecaster::new(self.forecast.clone())
    }
}
