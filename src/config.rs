//! Pipeline configuration
//!
//! Every option has a default, so a configuration file only needs the keys it
//! changes:
//!
//! ```toml
//! hours_per_window = 24
//! window_count = 365
//! nan_policy = "ignore"
//! ```

use rtherm_core::aggregate::{NanPolicy, WindowSpec, HOURS_PER_WEEK, WEEKS_PER_YEAR};
use rtherm_core::bilinear::BoundsPolicy;
use rtherm_core::errors::RthermResult;
use rtherm_core::land_cover::{LandCoverCode, URBAN_CODE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for loading and saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Could not serialise configuration: {0}")]
    Serialise(#[from] toml::ser::Error),
}

/// Options of an [`UrbanExtractionPipeline`](crate::pipeline::UrbanExtractionPipeline) run
///
/// Grid shapes are not configured; they come from the input fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of hourly steps reduced into each window
    ///
    /// Default: 168 (one week)
    pub hours_per_window: usize,

    /// Number of windows to produce
    ///
    /// Default: 52
    pub window_count: usize,

    /// Land-cover class treated as urban
    ///
    /// Default: 13
    pub urban_code: LandCoverCode,

    /// Treatment of NaN inside a window
    ///
    /// Default: `propagate`
    pub nan_policy: NanPolicy,

    /// Treatment of sample positions outside the coarse grid
    ///
    /// Default: `strict`
    pub bounds_policy: BoundsPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            hours_per_window: HOURS_PER_WEEK,
            window_count: WEEKS_PER_YEAR,
            urban_code: URBAN_CODE,
            nan_policy: NanPolicy::default(),
            bounds_policy: BoundsPolicy::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// The window partitioning described by this configuration
    pub fn window_spec(&self) -> RthermResult<WindowSpec> {
        WindowSpec::new(self.hours_per_window, self.window_count)
    }
}
