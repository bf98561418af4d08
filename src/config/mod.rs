#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::domain::catalog;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str =
    "https://s3-ap-southeast-2.amazonaws.com/silo-open-data/Official/annual";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;
/// The open-data bucket publishes one whole-continent NetCDF grid per layer
/// and year. It ignores the `bbox` query, so files from it are not cropped.
pub const DEFAULT_SOURCE_FORMAT: &str = "nc";

/// Where and how the HTTP fetch service talks to the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_crs")]
    pub crs: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_crs() -> String {
    catalog::CRS.to_string()
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            crs: default_crs(),
        }
    }
}

impl Validate for SourceSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.base_url", &self.base_url)?;
        validation::validate_positive_number("source.timeout_seconds", self.timeout_seconds, 1)?;
        validation::validate_non_empty_string("source.crs", &self.crs)?;
        Ok(())
    }
}

/// Logs a warning for layer names the catalog doesn't know. The source decides
/// whether they exist.
pub(crate) fn warn_unknown_layers<'a>(layers: impl IntoIterator<Item = &'a str>) {
    for layer in layers {
        if !catalog::is_known_layer(layer) {
            tracing::warn!("⚠️ Layer '{}' is not in the SILO catalog", layer);
        }
    }
}
