use crate::config::{warn_unknown_layers, SourceSettings, DEFAULT_SOURCE_FORMAT};
use crate::core::orchestrator::FailurePolicy;
use crate::domain::model::{BoundingBox, DownloadRequest, LayerSet, YearInput};
use crate::utils::error::{HarvestError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub download: DownloadSection,
    #[serde(default)]
    pub source: SourceSettings,
    pub monitoring: Option<MonitoringConfig>,
    pub error_handling: Option<ErrorHandlingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSection {
    pub layers: LayerSet,
    pub years: Vec<YearInput>,
    pub bbox: [f64; 4],
    pub out_path: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub delete_temp: bool,
}

fn default_format() -> String {
    DEFAULT_SOURCE_FORMAT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorHandlingConfig {
    /// "abort" (default) or "continue"
    pub on_layer_failure: Option<String>,
}

impl TomlConfig {
    /// Loads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HarvestError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| HarvestError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        let download = &self.download;
        if download.layers.is_empty() {
            return Err(HarvestError::MissingConfigError {
                field: "download.layers".to_string(),
            });
        }
        for layer in download.layers.iter() {
            validation::validate_non_empty_string("download.layers", layer)?;
        }
        if download.years.is_empty() {
            return Err(HarvestError::MissingConfigError {
                field: "download.years".to_string(),
            });
        }
        validation::validate_bbox("download.bbox", &self.bounding_box())?;
        validation::validate_path("download.out_path", &download.out_path)?;
        self.source.validate()?;

        if let Some(policy) = self
            .error_handling
            .as_ref()
            .and_then(|e| e.on_layer_failure.as_deref())
        {
            if !matches!(policy, "abort" | "continue") {
                return Err(HarvestError::InvalidConfigValueError {
                    field: "error_handling.on_layer_failure".to_string(),
                    value: policy.to_string(),
                    reason: "Valid values: abort, continue".to_string(),
                });
            }
        }

        warn_unknown_layers(download.layers.iter());
        Ok(())
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.download.bbox.into()
    }

    pub fn download_request(&self) -> DownloadRequest {
        let download = &self.download;
        DownloadRequest::new(
            download.layers.clone(),
            self.bounding_box(),
            download.out_path.clone(),
            download.years.clone(),
        )
        .format(download.format.clone())
        .delete_temp(download.delete_temp)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        match self
            .error_handling
            .as_ref()
            .and_then(|e| e.on_layer_failure.as_deref())
        {
            Some("continue") => FailurePolicy::Continue,
            _ => FailurePolicy::Abort,
        }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
