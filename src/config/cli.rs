use crate::config::{
    warn_unknown_layers, SourceSettings, DEFAULT_BASE_URL, DEFAULT_SOURCE_FORMAT, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::orchestrator::FailurePolicy;
use crate::domain::catalog;
use crate::domain::model::{BoundingBox, DownloadRequest, LayerSet};
use crate::utils::error::{HarvestError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "silo-harvest")]
#[command(about = "Download SILO gridded climate rasters for a bounding box and a set of years")]
pub struct CliConfig {
    /// Layer names, comma separated (see --list-layers)
    #[arg(long, value_delimiter = ',')]
    pub layer: Vec<String>,

    /// Years to download, comma separated
    #[arg(long, value_delimiter = ',')]
    pub years: Vec<String>,

    /// Bounding box as min_x,min_y,max_x,max_y
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub bbox: Vec<f64>,

    /// Output directory; layer folders are created as <out-path>silo_<layer>
    #[arg(long, default_value = "./output/")]
    pub out_path: String,

    /// Output format; the default source publishes `nc` only
    #[arg(long, default_value = DEFAULT_SOURCE_FORMAT)]
    pub format: String,

    /// Remove temporary download files after each layer
    #[arg(long)]
    pub delete_temp: bool,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    /// Keep going when a layer fails and report the failures at the end
    #[arg(long)]
    pub continue_on_error: bool,

    /// Print the result collection as JSON
    #[arg(long)]
    pub json: bool,

    /// List known layers and exit
    #[arg(long)]
    pub list_layers: bool,

    /// Print the data license and exit
    #[arg(long)]
    pub license: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Log CPU and memory usage per layer")]
    pub monitor: bool,
}

impl CliConfig {
    pub fn source_settings(&self) -> SourceSettings {
        SourceSettings {
            base_url: self.base_url.clone(),
            timeout_seconds: self.timeout_seconds,
            crs: catalog::CRS.to_string(),
        }
    }

    pub fn bounding_box(&self) -> Result<BoundingBox> {
        match self.bbox.as_slice() {
            &[min_x, min_y, max_x, max_y] => Ok(BoundingBox::new(min_x, min_y, max_x, max_y)),
            [] => Err(HarvestError::MissingConfigError {
                field: "bbox".to_string(),
            }),
            other => Err(HarvestError::InvalidConfigValueError {
                field: "bbox".to_string(),
                value: format!("{:?}", other),
                reason: "Expected exactly four values".to_string(),
            }),
        }
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.continue_on_error {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        }
    }

    pub fn download_request(&self) -> Result<DownloadRequest> {
        let layers: LayerSet = self.layer.iter().map(|l| l.trim()).collect();
        Ok(
            DownloadRequest::new(layers, self.bounding_box()?, self.out_path.clone(), self.years.clone())
                .format(self.format.clone())
                .delete_temp(self.delete_temp),
        )
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.list_layers || self.license {
            return Ok(());
        }

        if self.layer.is_empty() {
            return Err(HarvestError::MissingConfigError {
                field: "layer".to_string(),
            });
        }
        for layer in &self.layer {
            validation::validate_non_empty_string("layer", layer)?;
        }
        if self.years.is_empty() {
            return Err(HarvestError::MissingConfigError {
                field: "years".to_string(),
            });
        }
        validation::validate_bbox("bbox", &self.bounding_box()?)?;
        validation::validate_path("out_path", &self.out_path)?;
        self.source_settings().validate()?;

        warn_unknown_layers(self.layer.iter().map(|l| l.trim()));
        Ok(())
    }
}
