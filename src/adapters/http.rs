use crate::config::SourceSettings;
use crate::domain::catalog;
use crate::domain::model::{BoundingBox, FetchRequest};
use crate::domain::ports::{FetchService, Storage};
use crate::utils::error::{HarvestError, Result};
use crate::utils::validation::validate_format;
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const TEMP_DIR_NAME: &str = "tmp";

/// Builds `{base_url}/{layer}/{year}.{layer}.{format}?bbox=..&crs=..`.
///
/// Sources that crop honour `bbox` and `crs`. The default open-data bucket
/// ignores them and returns the whole grid.
pub fn coverage_url(
    settings: &SourceSettings,
    layer: &str,
    year: i32,
    format: &str,
    bbox: &BoundingBox,
) -> Result<Url> {
    let mut url = Url::parse(&settings.base_url)?;
    url.path_segments_mut()
        .map_err(|_| HarvestError::ConfigValidationError {
            field: "source.base_url".to_string(),
            message: format!("'{}' cannot be used as a base URL", settings.base_url),
        })?
        .pop_if_empty()
        .push(layer)
        .push(&format!("{}.{}.{}", year, layer, format));
    url.query_pairs_mut()
        .append_pair("bbox", &bbox.to_query_value())
        .append_pair("crs", &settings.crs);
    Ok(url)
}

/// Final location of one year's raster inside a layer prefix.
pub fn raster_path(out_path: &str, year: i32, format: &str) -> PathBuf {
    Path::new(out_path).join(format!("{}.{}", year, format))
}

/// Checks the years against the range the source publishes.
pub fn check_years(years: &[i32]) -> Result<()> {
    let max = Utc::now().year();
    match years
        .iter()
        .find(|&&y| !(catalog::FIRST_YEAR..=max).contains(&y))
    {
        Some(&year) => Err(HarvestError::YearOutOfRange {
            year,
            min: catalog::FIRST_YEAR,
            max,
        }),
        None => Ok(()),
    }
}

/// Downloads one raster per year over HTTP and stores it through `S`.
pub struct HttpFetchService<S: Storage> {
    storage: S,
    settings: SourceSettings,
    client: Client,
}

impl<S: Storage> HttpFetchService<S> {
    pub fn new(storage: S, settings: SourceSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self {
            storage,
            settings,
            client,
        })
    }

    async fn fetch_year(&self, request: &FetchRequest, year: i32, temp_dir: &Path) -> Result<PathBuf> {
        let target = raster_path(&request.out_path, year, &request.format);
        if self.storage.exists(&target).await? {
            tracing::info!("⏭️ {} already exists, skipping download", target.display());
            return Ok(target);
        }

        let url = coverage_url(&self.settings, &request.layer, year, &request.format, &request.bbox)?;
        tracing::debug!("Making request to: {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);
        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let part = temp_dir.join(format!("{}.{}.part", year, request.layer));
        self.storage.write_file(&part, &body).await?;
        self.storage.rename(&part, &target).await?;

        tracing::info!("💾 Saved {} ({} bytes)", target.display(), body.len());
        Ok(target)
    }
}

#[async_trait]
impl<S: Storage> FetchService for HttpFetchService<S> {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<PathBuf>> {
        validate_format(&request.format)?;
        check_years(&request.years)?;

        let temp_dir = Path::new(&request.out_path).join(TEMP_DIR_NAME);
        self.storage.create_dir_all(Path::new(&request.out_path)).await?;

        let mut paths = Vec::with_capacity(request.years.len());
        for &year in &request.years {
            paths.push(self.fetch_year(request, year, &temp_dir).await?);
        }

        if request.delete_temp {
            tracing::debug!("Removing temporary files in {}", temp_dir.display());
            self.storage.remove_dir_all(&temp_dir).await?;
        }

        Ok(paths)
    }
}
