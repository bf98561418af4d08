//! Retrieval of SILO gridded climate rasters.
//!
//! [`download`] walks the requested layers in order, hands each one to a
//! [`FetchService`] under its own `<out_path>silo_<layer>` prefix, and
//! collects every produced file into a [`RasterPathCollection`].

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{SourceSettings, TomlConfig};

pub use crate::adapters::{HttpFetchService, LocalStorage, PlanningFetchService};
pub use crate::core::orchestrator::{FailurePolicy, LayerFailure, RetrievalOrchestrator, RetrievalReport};
pub use crate::domain::model::{
    BoundingBox, DownloadRequest, FetchRequest, LayerSet, RasterPathCollection, YearInput,
};
pub use crate::domain::ports::{FetchService, Storage};
pub use crate::utils::error::{HarvestError, Result};

/// Downloads `layers` for `years` inside `bbox` as `tif`, keeping temporary files.
///
/// See [`download_with`] to choose the format or delete temporary files.
pub async fn download<F, L, Y>(
    fetcher: F,
    layers: L,
    bbox: BoundingBox,
    out_path: &str,
    years: Y,
) -> Result<RasterPathCollection>
where
    F: FetchService,
    L: Into<LayerSet>,
    Y: IntoIterator,
    Y::Item: Into<YearInput>,
{
    let request = DownloadRequest::new(layers, bbox, out_path, years);
    RetrievalOrchestrator::new(fetcher).retrieve(&request).await
}

/// [`download`] with an explicit output `format` and `delete_temp` flag.
///
/// ```no_run
/// # async fn run() -> silo_harvest::Result<()> {
/// use silo_harvest::{download_with, BoundingBox, HttpFetchService, LocalStorage, SourceSettings};
///
/// let fetcher = HttpFetchService::new(LocalStorage::default(), SourceSettings::default())?;
/// let bbox = BoundingBox::new(149.0, -35.5, 149.5, -35.0);
/// let rasters = download_with(fetcher, "daily_rain", bbox, "/data/", [2020], "nc", true).await?;
/// # Ok(())
/// # }
/// ```
pub async fn download_with<F, L, Y>(
    fetcher: F,
    layers: L,
    bbox: BoundingBox,
    out_path: &str,
    years: Y,
    format: &str,
    delete_temp: bool,
) -> Result<RasterPathCollection>
where
    F: FetchService,
    L: Into<LayerSet>,
    Y: IntoIterator,
    Y::Item: Into<YearInput>,
{
    let request = DownloadRequest::new(layers, bbox, out_path, years)
        .format(format)
        .delete_temp(delete_temp);
    RetrievalOrchestrator::new(fetcher).retrieve(&request).await
}
