use crate::core::normalizer::normalize;
use crate::domain::model::{DownloadRequest, FetchRequest, NormalizedRequest, RasterPathCollection};
use crate::domain::ports::FetchService;
use crate::utils::error::{HarvestError, Result};
use crate::utils::monitor::SystemMonitor;
use std::path::PathBuf;

/// Fixed tag placed between the output directory and the layer name.
pub const LAYER_PREFIX_TAG: &str = "silo_";

/// What to do when the fetch service fails for one layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing layer and return its error.
    #[default]
    Abort,
    /// Record the failure and carry on with the remaining layers.
    Continue,
}

#[derive(Debug)]
pub struct LayerFailure {
    pub layer: String,
    pub error: HarvestError,
}

/// Outcome of [`RetrievalOrchestrator::retrieve_with_report`].
#[derive(Debug)]
pub struct RetrievalReport {
    pub paths: RasterPathCollection,
    pub failures: Vec<LayerFailure>,
}

impl RetrievalReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Builds the per-layer output prefix by plain concatenation.
pub fn layer_out_path(out_path: &str, layer: &str) -> String {
    format!("{}{}{}", out_path, LAYER_PREFIX_TAG, layer)
}

/// Normalizes a request and runs the fetch service once per layer, in order.
pub struct RetrievalOrchestrator<F: FetchService> {
    fetcher: F,
    policy: FailurePolicy,
    monitor: SystemMonitor,
}

impl<F: FetchService> RetrievalOrchestrator<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            policy: FailurePolicy::default(),
            monitor: SystemMonitor::default(),
        }
    }

    pub fn new_with_monitoring(fetcher: F, monitor_enabled: bool) -> Self {
        Self {
            fetcher,
            policy: FailurePolicy::default(),
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Downloads every requested layer in order and returns all produced paths.
    ///
    /// The first fetch error aborts the run and is returned unchanged,
    /// whatever policy is configured.
    pub async fn retrieve(&self, request: &DownloadRequest) -> Result<RasterPathCollection> {
        let normalized = normalize(request)?;
        let mut paths = Vec::new();

        for layer in &normalized.layers {
            let fetched = self.fetch_layer(&normalized, layer).await?;
            paths.extend(fetched);
        }

        self.monitor.log_final_stats();
        tracing::info!("✅ Retrieved {} raster file(s)", paths.len());
        Ok(RasterPathCollection::from_paths(paths))
    }

    /// Like [`retrieve`](Self::retrieve) but applies the configured
    /// [`FailurePolicy`]. Year coercion errors are always returned as `Err`.
    pub async fn retrieve_with_report(&self, request: &DownloadRequest) -> Result<RetrievalReport> {
        let normalized = normalize(request)?;
        let mut paths = Vec::new();
        let mut failures = Vec::new();

        for layer in &normalized.layers {
            match self.fetch_layer(&normalized, layer).await {
                Ok(fetched) => paths.extend(fetched),
                Err(error) if self.policy == FailurePolicy::Continue => {
                    tracing::warn!("⚠️ Skipping layer '{}' after failure", layer);
                    failures.push(LayerFailure {
                        layer: layer.clone(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        self.monitor.log_final_stats();
        tracing::info!(
            "Retrieved {} raster file(s), {} layer(s) failed",
            paths.len(),
            failures.len()
        );
        Ok(RetrievalReport {
            paths: RasterPathCollection::from_paths(paths),
            failures,
        })
    }

    async fn fetch_layer(&self, normalized: &NormalizedRequest, layer: &str) -> Result<Vec<PathBuf>> {
        let fetch_request = FetchRequest {
            layer: layer.to_string(),
            years: normalized.years.clone(),
            out_path: layer_out_path(&normalized.out_path, layer),
            bbox: normalized.bbox,
            format: normalized.format.clone(),
            delete_temp: normalized.delete_temp,
        };

        tracing::info!(
            "📥 Fetching layer '{}' for {} year(s) into {}",
            layer,
            fetch_request.years.len(),
            fetch_request.out_path
        );

        let fetched = self.fetcher.fetch(&fetch_request).await.inspect_err(|e| {
            tracing::error!("❌ Fetch failed for layer '{}': {}", layer, e);
        })?;

        for path in &fetched {
            tracing::debug!("  {} -> {}", layer, path.display());
        }
        self.monitor.log_stats(&format!("layer {}", layer));

        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::BoundingBox;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingFetcher {
        calls: Mutex<Vec<FetchRequest>>,
    }

    impl RecordingFetcher {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FetchService for RecordingFetcher {
        async fn fetch(&self, request: &FetchRequest) -> Result<Vec<PathBuf>> {
            self.calls.lock().unwrap().push(request.clone());
            if request.layer == "broken" {
                return Err(HarvestError::HttpStatus {
                    url: "http://source/broken".to_string(),
                    status: 500,
                });
            }
            Ok(request
                .years
                .iter()
                .map(|y| PathBuf::from(format!("{}/{}.{}", request.out_path, y, request.format)))
                .collect())
        }
    }

    fn bbox() -> BoundingBox {
        BoundingBox::new(149.0, -35.5, 149.5, -35.0)
    }

    #[test]
    fn test_layer_out_path_concatenates() {
        assert_eq!(layer_out_path("/data/", "daily_rain"), "/data/silo_daily_rain");
        assert_eq!(layer_out_path("out", "vp"), "outsilo_vp");
    }

    #[tokio::test]
    async fn test_fetch_request_carries_normalized_fields() {
        let fetcher = RecordingFetcher::new();
        let orchestrator = RetrievalOrchestrator::new(&fetcher);
        let request = DownloadRequest::new("max_temp", bbox(), "/data/", ["2020", "2021.0"])
            .format("nc")
            .delete_temp(true);

        let result = orchestrator.retrieve(&request).await.unwrap();

        let calls = fetcher.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            FetchRequest {
                layer: "max_temp".to_string(),
                years: vec![2020, 2021],
                out_path: "/data/silo_max_temp".to_string(),
                bbox: bbox(),
                format: "nc".to_string(),
                delete_temp: true,
            }
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result.kind(), RasterPathCollection::KIND);
    }

    #[tokio::test]
    async fn test_invalid_year_fails_before_any_fetch() {
        let fetcher = RecordingFetcher::new();
        let orchestrator = RetrievalOrchestrator::new(&fetcher);
        let request = DownloadRequest::new("max_temp", bbox(), "/data/", ["2020", "soon"]);

        let err = orchestrator.retrieve(&request).await.unwrap_err();

        assert!(matches!(err, HarvestError::InvalidYear { .. }));
        assert!(fetcher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_continue_policy_reports_failures() {
        let fetcher = RecordingFetcher::new();
        let orchestrator =
            RetrievalOrchestrator::new(&fetcher).with_policy(FailurePolicy::Continue);
        let request = DownloadRequest::new(["vp", "broken", "mslp"], bbox(), "/d/", [2020]);

        let report = orchestrator.retrieve_with_report(&request).await.unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].layer, "broken");
        assert_eq!(
            report.paths.paths(),
            &[
                PathBuf::from("/d/silo_vp/2020.tif"),
                PathBuf::from("/d/silo_mslp/2020.tif")
            ]
        );
        assert_eq!(fetcher.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_abort_policy_report_returns_error() {
        let fetcher = RecordingFetcher::new();
        let orchestrator = RetrievalOrchestrator::new(&fetcher);
        let request = DownloadRequest::new(["broken", "mslp"], bbox(), "/d/", [2020]);

        let err = orchestrator.retrieve_with_report(&request).await.unwrap_err();

        assert!(matches!(err, HarvestError::HttpStatus { status: 500, .. }));
        assert_eq!(fetcher.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_retrieve_ignores_continue_policy() {
        let fetcher = RecordingFetcher::new();
        let orchestrator =
            RetrievalOrchestrator::new(&fetcher).with_policy(FailurePolicy::Continue);
        let request = DownloadRequest::new(["broken", "mslp"], bbox(), "/d/", [2020]);

        assert!(orchestrator.retrieve(&request).await.is_err());
        assert_eq!(fetcher.calls.lock().unwrap().len(), 1);
    }
}
