use crate::adapters::http::{coverage_url, raster_path};
use crate::config::SourceSettings;
use crate::domain::model::FetchRequest;
use crate::domain::ports::FetchService;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFetch {
    pub layer: String,
    pub year: i32,
    pub url: String,
    pub target: PathBuf,
}

/// Records what the HTTP fetch service would do, without touching the
/// network or the file system. Used for dry runs.
pub struct PlanningFetchService {
    settings: SourceSettings,
    planned: Mutex<Vec<PlannedFetch>>,
}

impl PlanningFetchService {
    pub fn new(settings: SourceSettings) -> Self {
        Self {
            settings,
            planned: Mutex::new(Vec::new()),
        }
    }

    pub fn planned(&self) -> Vec<PlannedFetch> {
        match self.planned.lock() {
            Ok(planned) => planned.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl FetchService for PlanningFetchService {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::with_capacity(request.years.len());
        for &year in &request.years {
            let url = coverage_url(&self.settings, &request.layer, year, &request.format, &request.bbox)?;
            entries.push(PlannedFetch {
                layer: request.layer.clone(),
                year,
                url: url.to_string(),
                target: raster_path(&request.out_path, year, &request.format),
            });
        }

        let targets = entries.iter().map(|e| e.target.clone()).collect();
        match self.planned.lock() {
            Ok(mut planned) => planned.extend(entries),
            Err(poisoned) => poisoned.into_inner().extend(entries),
        }
        Ok(targets)
    }
}
