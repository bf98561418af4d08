use httpmock::prelude::*;
use silo_harvest::config::DEFAULT_SOURCE_FORMAT;
use silo_harvest::{
    BoundingBox, DownloadRequest, FailurePolicy, HarvestError, HttpFetchService, LocalStorage,
    RetrievalOrchestrator, SourceSettings,
};
use std::path::Path;
use tempfile::TempDir;

fn out_path(dir: &TempDir) -> String {
    format!("{}/", dir.path().to_str().unwrap())
}

fn settings(server: &MockServer) -> SourceSettings {
    SourceSettings {
        base_url: server.url("/annual"),
        timeout_seconds: 5,
        ..SourceSettings::default()
    }
}

fn bbox() -> BoundingBox {
    BoundingBox::new(149.0, -35.5, 149.5, -35.0)
}

#[tokio::test]
async fn test_end_to_end_download_to_disk() {
    let temp_dir = TempDir::new().unwrap();
    let out = out_path(&temp_dir);

    let server = MockServer::start();
    let rain_2020 = server.mock(|when, then| {
        when.method(GET)
            .path("/annual/daily_rain/2020.daily_rain.tif")
            .query_param("crs", "EPSG:4326");
        then.status(200).body("rain-2020");
    });
    let rain_2021 = server.mock(|when, then| {
        when.method(GET).path("/annual/daily_rain/2021.daily_rain.tif");
        then.status(200).body("rain-2021");
    });
    let temp_2020 = server.mock(|when, then| {
        when.method(GET).path("/annual/max_temp/2020.max_temp.tif");
        then.status(200).body("temp-2020");
    });
    let temp_2021 = server.mock(|when, then| {
        when.method(GET).path("/annual/max_temp/2021.max_temp.tif");
        then.status(200).body("temp-2021");
    });

    let fetcher = HttpFetchService::new(LocalStorage::default(), settings(&server)).unwrap();
    let request = DownloadRequest::new(["daily_rain", "max_temp"], bbox(), out.clone(), [2020, 2021])
        .delete_temp(true);

    let result = RetrievalOrchestrator::new(fetcher).retrieve(&request).await.unwrap();

    rain_2020.assert();
    rain_2021.assert();
    temp_2020.assert();
    temp_2021.assert();

    let expected: Vec<_> = [
        "silo_daily_rain/2020.tif",
        "silo_daily_rain/2021.tif",
        "silo_max_temp/2020.tif",
        "silo_max_temp/2021.tif",
    ]
    .iter()
    .map(|p| Path::new(&out).join(p))
    .collect();
    assert_eq!(result.paths(), expected.as_slice());

    assert_eq!(std::fs::read(&expected[2]).unwrap(), b"temp-2020");
    assert!(!temp_dir.path().join("silo_daily_rain/tmp").exists());
    assert!(!temp_dir.path().join("silo_max_temp/tmp").exists());
}

#[tokio::test]
async fn test_second_run_reuses_existing_files() {
    let temp_dir = TempDir::new().unwrap();
    let out = out_path(&temp_dir);

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/annual/vp/2020.vp.tif");
        then.status(200).body("vp");
    });

    let request = DownloadRequest::new("vp", bbox(), out.clone(), [2020]);
    for _ in 0..2 {
        let fetcher = HttpFetchService::new(LocalStorage::default(), settings(&server)).unwrap();
        let result = RetrievalOrchestrator::new(fetcher).retrieve(&request).await.unwrap();
        assert_eq!(result.len(), 1);
    }

    api_mock.assert_hits(1);
}

#[tokio::test]
async fn test_missing_layer_aborts_remaining_layers() {
    let temp_dir = TempDir::new().unwrap();
    let out = out_path(&temp_dir);

    let server = MockServer::start();
    let ok_mock = server.mock(|when, then| {
        when.method(GET).path("/annual/vp/2020.vp.tif");
        then.status(200).body("vp");
    });
    let missing = server.mock(|when, then| {
        when.method(GET).path("/annual/nope/2020.nope.tif");
        then.status(404);
    });
    let never = server.mock(|when, then| {
        when.method(GET).path("/annual/mslp/2020.mslp.tif");
        then.status(200).body("mslp");
    });

    let fetcher = HttpFetchService::new(LocalStorage::default(), settings(&server)).unwrap();
    let request = DownloadRequest::new(["vp", "nope", "mslp"], bbox(), out, [2020]);

    let err = RetrievalOrchestrator::new(fetcher)
        .retrieve(&request)
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::HttpStatus { status: 404, .. }));
    ok_mock.assert();
    missing.assert();
    never.assert_hits(0);
}

#[tokio::test]
async fn test_continue_policy_downloads_remaining_layers() {
    let temp_dir = TempDir::new().unwrap();
    let out = out_path(&temp_dir);

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/annual/nope/2020.nope.tif");
        then.status(404);
    });
    let mslp = server.mock(|when, then| {
        when.method(GET).path("/annual/mslp/2020.mslp.tif");
        then.status(200).body("mslp");
    });

    let fetcher = HttpFetchService::new(LocalStorage::default(), settings(&server)).unwrap();
    let request = DownloadRequest::new(["nope", "mslp"], bbox(), out, [2020]);

    let report = RetrievalOrchestrator::new(fetcher)
        .with_policy(FailurePolicy::Continue)
        .retrieve_with_report(&request)
        .await
        .unwrap();

    mslp.assert();
    assert_eq!(report.paths.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].layer, "nope");
}

#[tokio::test]
async fn test_open_data_layout_fetches_whole_grid_object() {
    let temp_dir = TempDir::new().unwrap();
    let out = out_path(&temp_dir);

    let server = MockServer::start();
    let grid = server.mock(|when, then| {
        when.method(GET)
            .path("/silo-open-data/Official/annual/daily_rain/2020.daily_rain.nc");
        then.status(200).body("netcdf");
    });

    let settings = SourceSettings {
        base_url: server.url("/silo-open-data/Official/annual"),
        ..SourceSettings::default()
    };
    let fetcher = HttpFetchService::new(LocalStorage::default(), settings).unwrap();
    let request = DownloadRequest::new("daily_rain", bbox(), out.clone(), [2020])
        .format(DEFAULT_SOURCE_FORMAT);

    let result = RetrievalOrchestrator::new(fetcher).retrieve(&request).await.unwrap();

    grid.assert();
    let expected = Path::new(&out).join("silo_daily_rain/2020.nc");
    assert_eq!(result.paths(), &[expected.clone()]);
    assert_eq!(std::fs::read(expected).unwrap(), b"netcdf");
}
