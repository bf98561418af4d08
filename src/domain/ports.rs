use crate::domain::model::FetchRequest;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File system primitives used by fetch services that persist rasters.
pub trait Storage: Send + Sync {
    fn exists(&self, path: &Path) -> impl std::future::Future<Output = Result<bool>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn rename(&self, from: &Path, to: &Path)
        -> impl std::future::Future<Output = Result<()>> + Send;
    fn create_dir_all(&self, path: &Path) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_dir_all(&self, path: &Path) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Retrieves one layer for a set of years and returns the files it produced.
///
/// Implementations own every side effect of a download: network access,
/// writing rasters and removing temporary files. The number of returned
/// paths is up to the implementation.
#[async_trait]
pub trait FetchService: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<PathBuf>>;
}

#[async_trait]
impl<T: FetchService + ?Sized> FetchService for &T {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<PathBuf>> {
        (**self).fetch(request).await
    }
}

#[async_trait]
impl<T: FetchService + ?Sized> FetchService for Box<T> {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<PathBuf>> {
        (**self).fetch(request).await
    }
}

#[async_trait]
impl<T: FetchService + ?Sized> FetchService for Arc<T> {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<PathBuf>> {
        (**self).fetch(request).await
    }
}
