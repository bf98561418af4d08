pub mod normalizer;
pub mod orchestrator;

pub use crate::domain::model::{DownloadRequest, FetchRequest, RasterPathCollection};
pub use crate::domain::ports::{FetchService, Storage};
pub use crate::utils::error::Result;
