// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod plan;
pub mod storage;

pub use http::HttpFetchService;
pub use plan::{PlannedFetch, PlanningFetchService};
pub use storage::LocalStorage;
