//! Client side of the market back office API: the HTTP client, request
//! descriptors, and the view-level state containers built on top of it.

pub mod api_client;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod request;
pub mod store;
pub mod time;

pub use api_client::{APIClient, ClientError, DashboardSummary};
pub use cache::{MemoryStorage, SnapshotCache, SnapshotStorage};
pub use config::{ClientConfig, Endpoints, ResourceRoutes};
pub use fetch::{FetchState, Fetcher, run_fetch};
pub use request::{Body, Method, ParamValue, Request, build_url, join_url};
pub use store::{Resource, ResourceState, ResourceStore};
pub use tokio_util::sync::CancellationToken;
