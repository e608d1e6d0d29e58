//! Console API client

use async_trait::async_trait;

use crate::error::Result;

pub mod console;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod parallel;
pub mod query;

pub use console::ConsoleClient;
#[cfg(test)]
pub use mock::MockConsoleClient;
pub use parallel::fetch_chunks;
pub use query::{Endpoint, FilterOperator, ListQuery, ListResponse, QueryFilter};

/// Console REST API, as seen by the reference cache.
///
/// Only the `list` action is needed: reference stores and the batched
/// fetcher project and filter server-side through [`ListQuery`].
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    /// Run the `list` action of `endpoint`
    async fn list(&self, endpoint: Endpoint, query: &ListQuery) -> Result<ListResponse>;
}
