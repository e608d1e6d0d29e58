//! Mock console API client for testing
//!
//! Serves canned rows per endpoint and records every request so tests can
//! assert on call counts and the exact queries that went out.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::ConsoleApi;
use super::query::{Endpoint, FilterOperator, ListQuery, ListResponse};
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// # Example
/// ```ignore
/// let mock = MockConsoleClient::new()
///     .with_rows(PROJECT, vec![json!({"project_id": "p1", "name": "Alpha"})])
///     .await;
///
/// let resp = mock.list(PROJECT, &ListQuery::new()).await?;
/// assert_eq!(resp.results.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockConsoleClient {
    /// Rows returned per endpoint (keyed by `service.resource`)
    rows: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Requests whose `in` filter contains this id fail
    poisoned_id: Arc<Mutex<Option<String>>>,
    /// Simulated request latency
    latency: Arc<Mutex<Option<Duration>>>,
    /// Number of list calls per endpoint
    call_count: Arc<Mutex<HashMap<String, usize>>>,
    /// Captured requests for test assertions
    captured_requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// A captured API request for test assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// `service.resource` of the call
    pub endpoint: String,
    /// The query that was sent
    pub query: ListQuery,
}

impl MockConsoleClient {
    /// Create a new mock client with no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure rows returned for `endpoint`.
    pub async fn with_rows(self, endpoint: Endpoint, rows: Vec<Value>) -> Self {
        self.set_rows(endpoint, rows).await;
        self
    }

    /// Replace rows for `endpoint` after construction.
    pub async fn set_rows(&self, endpoint: Endpoint, rows: Vec<Value>) {
        self.rows.lock().await.insert(endpoint.to_string(), rows);
    }

    /// Configure an error to return on the next API call.
    pub async fn with_error(self, error: ApiError) -> Self {
        self.fail_next(error).await;
        self
    }

    /// Make the next call fail with `error`.
    pub async fn fail_next(&self, error: ApiError) {
        *self.error.lock().await = Some(error);
    }

    /// Fail every request whose `in` filter contains `id`.
    pub async fn with_poisoned_id(self, id: &str) -> Self {
        *self.poisoned_id.lock().await = Some(id.to_string());
        self
    }

    /// Delay every response by `latency`.
    pub async fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().await = Some(latency);
        self
    }

    /// Number of calls made against `endpoint`.
    pub async fn calls(&self, endpoint: Endpoint) -> usize {
        self.call_count
            .lock()
            .await
            .get(&endpoint.to_string())
            .copied()
            .unwrap_or(0)
    }

    /// Number of calls across every endpoint.
    pub async fn total_calls(&self) -> usize {
        self.call_count.lock().await.values().sum()
    }

    /// Get all captured requests for test assertions.
    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.captured_requests.lock().await.clone()
    }

    async fn check_error(&self, query: &ListQuery) -> Result<()> {
        if let Some(e) = self.error.lock().await.take() {
            return Err(e.into());
        }

        if let Some(ref poisoned) = *self.poisoned_id.lock().await {
            let hit = query.filter.iter().any(|f| {
                f.o == FilterOperator::In
                    && f.v
                        .as_array()
                        .is_some_and(|vals| vals.iter().any(|v| v.as_str() == Some(poisoned.as_str())))
            });
            if hit {
                return Err(ApiError::ServerError(format!("poisoned id {}", poisoned)).into());
            }
        }

        Ok(())
    }
}

/// Keep rows matching every `in`/`eq` filter of the query
fn apply_filters(rows: Vec<Value>, query: &ListQuery) -> Vec<Value> {
    rows.into_iter()
        .filter(|row| {
            query.filter.iter().all(|f| {
                let field = row.get(&f.k);
                match f.o {
                    FilterOperator::In => match (field, f.v.as_array()) {
                        (Some(v), Some(allowed)) => allowed.contains(v),
                        _ => false,
                    },
                    FilterOperator::Eq => field == Some(&f.v),
                    _ => true,
                }
            })
        })
        .collect()
}

#[async_trait]
impl ConsoleApi for MockConsoleClient {
    async fn list(&self, endpoint: Endpoint, query: &ListQuery) -> Result<ListResponse> {
        self.captured_requests.lock().await.push(CapturedRequest {
            endpoint: endpoint.to_string(),
            query: query.clone(),
        });

        {
            let mut counts = self.call_count.lock().await;
            *counts.entry(endpoint.to_string()).or_default() += 1;
        }

        let latency = *self.latency.lock().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        self.check_error(query).await?;

        let rows = self
            .rows
            .lock()
            .await
            .get(&endpoint.to_string())
            .cloned()
            .unwrap_or_default();
        let results = apply_filters(rows, query);
        let total_count = results.len();

        Ok(ListResponse {
            results,
            total_count: Some(total_count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PROJECT: Endpoint = Endpoint::new("identity", "project");

    #[tokio::test]
    async fn test_mock_filters_by_in() {
        let mock = MockConsoleClient::new()
            .with_rows(
                PROJECT,
                vec![
                    json!({"project_id": "p1"}),
                    json!({"project_id": "p2"}),
                    json!({"project_id": "p3"}),
                ],
            )
            .await;

        let resp = mock
            .list(PROJECT, &ListQuery::new().filter_in("project_id", ["p1", "p3"]))
            .await
            .unwrap();

        assert_eq!(resp.results.len(), 2);
        assert_eq!(resp.total_count, Some(2));
        assert_eq!(mock.calls(PROJECT).await, 1);
    }

    #[tokio::test]
    async fn test_mock_error_is_one_shot() {
        let mock = MockConsoleClient::new()
            .with_error(ApiError::ServerError("down".to_string()))
            .await;

        assert!(mock.list(PROJECT, &ListQuery::new()).await.is_err());
        assert!(mock.list(PROJECT, &ListQuery::new()).await.is_ok());
        assert_eq!(mock.total_calls().await, 2);
    }
}
