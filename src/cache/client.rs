//! Cached wrapper for console API clients
//!
//! Caches `list` responses per [`ServiceQueryKey`] for a fixed TTL.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::key::ServiceQueryKey;
use super::storage::{CacheStats, ResponseStorage};
use crate::client::{ConsoleApi, Endpoint, ListQuery, ListResponse};
use crate::error::Result;

/// Cached wrapper for any [`ConsoleApi`] implementation.
///
/// Cache can be disabled via the `enabled` flag (for `--no-cache`).
/// Entries are keyed by the current context key, so switching workspaces
/// never serves another tenant's rows.
pub struct CachedConsoleClient<C: ConsoleApi> {
    inner: Arc<C>,
    cache: Option<ResponseStorage>,
    ttl: Duration,
    context_key: RwLock<Option<String>>,
}

impl<C: ConsoleApi> CachedConsoleClient<C> {
    pub fn new(inner: C, enabled: bool, ttl: Duration) -> Self {
        Self::from_arc(Arc::new(inner), enabled, ttl)
    }

    pub fn from_arc(inner: Arc<C>, enabled: bool, ttl: Duration) -> Self {
        Self {
            inner,
            cache: enabled.then(ResponseStorage::new),
            ttl,
            context_key: RwLock::new(None),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub async fn set_context_key(&self, context_key: Option<String>) {
        *self.context_key.write().await = context_key;
    }

    /// Drop cached responses of `service.resource`, e.g. after a mutation
    pub fn invalidate(&self, service: &str, resource: &str) -> usize {
        self.cache
            .as_ref()
            .map_or(0, |cache| cache.invalidate(service, resource))
    }

    pub fn clear(&self) -> usize {
        self.cache.as_ref().map_or(0, ResponseStorage::clear_all)
    }

    pub fn stats(&self) -> CacheStats {
        self.cache
            .as_ref()
            .map(ResponseStorage::stats)
            .unwrap_or_default()
    }

    async fn query_key(&self, endpoint: Endpoint, query: &ListQuery) -> Result<ServiceQueryKey> {
        Ok(
            ServiceQueryKey::new(endpoint.service, endpoint.resource, "list")
                .with_context(self.context_key.read().await.clone())
                .with_params(serde_json::to_value(query)?),
        )
    }
}

#[async_trait]
impl<C: ConsoleApi + 'static> ConsoleApi for CachedConsoleClient<C> {
    async fn list(&self, endpoint: Endpoint, query: &ListQuery) -> Result<ListResponse> {
        let Some(ref cache) = self.cache else {
            return self.inner.list(endpoint, query).await;
        };

        let key = self.query_key(endpoint, query).await?;
        if let Some(cached) = cache.get(&key)
            && let Ok(response) = serde_json::from_value::<ListResponse>(cached)
        {
            log::debug!("Cache hit: {}", endpoint);
            return Ok(response);
        }

        log::debug!("Cache miss: {}", endpoint);
        let response = self.inner.list(endpoint, query).await?;
        cache.put(&key, serde_json::to_value(&response)?, self.ttl);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockConsoleClient;
    use serde_json::json;

    const USER: Endpoint = Endpoint::new("identity", "user");
    const PROJECT: Endpoint = Endpoint::new("identity", "project");

    async fn mock() -> MockConsoleClient {
        MockConsoleClient::new()
            .with_rows(USER, vec![json!({"user_id": "u1"}), json!({"user_id": "u2"})])
            .await
            .with_rows(PROJECT, vec![json!({"project_id": "p1"})])
            .await
    }

    #[tokio::test]
    async fn test_repeated_query_is_served_from_cache() {
        let mock = mock().await;
        let client = CachedConsoleClient::new(mock.clone(), true, Duration::from_secs(60));
        let query = ListQuery::new().only(["user_id"]);

        let first = client.list(USER, &query).await.unwrap();
        let second = client.list(USER, &query).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(mock.calls(USER).await, 1);
    }

    #[tokio::test]
    async fn test_different_filters_are_separate_entries() {
        let mock = mock().await;
        let client = CachedConsoleClient::new(mock.clone(), true, Duration::from_secs(60));

        let one = client
            .list(USER, &ListQuery::new().filter_in("user_id", ["u1"]))
            .await
            .unwrap();
        let all = client.list(USER, &ListQuery::new()).await.unwrap();

        assert_eq!(one.results.len(), 1);
        assert_eq!(all.results.len(), 2);
        assert_eq!(mock.calls(USER).await, 2);
    }

    #[tokio::test]
    async fn test_context_key_separates_tenants() {
        let mock = mock().await;
        let client = CachedConsoleClient::new(mock.clone(), true, Duration::from_secs(60));

        client.set_context_key(Some("ws-1".into())).await;
        client.list(USER, &ListQuery::new()).await.unwrap();
        client.set_context_key(Some("ws-2".into())).await;
        client.list(USER, &ListQuery::new()).await.unwrap();

        assert_eq!(mock.calls(USER).await, 2);
    }

    #[tokio::test]
    async fn test_invalidate_targets_one_resource() {
        let mock = mock().await;
        let client = CachedConsoleClient::new(mock.clone(), true, Duration::from_secs(60));
        let query = ListQuery::new();

        client.list(USER, &query).await.unwrap();
        client.list(PROJECT, &query).await.unwrap();
        assert_eq!(client.invalidate("identity", "user"), 1);

        client.list(USER, &query).await.unwrap();
        client.list(PROJECT, &query).await.unwrap();
        assert_eq!(mock.calls(USER).await, 2);
        assert_eq!(mock.calls(PROJECT).await, 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_passes_through() {
        let mock = mock().await;
        let client = CachedConsoleClient::new(mock.clone(), false, Duration::from_secs(60));

        client.list(USER, &ListQuery::new()).await.unwrap();
        client.list(USER, &ListQuery::new()).await.unwrap();

        assert!(!client.is_enabled());
        assert_eq!(client.stats().total_entries, 0);
        assert_eq!(mock.calls(USER).await, 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let mock = mock().await;
        let client = CachedConsoleClient::new(mock.clone(), true, Duration::from_secs(60));
        mock.fail_next(crate::error::ApiError::ServerError("boom".into()))
            .await;

        assert!(client.list(USER, &ListQuery::new()).await.is_err());
        assert!(client.list(USER, &ListQuery::new()).await.is_ok());
        assert_eq!(client.clear(), 1);
    }
}
