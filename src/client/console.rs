//! HTTP implementation of the console API

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest::{Client as HttpClient, StatusCode};
use tokio::sync::RwLock;

use super::query::{Endpoint, ListQuery, ListRequest, ListResponse};
use super::ConsoleApi;
use crate::error::{ApiError, Result};

/// Client-side request budget
const RATE_LIMIT_PER_SECOND: u32 = 20;

/// Request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the active workspace
const WORKSPACE_HEADER: &str = "X-Workspace-Id";

/// Console API client
pub struct ConsoleClient {
    http: HttpClient,
    base_url: String,
    token: String,
    workspace_id: RwLock<Option<String>>,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl ConsoleClient {
    /// Create a new client against `base_url`
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let quota = Quota::per_second(NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN));

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            workspace_id: RwLock::new(None),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Set the workspace sent with every request
    pub async fn set_workspace(&self, workspace_id: Option<String>) {
        *self.workspace_id.write().await = workspace_id;
    }

    async fn post_list(&self, endpoint: Endpoint, query: &ListQuery) -> Result<ListResponse> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, endpoint.list_path());
        debug!("POST {} (only={:?})", url, query.only);

        let mut request = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&ListRequest { query });

        if let Some(ref workspace) = *self.workspace_id.read().await {
            request = request.header(WORKSPACE_HEADER, workspace);
        }

        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let data = response.json::<ListResponse>().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse {} response: {}", endpoint, e))
                })?;
                Ok(data)
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden.into()),
            StatusCode::NOT_FOUND => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| endpoint.to_string());
                Err(ApiError::NotFound(error_msg).into())
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(ApiError::RateLimit(Duration::from_secs(retry_after)).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => Err(ApiError::InvalidResponse(format!("Unexpected status code: {}", status)).into()),
        }
    }
}

#[async_trait]
impl ConsoleApi for ConsoleClient {
    async fn list(&self, endpoint: Endpoint, query: &ListQuery) -> Result<ListResponse> {
        self.post_list(endpoint, query).await
    }
}
