use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use super::common::{ApiErrorResponse, ApiQueryParams};
use super::error::ApiError;
use super::oauth::{self, AccessToken, Credentials};
use super::pool::{ConnectionPoolConfig, ConnectionPoolManager, ConnectionStats, Outcome};

/// Zoom API client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    oauth_url: String,
    credentials: Credentials,
    token: RwLock<Option<AccessToken>>,
    retry_config: RetryConfig,
    pool_manager: ConnectionPoolManager,
}

#[derive(Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            timeout_seconds: 30,
        }
    }
}

impl Client {
    /// Create a new API client with default configuration
    pub fn new(api_url: &str, oauth_url: &str, credentials: Credentials) -> Result<Self, ApiError> {
        Self::with_config(api_url, oauth_url, credentials, RetryConfig::default())
    }

    /// Create a new API client with custom retry configuration
    pub fn with_config(
        api_url: &str,
        oauth_url: &str,
        credentials: Credentials,
        retry_config: RetryConfig,
    ) -> Result<Self, ApiError> {
        let base_url = normalize_url(api_url)?;
        let oauth_url = normalize_url(oauth_url)?;

        let pool_manager = ConnectionPoolManager::new(ConnectionPoolConfig::from(&retry_config));
        let http_client = pool_manager.build_client()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                oauth_url,
                credentials,
                token: RwLock::new(None),
                retry_config,
                pool_manager,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Execute a GET request with retry logic
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!("GET request to: {}", url);

        self.execute_with_retry(|| self.inner.http_client.get(&url), path)
            .await
    }

    /// Execute a GET request with query parameters
    pub async fn get_with_params<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &ApiQueryParams,
    ) -> Result<T, ApiError> {
        let full_path = format!("{}{}", path, params.to_query_string());
        self.get(&full_path).await
    }

    /// Execute a POST request with retry logic
    pub async fn post<T: for<'de> Deserialize<'de>, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!("POST request to: {}", url);

        self.execute_with_retry(|| self.inner.http_client.post(&url).json(body), path)
            .await
    }

    /// Execute a PATCH request with retry logic
    pub async fn patch<T: for<'de> Deserialize<'de>, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!("PATCH request to: {}", url);

        self.execute_with_retry(|| self.inner.http_client.patch(&url).json(body), path)
            .await
    }

    /// Execute a DELETE request with retry logic
    pub async fn delete<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!("DELETE request to: {}", url);

        self.execute_with_retry(|| self.inner.http_client.delete(&url), path)
            .await
    }

    /// Execute a DELETE request with query parameters
    pub async fn delete_with_params<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &ApiQueryParams,
    ) -> Result<T, ApiError> {
        let full_path = format!("{}{}", path, params.to_query_string());
        self.delete(&full_path).await
    }

    /// Get connection pool statistics
    pub async fn get_connection_stats(&self) -> ConnectionStats {
        self.inner.pool_manager.get_stats().await
    }

    /// Zoom Phone API operations
    pub fn phone(&self) -> crate::api::phone::PhoneApi<'_> {
        crate::api::phone::PhoneApi::new(self)
    }

    /// Return the cached access token, fetching a new one when it is missing
    /// or about to expire.
    async fn access_token(&self) -> Result<String, ApiError> {
        {
            let token = self.inner.token.read().await;
            if let Some(token) = token.as_ref() {
                if token.is_fresh(Instant::now()) {
                    return Ok(token.value.clone());
                }
            }
        }

        let mut token = self.inner.token.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(current) = token.as_ref() {
            if current.is_fresh(Instant::now()) {
                return Ok(current.value.clone());
            }
        }

        let response = oauth::fetch_token(
            &self.inner.http_client,
            &self.inner.oauth_url,
            &self.inner.credentials,
        )
        .await?;
        self.inner.pool_manager.record_token_fetch().await;
        tracing::info!("Obtained Zoom access token, expires in {}s", response.expires_in);

        let fresh = AccessToken::from_response(&response, Instant::now());
        let value = fresh.value.clone();
        *token = Some(fresh);
        Ok(value)
    }

    async fn invalidate_token(&self) {
        *self.inner.token.write().await = None;
    }

    /// Execute request with retry logic
    async fn execute_with_retry<F, T>(&self, request_fn: F, path: &str) -> Result<T, ApiError>
    where
        F: Fn() -> reqwest::RequestBuilder,
        T: for<'de> Deserialize<'de>,
    {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.inner.retry_config.max_retries {
            if attempt > 0 {
                let backoff = std::cmp::min(
                    self.inner.retry_config.initial_backoff_ms * (2_u64.pow(attempt - 1)),
                    self.inner.retry_config.max_backoff_ms,
                );
                tracing::debug!(
                    "Retrying request to {} after {}ms (attempt {})",
                    path,
                    backoff,
                    attempt
                );
                tokio::time::sleep(tokio::time::Duration::from_millis(backoff)).await;
            }

            let token = self.access_token().await?;

            match request_fn().bearer_auth(&token).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        self.inner.pool_manager.record_request(Outcome::Success).await;
                        return self.parse_success_response(response).await;
                    }

                    if status == reqwest::StatusCode::UNAUTHORIZED {
                        self.inner.pool_manager.record_request(Outcome::Failed).await;
                        tracing::warn!("Request to {} was unauthorized, dropping token", path);
                        self.invalidate_token().await;
                        return Err(ApiError::AuthError);
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        self.inner.pool_manager.record_request(Outcome::RateLimited).await;
                        last_error = Some(ApiError::RateLimited);
                    } else if status.is_server_error() {
                        self.inner.pool_manager.record_request(Outcome::Retryable).await;
                        last_error = Some(ApiError::ServiceUnavailable);
                    } else {
                        self.inner.pool_manager.record_request(Outcome::Failed).await;
                        return self.handle_error_response(response).await;
                    }
                }
                Err(e) => {
                    if e.is_timeout() {
                        self.inner.pool_manager.record_request(Outcome::Retryable).await;
                        last_error =
                            Some(ApiError::Timeout(self.inner.retry_config.timeout_seconds));
                    } else if e.is_connect() || e.is_request() {
                        self.inner.pool_manager.record_request(Outcome::Retryable).await;
                        last_error = Some(ApiError::ServiceUnavailable);
                    } else {
                        self.inner.pool_manager.record_request(Outcome::Failed).await;
                        return Err(ApiError::RequestError(e));
                    }
                }
            }

            attempt += 1;
        }

        let stats = self.get_connection_stats().await;
        tracing::warn!(
            "Giving up on {} after {} attempts ({} of {} requests failed, {} rate limited)",
            path,
            attempt,
            stats.failed_requests,
            stats.total_requests,
            stats.rate_limited_requests
        );
        Err(last_error.unwrap_or(ApiError::ServiceUnavailable))
    }

    /// Parse successful response. Empty bodies (204) decode as JSON null.
    async fn parse_success_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        tracing::debug!("API response body: {}", text);

        let body = if text.trim().is_empty() { "null" } else { &text };

        serde_json::from_str::<T>(body).map_err(|e| {
            tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
            ApiError::ParseError(format!("Failed to parse response: {}", e))
        })
    }

    /// Handle error response
    async fn handle_error_response<T>(&self, response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let (code, message) = match serde_json::from_str::<ApiErrorResponse>(&text) {
            Ok(body) => (body.code, body.message.unwrap_or_else(|| text.clone())),
            Err(_) => (None, text),
        };

        Err(ApiError::ApiError {
            status,
            code,
            message,
        })
    }
}

fn normalize_url(raw: &str) -> Result<String, ApiError> {
    let parsed = url::Url::parse(raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(raw.trim_end_matches('/').to_string()),
        other => Err(ApiError::InvalidUrl(format!(
            "{}: unsupported scheme {}",
            raw, other
        ))),
    }
}
