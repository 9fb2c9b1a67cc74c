//! HTTP connection settings and per-client request accounting

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::client::RetryConfig;

pub struct ConnectionPoolConfig {
    pub max_idle_connections: usize,
    pub idle_timeout: Duration,
    pub connection_timeout: Duration,
    pub request_timeout: Duration,
    pub tcp_keepalive: Option<Duration>,
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self {
            max_idle_connections: 10,
            idle_timeout: Duration::from_secs(90),
            connection_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            tcp_keepalive: Some(Duration::from_secs(30)),
        }
    }
}

impl From<&RetryConfig> for ConnectionPoolConfig {
    fn from(retry: &RetryConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(retry.timeout_seconds),
            ..Default::default()
        }
    }
}

/// How a single HTTP attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// 429 from Zoom; the attempt is retried
    RateLimited,
    /// 5xx or a transport failure; the attempt is retried
    Retryable,
    Failed,
}

#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    pub total_requests: u64,
    pub failed_requests: u64,
    pub rate_limited_requests: u64,
    pub token_fetches: u64,
    pub last_request: Option<Instant>,
}

pub struct ConnectionPoolManager {
    stats: Arc<RwLock<ConnectionStats>>,
    config: ConnectionPoolConfig,
}

impl ConnectionPoolManager {
    pub fn new(config: ConnectionPoolConfig) -> Self {
        Self {
            stats: Arc::new(RwLock::new(ConnectionStats::default())),
            config,
        }
    }

    pub async fn record_request(&self, outcome: Outcome) {
        let mut stats = self.stats.write().await;
        stats.total_requests += 1;
        match outcome {
            Outcome::Success => {}
            Outcome::RateLimited => {
                stats.rate_limited_requests += 1;
                stats.failed_requests += 1;
            }
            Outcome::Retryable | Outcome::Failed => stats.failed_requests += 1,
        }
        stats.last_request = Some(Instant::now());
    }

    pub async fn record_token_fetch(&self) {
        self.stats.write().await.token_fetches += 1;
    }

    pub async fn get_stats(&self) -> ConnectionStats {
        self.stats.read().await.clone()
    }

    /// One reqwest client serves both the OAuth endpoint and the API
    pub fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("terraform-provider-zoom/", env!("CARGO_PKG_VERSION")))
            .timeout(self.config.request_timeout)
            .connect_timeout(self.config.connection_timeout)
            .pool_idle_timeout(self.config.idle_timeout)
            .pool_max_idle_per_host(self.config.max_idle_connections);

        if let Some(keepalive) = self.config.tcp_keepalive {
            builder = builder.tcp_keepalive(keepalive);
        }

        builder.build()
    }
}
