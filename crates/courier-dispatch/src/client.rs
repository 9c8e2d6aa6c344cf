//! HTTP client configuration.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Transport configuration for a [`Dispatcher`](crate::Dispatcher).
///
/// One client is built from this at construction and shared for the life of
/// the dispatcher, so connections are reused across requests.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Request timeout.
    pub request_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// Enable gzip decompression.
    pub gzip: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            user_agent: format!("courier/{}", env!("CARGO_PKG_VERSION")),
            pool_max_idle_per_host: 10,
            gzip: true,
        }
    }
}

/// Build a configured HTTP client.
pub fn build_client(config: DispatchConfig) -> Result<Client, DispatchError> {
    let mut builder = ClientBuilder::new()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(&config.user_agent)
        .pool_max_idle_per_host(config.pool_max_idle_per_host);

    if config.gzip {
        builder = builder.gzip(true);
    }

    builder.build().map_err(DispatchError::ClientBuild)
}

/// Dispatcher construction errors.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}
