//! Connection settings shared by catalog listing and orbit downloads

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::{catalog, http};
use crate::errors::{CatalogError, CatalogResult};

/// Where the catalog lives and how connections to it behave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub catalog_url: String,
    pub tcp_keepalive: Option<Duration>,
    pub tcp_nodelay: bool,
    /// Idle pooled connections are closed after this long
    pub pool_idle_timeout: Option<Duration>,
    pub pool_max_per_host: usize,
    /// Whole-request limit; an orbit file is a few MB
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Shared across listing and every retrieval worker
    pub rate_limit_rps: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            catalog_url: catalog::POEORB_URL.to_string(),
            tcp_keepalive: Some(Duration::from_secs(30)),
            tcp_nodelay: true,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            rate_limit_rps: http::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

impl ClientConfig {
    /// One pooled client reused for the listing and all downloads
    pub fn build_http_client(&self) -> CatalogResult<Client> {
        Client::builder()
            .user_agent(http::USER_AGENT)
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .tcp_nodelay(self.tcp_nodelay)
            .tcp_keepalive(self.tcp_keepalive)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_per_host)
            .build()
            .map_err(CatalogError::Http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_poeorb_catalog() {
        let config = ClientConfig::default();
        assert_eq!(config.catalog_url, catalog::POEORB_URL);
        assert!(config.catalog_url.ends_with("/aux_poeorb/"));
    }

    #[test]
    fn test_client_builds_without_pool_limits() {
        let config = ClientConfig {
            tcp_keepalive: None,
            pool_idle_timeout: None,
            ..Default::default()
        };
        assert!(config.build_http_client().is_ok());
    }
}
