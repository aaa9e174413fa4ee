//! HTTP access to the remote orbit catalog
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: rate-limited single-attempt requests
//! - `listing`: parsing the catalog's HTML directory index
//!
//! The rest of the application only sees the [`OrbitSource`] trait, so the
//! catalog can be replaced by an in-memory source in tests.

use async_trait::async_trait;
use url::Url;

use crate::errors::{CatalogError, CatalogResult, RetrievalError, RetrievalResult};

pub mod config;
pub mod http;
pub mod listing;

pub use config::ClientConfig;
pub use listing::{filter_candidates, parse_listing};

use http::HttpHandler;

/// Remote collaborator supplying the candidate list and orbit file bytes
#[async_trait]
pub trait OrbitSource: Send + Sync {
    /// Every entry name in the catalog, in listing order
    async fn list_candidates(&self) -> CatalogResult<Vec<String>>;

    /// Bytes of one orbit file; a single attempt
    async fn fetch_orbit(&self, name: &str) -> RetrievalResult<Vec<u8>>;
}

/// HTTP client for the POEORB catalog
#[derive(Debug)]
pub struct OrbitClient {
    http_handler: HttpHandler,
    catalog_url: Url,
}

impl OrbitClient {
    /// Creates a client for the default catalog
    pub fn new() -> CatalogResult<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Creates a client with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidUrl` if the catalog URL does not parse and
    /// `CatalogError::Http` if the HTTP client cannot be built.
    pub fn with_config(config: &ClientConfig) -> CatalogResult<Self> {
        let catalog_url = parse_catalog_url(&config.catalog_url)?;
        let client = config.build_http_client()?;
        let http_handler = HttpHandler::new(client, config.rate_limit_rps);

        tracing::debug!("Created orbit client for {}", catalog_url);

        Ok(Self {
            http_handler,
            catalog_url,
        })
    }

    /// URL of the catalog listing
    pub fn catalog_url(&self) -> &Url {
        &self.catalog_url
    }

    /// URL of one orbit file in the catalog
    pub fn orbit_url(&self, name: &str) -> RetrievalResult<Url> {
        self.catalog_url
            .join(name)
            .map_err(|e| RetrievalError::InvalidUrl {
                name: name.to_string(),
                error: e.to_string(),
            })
    }
}

#[async_trait]
impl OrbitSource for OrbitClient {
    async fn list_candidates(&self) -> CatalogResult<Vec<String>> {
        let response = self.http_handler.get(&self.catalog_url).await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status {
                url: self.catalog_url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let html = response.text().await?;
        let entries = parse_listing(&html)?;
        tracing::info!("Catalog lists {} entries", entries.len());
        Ok(entries)
    }

    async fn fetch_orbit(&self, name: &str) -> RetrievalResult<Vec<u8>> {
        let url = self.orbit_url(name)?;
        let response = self.http_handler.get(&url).await?;
        if !response.status().is_success() {
            return Err(RetrievalError::Status {
                name: name.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Parse a catalog URL, making sure it joins as a directory
pub fn parse_catalog_url(raw: &str) -> CatalogResult<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).map_err(|e| CatalogError::InvalidUrl {
        url: raw.to_string(),
        error: e.to_string(),
    })
}
