//! Orbit Fetcher Library
//!
//! A Rust library for matching Sentinel-1 SLC acquisitions against the
//! validity windows of precise orbit files, and storing the matched files in
//! the layout SNAP or ISCE expects. Matching runs in parallel over chunks of
//! the catalog; retrieval runs in a bounded pool of async tasks.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(DEFAULT_RETRIEVAL_WORKERS, 10);
        assert_eq!(CHUNK_DIVISOR, 4);
        assert_eq!(DATE_FORMAT, "%Y%m%dT%H%M%S");
        assert!(USER_AGENT.contains("Orbit-Fetcher"));
        assert!(POEORB_URL.ends_with('/'));
    }

    #[test]
    fn test_error_types() {
        let catalog_error = errors::CatalogError::Status {
            url: POEORB_URL.to_string(),
            status: 503,
        };
        let app_error = AppError::Catalog(catalog_error);

        assert_eq!(app_error.category(), "catalog");
        assert!(app_error.to_string().contains("503"));
    }
}
