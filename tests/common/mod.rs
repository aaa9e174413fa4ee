//! Shared fixtures for integration tests
//!
//! An in-memory catalog standing in for the POEORB listing, and helpers that
//! lay out a data directory with empty SLC zips.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use orbit_fetcher::app::{Inventory, OrbitPass, OrbitSource};
use orbit_fetcher::errors::{CatalogResult, RetrievalError, RetrievalResult};

/// Catalog serving fixed entries; names in `missing` are listed but 404 on fetch
pub struct InMemoryCatalog {
    entries: Vec<String>,
    missing: Vec<String>,
    pub listings: AtomicUsize,
    pub fetches: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new(entries: &[&str]) -> Arc<Self> {
        Self::with_missing(entries, &[])
    }

    pub fn with_missing(entries: &[&str], missing: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            entries: entries.iter().map(|e| e.to_string()).collect(),
            missing: missing.iter().map(|e| e.to_string()).collect(),
            listings: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl OrbitSource for InMemoryCatalog {
    async fn list_candidates(&self) -> CatalogResult<Vec<String>> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.clone())
    }

    async fn fetch_orbit(&self, name: &str) -> RetrievalResult<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.missing.iter().any(|m| m == name) || !self.entries.iter().any(|e| e == name) {
            return Err(RetrievalError::Status {
                name: name.to_string(),
                status: 404,
            });
        }
        Ok(format!("<Earth_Explorer_File>{}</Earth_Explorer_File>", name).into_bytes())
    }
}

/// Orbit file name valid from `start` to `end` (`YYYYMMDDTHHMMSS`)
pub fn orbit_name(satellite: &str, start: &str, end: &str) -> String {
    format!(
        "{}_OPER_AUX_POEORB_OPOD_20210301T121545_V{}_{}.EOF",
        satellite, start, end
    )
}

/// SLC product name acquired at `stamp`
pub fn slc_name(satellite: &str, stamp: &str) -> String {
    format!(
        "{}_IW_SLC__1SDV_{}_{}_036075_043A1B_1C2D.zip",
        satellite, stamp, stamp
    )
}

/// Data directory with empty SLC zips for one orbit pass
pub fn inventory_with(root: &Path, pass: OrbitPass, slcs: &[String]) -> Inventory {
    let inventory = Inventory::new(root, pass);
    std::fs::create_dir_all(inventory.slc_directory()).unwrap();
    for slc in slcs {
        std::fs::write(inventory.slc_directory().join(slc), b"").unwrap();
    }
    inventory
}
