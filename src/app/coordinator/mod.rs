//! Run orchestration from local inventory to stored orbit files
//!
//! [`OrbitSync`] drives one run:
//!
//! 1. find the satellites present in the SLC inventory
//! 2. list the remote catalog, once
//! 3. per satellite, extract acquisition timestamps, keep that satellite's
//!    candidates, and run the match pool
//! 4. dispatch the matched candidates for retrieval
//!
//! A missing inventory or an unreachable catalog ends the run. Everything
//! after that is reported per item through the observer.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use orbit_fetcher::app::{
//!     Inventory, OrbitClient, OrbitPass, OrbitSync, ProcessorMode, SyncSettings, TracingObserver,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Arc::new(OrbitClient::new()?);
//! let sync = OrbitSync::new(SyncSettings::default(), source, TracingObserver::shared());
//!
//! let inventory = Inventory::new("/data/insar", OrbitPass::Ascending);
//! let report = sync.run(&inventory, ProcessorMode::Snap).await?;
//! println!("Matched {} orbit files", report.total_matched());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod report;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::app::client::{filter_candidates, OrbitSource};
use crate::app::dispatcher::RetrievalDispatcher;
use crate::app::extract::TimestampExtractor;
use crate::app::inventory::Inventory;
use crate::app::layout::StorageLayout;
use crate::app::models::ProcessorMode;
use crate::app::observer::{RunEvent, RunObserver};
use crate::errors::Result;

pub use config::SyncSettings;
pub use report::{RunReport, SatelliteReport};

/// Coordinates matching and retrieval for one inventory
pub struct OrbitSync {
    settings: SyncSettings,
    source: Arc<dyn OrbitSource>,
    observer: Arc<dyn RunObserver>,
    extractor: TimestampExtractor,
}

impl OrbitSync {
    pub fn new(
        settings: SyncSettings,
        source: Arc<dyn OrbitSource>,
        observer: Arc<dyn RunObserver>,
    ) -> Self {
        let extractor = TimestampExtractor::new(settings.matching.encoding.date_format.clone());
        Self {
            settings,
            source,
            observer,
            extractor,
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Match every satellite in `inventory` and retrieve what matched
    ///
    /// # Errors
    ///
    /// Returns an error when no known satellite is in the inventory, when the
    /// catalog cannot be listed, when the storage root cannot be resolved, or
    /// when the match pool itself fails. Individual retrieval failures are
    /// counted in the report instead.
    pub async fn run(&self, inventory: &Inventory, mode: ProcessorMode) -> Result<RunReport> {
        let satellites = inventory.satellites(&self.settings.known_satellites)?;
        self.observer.notify(RunEvent::SatellitesFound {
            satellites: satellites.clone(),
        });

        let entries = self.source.list_candidates().await?;

        let dispatcher = if self.settings.dry_run {
            None
        } else {
            let layout = StorageLayout::for_inventory(mode, &self.settings.storage, inventory)?;
            Some(RetrievalDispatcher::new(
                self.source.clone(),
                Arc::new(layout),
                self.settings.retrieval_workers,
                self.observer.clone(),
            ))
        };

        let mut report = RunReport::default();
        for satellite in satellites {
            let identifiers = inventory.acquisition_ids(&satellite)?;
            let acquisitions = self
                .extractor
                .extract_all(&identifiers, self.observer.as_ref());
            self.observer.notify(RunEvent::AcquisitionsLoaded {
                satellite: satellite.clone(),
                count: acquisitions.len(),
            });

            let candidates = filter_candidates(
                &entries,
                &satellite,
                &self.settings.matching.encoding.suffix,
                self.observer.as_ref(),
            );
            self.observer.notify(RunEvent::CatalogListed {
                satellite: satellite.clone(),
                candidates: candidates.len(),
            });

            let mapping = self
                .settings
                .matching
                .run(&candidates, &acquisitions, self.observer.clone())
                .await?;

            let dispatch = if mapping.is_empty() {
                self.observer.notify(RunEvent::NothingToDo {
                    satellite: satellite.clone(),
                });
                None
            } else {
                self.observer.notify(RunEvent::MatchesReduced {
                    satellite: satellite.clone(),
                    mapping: mapping.clone(),
                });
                match &dispatcher {
                    Some(dispatcher) => Some(dispatcher.dispatch(mapping.retrieval_jobs()).await),
                    None => None,
                }
            };

            report.satellites.push(SatelliteReport {
                satellite,
                acquisitions: acquisitions.len(),
                candidates: candidates.len(),
                mapping,
                dispatch,
            });
        }

        Ok(report)
    }
}
