//! Run diagnostics
//!
//! Components report what happens during a run through a [`RunObserver`]
//! handed to them at construction. They never log through a global logger
//! directly, so tests can capture exactly what a component emitted with a
//! [`MemoryObserver`]. Production runs use [`TracingObserver`].

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, warn};

use crate::app::matcher::MatchMapping;

/// Something worth reporting during a run
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// Satellite prefixes found in the local inventory
    SatellitesFound { satellites: Vec<String> },
    /// Acquisition identifier dropped because no timestamp could be extracted
    AcquisitionSkipped { identifier: String, reason: String },
    /// Acquisitions extracted for a satellite
    AcquisitionsLoaded { satellite: String, count: usize },
    /// Catalog entries kept for a satellite
    CatalogListed { satellite: String, candidates: usize },
    /// Candidate dropped because its validity interval did not parse
    CandidateRejected { candidate: String, reason: String },
    /// One chunk finished matching
    ChunkMatched {
        chunk_index: usize,
        candidates: usize,
        matched: usize,
    },
    /// Global mapping for a satellite is ready
    MatchesReduced { satellite: String, mapping: MatchMapping },
    /// Nothing matched for a satellite
    NothingToDo { satellite: String },
    /// Retrieval batch submitted
    DispatchStarted { jobs: usize, workers: usize },
    /// Orbit file stored
    RetrievalSucceeded { candidate: String, path: PathBuf },
    /// Orbit file could not be fetched or stored
    RetrievalFailed { candidate: String, reason: String },
}

/// Receiver of run diagnostics
pub trait RunObserver: Send + Sync {
    fn notify(&self, event: RunEvent);
}

/// Observer that forwards every event to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    /// Shared handle suitable for passing to components
    pub fn shared() -> Arc<dyn RunObserver> {
        Arc::new(Self)
    }
}

impl RunObserver for TracingObserver {
    fn notify(&self, event: RunEvent) {
        match event {
            RunEvent::SatellitesFound { satellites } => {
                info!("Satellite names found: {:?}", satellites);
            }
            RunEvent::AcquisitionSkipped { identifier, reason } => {
                warn!("Skipping acquisition '{}': {}", identifier, reason);
            }
            RunEvent::AcquisitionsLoaded { satellite, count } => {
                info!("{}: {} acquisitions", satellite, count);
            }
            RunEvent::CatalogListed {
                satellite,
                candidates,
            } => {
                info!("{}: {} orbit files in catalog", satellite, candidates);
            }
            RunEvent::CandidateRejected { candidate, reason } => {
                error!("Error processing '{}': {}", candidate, reason);
            }
            RunEvent::ChunkMatched {
                chunk_index,
                candidates,
                matched,
            } => {
                debug!(
                    "Chunk {} matched {} of {} candidates",
                    chunk_index, matched, candidates
                );
            }
            RunEvent::MatchesReduced { satellite, mapping } => {
                info!(
                    "{}: matched {} orbit files with slc acquisition dates",
                    satellite,
                    mapping.len()
                );
                for (candidate, dates) in mapping.iter() {
                    debug!("  {} -> {:?}", candidate, dates);
                }
            }
            RunEvent::NothingToDo { satellite } => {
                info!("{}: no matching strings found", satellite);
            }
            RunEvent::DispatchStarted { jobs, workers } => {
                info!("Retrieving {} orbit files with {} workers", jobs, workers);
            }
            RunEvent::RetrievalSucceeded { candidate, path } => {
                info!("Stored {} at {}", candidate, path.display());
            }
            RunEvent::RetrievalFailed { candidate, reason } => {
                error!("Failed to retrieve {}: {}", candidate, reason);
            }
        }
    }
}

/// Observer that records every event in memory
#[derive(Debug, Default)]
pub struct MemoryObserver {
    events: Mutex<Vec<RunEvent>>,
}

impl MemoryObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of the events recorded so far
    pub fn events(&self) -> Vec<RunEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Count events matching a predicate
    pub fn count(&self, predicate: impl Fn(&RunEvent) -> bool) -> usize {
        self.events().iter().filter(|event| predicate(event)).count()
    }
}

impl RunObserver for MemoryObserver {
    fn notify(&self, event: RunEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
