//! Settings for a full synchronisation run

use serde::{Deserialize, Serialize};

use crate::app::layout::StorageConfig;
use crate::app::matcher::MatchSettings;
use crate::constants::{satellites, workers};

/// Everything [`super::OrbitSync`] needs besides its collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Matching stage settings
    pub matching: MatchSettings,
    /// Retrievals in flight at once
    pub retrieval_workers: usize,
    /// Storage roots
    pub storage: StorageConfig,
    /// Satellite prefixes looked for in the inventory
    pub known_satellites: Vec<String>,
    /// Match and report, but retrieve nothing
    pub dry_run: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            matching: MatchSettings::default(),
            retrieval_workers: workers::DEFAULT_RETRIEVAL_WORKERS,
            storage: StorageConfig::default(),
            known_satellites: satellites::KNOWN.iter().map(|s| s.to_string()).collect(),
            dry_run: false,
        }
    }
}

impl SyncSettings {
    /// Override the number of retrieval workers
    pub fn with_retrieval_workers(mut self, count: usize) -> Self {
        self.retrieval_workers = count;
        self
    }

    /// Override the candidate chunk divisor
    pub fn with_chunk_divisor(mut self, divisor: usize) -> Self {
        self.matching.chunk_divisor = divisor;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
