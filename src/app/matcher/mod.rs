//! Temporal interval matching of orbit files against acquisitions
//!
//! The module is organized into specialized components:
//! - `partition`: contiguous chunking of the candidate list
//! - `interval`: decoding validity windows from candidate names
//! - `chunk`: matching one chunk against all acquisitions
//! - `reduce`: the [`MatchMapping`] type and chunk-order reduction
//! - `pool`: the parallel compute pool driving the chunks

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::app::models::AcquisitionTimestamp;
use crate::app::observer::RunObserver;
use crate::constants::{matching, workers};
use crate::errors::MatchResult;

pub mod chunk;
pub mod interval;
pub mod partition;
pub mod pool;
pub mod reduce;

#[cfg(test)]
mod tests;

pub use chunk::match_chunk;
pub use interval::{ValidityEncoding, ValidityInterval};
pub use partition::{chunk_size, partition};
pub use pool::MatchPool;
pub use reduce::{reduce, MatchMapping};

/// Runtime settings for the matching stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Candidate list is cut into `len / chunk_divisor` sized chunks
    pub chunk_divisor: usize,
    /// Chunks evaluated at once
    pub match_workers: usize,
    /// Validity window encoding of candidate names
    pub encoding: ValidityEncoding,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            chunk_divisor: matching::CHUNK_DIVISOR,
            match_workers: default_match_workers(),
            encoding: ValidityEncoding::default(),
        }
    }
}

impl MatchSettings {
    /// Run the parallel pool with these settings
    pub async fn run(
        &self,
        candidates: &[String],
        acquisitions: &[AcquisitionTimestamp],
        observer: Arc<dyn RunObserver>,
    ) -> MatchResult<MatchMapping> {
        MatchPool::new(self.match_workers)
            .run(
                candidates,
                acquisitions,
                &self.encoding,
                self.chunk_divisor,
                observer,
            )
            .await
    }
}

/// Match the undivided candidate list on the calling thread
pub fn match_sequential(
    candidates: &[String],
    acquisitions: &[AcquisitionTimestamp],
    encoding: &ValidityEncoding,
    observer: &dyn RunObserver,
) -> MatchMapping {
    match_chunk(candidates, acquisitions, encoding, observer)
}

/// Host parallelism, used as the default match worker count
pub fn default_match_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(workers::FALLBACK_MATCH_WORKERS)
}
