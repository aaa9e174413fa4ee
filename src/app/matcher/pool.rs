//! Parallel compute pool for interval matching
//!
//! Chunks are CPU-bound and independent, so each runs on the blocking thread
//! pool with its own copy of the chunk and read-only access to the
//! acquisitions and encoding. A semaphore bounds how many chunks run at once.
//! Reduction starts only after every chunk has returned.
//!
//! This pool is used only for matching; retrievals go through the I/O-bound
//! [`RetrievalDispatcher`](crate::app::dispatcher::RetrievalDispatcher).

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::debug;

use super::chunk::match_chunk;
use super::interval::ValidityEncoding;
use super::partition::partition;
use super::reduce::{reduce, MatchMapping};
use crate::app::models::AcquisitionTimestamp;
use crate::app::observer::{RunEvent, RunObserver};
use crate::errors::{MatchError, MatchResult};

/// Bounded pool evaluating candidate chunks in parallel
#[derive(Debug, Clone)]
pub struct MatchPool {
    max_parallel: usize,
}

impl MatchPool {
    /// Create a pool running at most `max_parallel` chunks at once
    pub fn new(max_parallel: usize) -> Self {
        Self {
            max_parallel: max_parallel.max(1),
        }
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    /// Partition `candidates`, match every chunk in parallel and reduce
    ///
    /// The result is identical to matching the undivided list sequentially.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::WorkerPanicked` if a chunk task does not complete.
    pub async fn run(
        &self,
        candidates: &[String],
        acquisitions: &[AcquisitionTimestamp],
        encoding: &ValidityEncoding,
        divisor: usize,
        observer: Arc<dyn RunObserver>,
    ) -> MatchResult<MatchMapping> {
        let chunks = partition(candidates, divisor);
        if chunks.is_empty() {
            debug!("No candidates to match");
            return Ok(MatchMapping::new());
        }

        debug!(
            "Matching {} candidates in {} chunks ({} in parallel)",
            candidates.len(),
            chunks.len(),
            self.max_parallel
        );

        let acquisitions: Arc<[AcquisitionTimestamp]> = Arc::from(acquisitions);
        let encoding = Arc::new(encoding.clone());
        let limiter = Arc::new(Semaphore::new(self.max_parallel));

        let mut handles = Vec::with_capacity(chunks.len());
        for (chunk_index, chunk) in chunks.into_iter().enumerate() {
            let permit = limiter
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| MatchError::PoolClosed)?;

            let chunk = chunk.to_vec();
            let acquisitions = Arc::clone(&acquisitions);
            let encoding = Arc::clone(&encoding);
            let observer = Arc::clone(&observer);

            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let mapping = match_chunk(&chunk, &acquisitions, &encoding, observer.as_ref());
                observer.notify(RunEvent::ChunkMatched {
                    chunk_index,
                    candidates: chunk.len(),
                    matched: mapping.len(),
                });
                mapping
            }));
        }

        let mut mappings = Vec::with_capacity(handles.len());
        for (chunk_index, result) in join_all(handles).await.into_iter().enumerate() {
            let mapping = result.map_err(|e| MatchError::WorkerPanicked {
                chunk_index,
                reason: e.to_string(),
            })?;
            mappings.push(mapping);
        }

        Ok(reduce(mappings))
    }
}
