//! Concurrent retrieval of matched orbit files
//!
//! The dispatcher submits one task per [`RetrievalJob`] and keeps at most
//! `worker_count` of them in flight. Each task fetches the file once through
//! the [`OrbitSource`] and stores it with the [`StorageLayout`]. A failed job
//! is reported under its candidate name and counted, never retried, and
//! never stops the rest of the batch. A panicking task counts as a failure. [`RetrievalDispatcher::dispatch`] returns only once every task has
//! finished.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::app::client::OrbitSource;
use crate::app::layout::StorageLayout;
use crate::app::models::RetrievalJob;
use crate::app::observer::{RunEvent, RunObserver};
use crate::constants::workers;

pub mod stats;

pub use stats::DispatchStats;

use stats::DispatchCounters;

/// Bounded pool of retrieval tasks
pub struct RetrievalDispatcher {
    source: Arc<dyn OrbitSource>,
    layout: Arc<StorageLayout>,
    worker_count: usize,
    observer: Arc<dyn RunObserver>,
}

impl RetrievalDispatcher {
    /// Create a dispatcher
    ///
    /// `worker_count` is clamped to `1..=MAX_RETRIEVAL_WORKERS`.
    pub fn new(
        source: Arc<dyn OrbitSource>,
        layout: Arc<StorageLayout>,
        worker_count: usize,
        observer: Arc<dyn RunObserver>,
    ) -> Self {
        Self {
            source,
            layout,
            worker_count: worker_count.clamp(1, workers::MAX_RETRIEVAL_WORKERS),
            observer,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Retrieve every job and wait for the pool to drain
    pub async fn dispatch(&self, jobs: Vec<RetrievalJob>) -> DispatchStats {
        let counters = Arc::new(DispatchCounters::default());
        if jobs.is_empty() {
            return counters.snapshot();
        }

        self.observer.notify(RunEvent::DispatchStarted {
            jobs: jobs.len(),
            workers: self.worker_count,
        });

        let semaphore = Arc::new(Semaphore::new(self.worker_count));
        let mut tasks = JoinSet::new();

        for job in jobs {
            counters.record_submitted();

            let semaphore = semaphore.clone();
            let source = self.source.clone();
            let layout = self.layout.clone();
            let observer = self.observer.clone();
            let counters = counters.clone();

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        counters.record_failure();
                        observer.notify(RunEvent::RetrievalFailed {
                            candidate: job.candidate,
                            reason: e.to_string(),
                        });
                        return;
                    }
                };

                let outcome = AssertUnwindSafe(retrieve(source.as_ref(), &layout, &job))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| Err(panic_message(payload.as_ref())));

                match outcome {
                    Ok(path) => {
                        counters.record_success();
                        observer.notify(RunEvent::RetrievalSucceeded {
                            candidate: job.candidate,
                            path,
                        });
                    }
                    Err(reason) => {
                        counters.record_failure();
                        observer.notify(RunEvent::RetrievalFailed {
                            candidate: job.candidate,
                            reason,
                        });
                    }
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                counters.record_failure();
                self.observer.notify(RunEvent::RetrievalFailed {
                    candidate: "<retrieval task>".to_string(),
                    reason: e.to_string(),
                });
            }
        }

        counters.snapshot()
    }
}

/// Fetch once and store; the error is rendered for reporting only
async fn retrieve(
    source: &dyn OrbitSource,
    layout: &StorageLayout,
    job: &RetrievalJob,
) -> Result<std::path::PathBuf, String> {
    let bytes = source
        .fetch_orbit(&job.candidate)
        .await
        .map_err(|e| error_chain(&e))?;
    layout
        .persist(job, bytes)
        .await
        .map_err(|e| error_chain(&e))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("retrieval task panicked: {}", detail)
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests;
