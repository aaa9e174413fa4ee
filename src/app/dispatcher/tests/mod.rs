//! Dispatcher tests against an in-memory orbit source

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use super::*;
use crate::app::models::ProcessorMode;
use crate::app::observer::MemoryObserver;
use crate::errors::{CatalogResult, RetrievalError, RetrievalResult};

/// Serves fixed bytes per name and 404 for anything else
#[derive(Default)]
struct FakeSource {
    files: HashMap<String, Vec<u8>>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    fetches: AtomicUsize,
    panics_on: Option<String>,
}

impl FakeSource {
    fn with_files(names: &[&str]) -> Self {
        Self {
            files: names
                .iter()
                .map(|name| (name.to_string(), name.as_bytes().to_vec()))
                .collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl OrbitSource for FakeSource {
    async fn list_candidates(&self) -> CatalogResult<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }

    async fn fetch_orbit(&self, name: &str) -> RetrievalResult<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.panics_on.as_deref() == Some(name) {
            panic!("corrupt listing entry {}", name);
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| RetrievalError::Status {
                name: name.to_string(),
                status: 404,
            })
    }
}

fn eof(day: u32) -> String {
    format!(
        "S1A_OPER_AUX_POEORB_OPOD_202101{:02}T121545_V202101{:02}T225942_202101{:02}T005942.EOF",
        day + 20,
        day,
        day + 2
    )
}

fn isce_layout(root: &Path) -> Arc<StorageLayout> {
    Arc::new(StorageLayout::new(
        ProcessorMode::Isce,
        root.join("snap"),
        root.join("ascending/orbits"),
    ))
}

#[tokio::test]
async fn test_dispatch_stores_every_job() {
    let temp_dir = TempDir::new().unwrap();
    let names: Vec<String> = (1..=5).map(eof).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let source = Arc::new(FakeSource::with_files(&refs));
    let observer = MemoryObserver::new();

    let dispatcher = RetrievalDispatcher::new(
        source.clone(),
        isce_layout(temp_dir.path()),
        2,
        observer.clone(),
    );
    let jobs = names
        .iter()
        .map(|name| RetrievalJob::new(name.clone(), "20210105T120000"))
        .collect();

    let stats = dispatcher.dispatch(jobs).await;

    assert_eq!(
        stats,
        DispatchStats {
            submitted: 5,
            succeeded: 5,
            failed: 0
        }
    );
    for name in &names {
        let stored = temp_dir.path().join("ascending/orbits").join(name);
        assert_eq!(std::fs::read(stored).unwrap(), name.as_bytes());
    }
    assert_eq!(
        observer.count(|e| matches!(e, RunEvent::RetrievalSucceeded { .. })),
        5
    );
}

#[tokio::test]
async fn test_failed_job_does_not_stop_batch() {
    let temp_dir = TempDir::new().unwrap();
    let present = eof(4);
    let missing = eof(9);
    let source = Arc::new(FakeSource::with_files(&[present.as_str()]));
    let observer = MemoryObserver::new();

    let dispatcher =
        RetrievalDispatcher::new(source.clone(), isce_layout(temp_dir.path()), 4, observer.clone());
    let stats = dispatcher
        .dispatch(vec![
            RetrievalJob::new(missing.clone(), "20210110T120000"),
            RetrievalJob::new(present.clone(), "20210105T120000"),
        ])
        .await;

    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.failed, 1);
    assert!(stats.is_complete());
    // one attempt each, no retry
    assert_eq!(source.fetches.load(Ordering::SeqCst), 2);

    let failures: Vec<_> = observer
        .events()
        .into_iter()
        .filter_map(|e| match e {
            RunEvent::RetrievalFailed { candidate, reason } => Some((candidate, reason)),
            _ => None,
        })
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, missing);
    assert!(failures[0].1.contains("404"));
}

#[tokio::test]
async fn test_worker_count_bounds_in_flight() {
    let temp_dir = TempDir::new().unwrap();
    let names: Vec<String> = (1..=8).map(eof).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let source = Arc::new(FakeSource {
        delay: Duration::from_millis(20),
        ..FakeSource::with_files(&refs)
    });

    let dispatcher = RetrievalDispatcher::new(
        source.clone(),
        isce_layout(temp_dir.path()),
        3,
        MemoryObserver::new(),
    );
    let jobs = names
        .iter()
        .map(|name| RetrievalJob::new(name.clone(), "20210105T120000"))
        .collect();
    let stats = dispatcher.dispatch(jobs).await;

    assert_eq!(stats.succeeded, 8);
    let peak = source.peak.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= 3, "peak in-flight was {}", peak);
}

#[tokio::test]
async fn test_layout_error_is_a_failure() {
    let temp_dir = TempDir::new().unwrap();
    let name = eof(4);
    let source = Arc::new(FakeSource::with_files(&[name.as_str()]));
    let layout = Arc::new(StorageLayout::new(
        ProcessorMode::Snap,
        temp_dir.path().join("snap"),
        temp_dir.path().join("orbits"),
    ));
    let observer = MemoryObserver::new();

    let dispatcher = RetrievalDispatcher::new(source, layout, 1, observer.clone());
    let stats = dispatcher
        .dispatch(vec![RetrievalJob::new(name, "not-a-date")])
        .await;

    assert_eq!(stats.failed, 1);
    assert_eq!(
        observer.count(|e| matches!(e, RunEvent::RetrievalFailed { .. })),
        1
    );
}

#[tokio::test]
async fn test_empty_batch() {
    let temp_dir = TempDir::new().unwrap();
    let observer = MemoryObserver::new();
    let dispatcher = RetrievalDispatcher::new(
        Arc::new(FakeSource::default()),
        isce_layout(temp_dir.path()),
        0,
        observer.clone(),
    );

    assert_eq!(dispatcher.worker_count(), 1);
    assert_eq!(dispatcher.dispatch(Vec::new()).await, DispatchStats::default());
    assert!(observer.events().is_empty());
}

#[tokio::test]
async fn test_panicking_job_reported_by_name() {
    let temp_dir = TempDir::new().unwrap();
    let (good, bad) = (eof(1), eof(2));
    let source = Arc::new(FakeSource {
        panics_on: Some(bad.clone()),
        ..FakeSource::with_files(&[good.as_str(), bad.as_str()])
    });
    let observer = MemoryObserver::new();

    let dispatcher =
        RetrievalDispatcher::new(source, isce_layout(temp_dir.path()), 2, observer.clone());
    let stats = dispatcher
        .dispatch(vec![
            RetrievalJob::new(good.clone(), "20210102T120000"),
            RetrievalJob::new(bad.clone(), "20210103T120000"),
        ])
        .await;

    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.failed, 1);
    assert!(stats.is_complete());
    assert_eq!(
        observer.count(|e| matches!(
            e,
            RunEvent::RetrievalFailed { candidate, reason }
                if candidate == &bad && reason.contains("corrupt listing entry")
        )),
        1
    );
}
