//! Coordinator tests with an in-memory catalog

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tempfile::TempDir;

use super::*;
use crate::app::dispatcher::DispatchStats;
use crate::app::layout::StorageConfig;
use crate::app::models::OrbitPass;
use crate::app::observer::MemoryObserver;
use crate::errors::{AppError, CatalogError, CatalogResult, RetrievalError, RetrievalResult};

const S1A_JAN04: &str =
    "S1A_OPER_AUX_POEORB_OPOD_20210125T121545_V20210104T225942_20210106T005942.EOF";
const S1A_JAN09: &str =
    "S1A_OPER_AUX_POEORB_OPOD_20210129T121545_V20210109T225942_20210111T005942.EOF";
const S1A_FEB: &str =
    "S1A_OPER_AUX_POEORB_OPOD_20210221T121545_V20210201T225942_20210203T005942.EOF";
const S1B_JAN04: &str =
    "S1B_OPER_AUX_POEORB_OPOD_20210125T111234_V20210104T225942_20210106T005942.EOF";

struct CatalogFake {
    entries: Option<Vec<String>>,
    bytes: HashMap<String, Vec<u8>>,
}

impl CatalogFake {
    fn new(entries: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            entries: Some(entries.iter().map(|e| e.to_string()).collect()),
            bytes: entries
                .iter()
                .map(|e| (e.to_string(), b"orbit".to_vec()))
                .collect(),
        })
    }

    fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            entries: None,
            bytes: HashMap::new(),
        })
    }
}

#[async_trait]
impl OrbitSource for CatalogFake {
    async fn list_candidates(&self) -> CatalogResult<Vec<String>> {
        self.entries.clone().ok_or_else(|| CatalogError::Status {
            url: "memory://catalog/".to_string(),
            status: 503,
        })
    }

    async fn fetch_orbit(&self, name: &str) -> RetrievalResult<Vec<u8>> {
        self.bytes
            .get(name)
            .cloned()
            .ok_or_else(|| RetrievalError::Status {
                name: name.to_string(),
                status: 404,
            })
    }
}

fn inventory(root: &Path, slcs: &[&str]) -> Inventory {
    let inventory = Inventory::new(root, OrbitPass::Ascending);
    std::fs::create_dir_all(inventory.slc_directory()).unwrap();
    for slc in slcs {
        std::fs::write(inventory.slc_directory().join(slc), b"").unwrap();
    }
    inventory
}

fn settings(root: &Path) -> SyncSettings {
    SyncSettings {
        storage: StorageConfig {
            snap_root: Some(root.join("snap")),
        },
        ..SyncSettings::default()
    }
}

#[tokio::test]
async fn test_run_matches_and_retrieves() {
    let temp_dir = TempDir::new().unwrap();
    let inventory = inventory(
        temp_dir.path(),
        &["S1A_IW_SLC__1SDV_20210105T120000_20210105T120027_036000_043000_ABCD.zip"],
    );
    let observer = MemoryObserver::new();
    let sync = OrbitSync::new(
        settings(temp_dir.path()),
        CatalogFake::new(&[S1A_JAN04, S1A_FEB, S1B_JAN04]),
        observer.clone(),
    );

    let report = sync.run(&inventory, ProcessorMode::Isce).await.unwrap();

    assert_eq!(report.satellites.len(), 1);
    let s1a = report.satellite("S1A").unwrap();
    assert_eq!(s1a.acquisitions, 1);
    assert_eq!(s1a.candidates, 2);
    assert_eq!(s1a.mapping.get(S1A_JAN04), Some(&["20210105T120000".to_string()][..]));
    assert_eq!(s1a.dispatch.unwrap().succeeded, 1);

    let stored = temp_dir.path().join("ascending/orbits").join(S1A_JAN04);
    assert_eq!(std::fs::read(stored).unwrap(), b"orbit");
}

#[tokio::test]
async fn test_nothing_to_do_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let inventory = inventory(
        temp_dir.path(),
        &["S1A_IW_SLC__1SDV_20210301T120000_20210301T120027_036000_043000_ABCD.zip"],
    );
    let observer = MemoryObserver::new();
    let sync = OrbitSync::new(
        settings(temp_dir.path()),
        CatalogFake::new(&[S1A_JAN04, S1A_JAN09]),
        observer.clone(),
    );

    let report = sync.run(&inventory, ProcessorMode::Snap).await.unwrap();

    let s1a = report.satellite("S1A").unwrap();
    assert!(s1a.mapping.is_empty());
    assert!(s1a.dispatch.is_none());
    assert_eq!(
        observer.count(|e| matches!(e, RunEvent::NothingToDo { .. })),
        1
    );
    assert_eq!(
        observer.count(|e| matches!(e, RunEvent::DispatchStarted { .. })),
        0
    );
}

#[tokio::test]
async fn test_no_satellites_stops_before_listing() {
    let temp_dir = TempDir::new().unwrap();
    let inventory = inventory(temp_dir.path(), &["unrelated.zip"]);
    let observer = MemoryObserver::new();
    let sync = OrbitSync::new(
        settings(temp_dir.path()),
        CatalogFake::unreachable(),
        observer.clone(),
    );

    let err = sync.run(&inventory, ProcessorMode::Snap).await.unwrap_err();

    assert!(matches!(err, AppError::Inventory(_)));
    assert!(observer.events().is_empty());
}

#[tokio::test]
async fn test_listing_failure_aborts_run() {
    let temp_dir = TempDir::new().unwrap();
    let inventory = inventory(
        temp_dir.path(),
        &["S1A_IW_SLC__1SDV_20210105T120000_20210105T120027_036000_043000_ABCD.zip"],
    );
    let sync = OrbitSync::new(
        settings(temp_dir.path()),
        CatalogFake::unreachable(),
        MemoryObserver::new(),
    );

    let err = sync.run(&inventory, ProcessorMode::Snap).await.unwrap_err();
    assert_eq!(err.category(), "catalog");
}

#[tokio::test]
async fn test_dry_run_retrieves_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let inventory = inventory(
        temp_dir.path(),
        &[
            "S1A_IW_SLC__1SDV_20210105T120000_20210105T120027_036000_043000_ABCD.zip",
            "S1B_IW_SLC__1SDV_20210105T120000_20210105T120027_025000_030000_AAAA.zip",
        ],
    );
    let observer = MemoryObserver::new();
    let sync = OrbitSync::new(
        settings(temp_dir.path()).with_dry_run(true),
        CatalogFake::new(&[S1A_JAN04, S1B_JAN04]),
        observer.clone(),
    );

    let report = sync.run(&inventory, ProcessorMode::Snap).await.unwrap();

    assert_eq!(report.total_matched(), 2);
    assert_eq!(report.total_dispatch(), DispatchStats::default());
    assert!(!temp_dir.path().join("snap").exists());
    assert_eq!(
        observer.count(|e| matches!(e, RunEvent::MatchesReduced { .. })),
        2
    );
}
