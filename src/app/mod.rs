//! Core application logic for Orbit Fetcher
//!
//! The matching core (timestamp extraction, partitioning, interval matching and
//! reduction) is pure and synchronous apart from the pool that parallelises it.
//! Around it sit the local SLC inventory, the remote catalog client, the
//! processor storage layouts, the retrieval dispatcher and the coordinator
//! tying a run together.
//!
//! # Examples
//!
//! ```rust
//! use orbit_fetcher::app::{MemoryObserver, TimestampExtractor};
//!
//! let extractor = TimestampExtractor::default();
//! let observer = MemoryObserver::new();
//! let acquisitions = extractor.extract_all(
//!     ["S1A_IW_SLC__1SDV_20210110T120000_20210110T120027_036075_043A1B_1C2D.zip"],
//!     observer.as_ref(),
//! );
//! assert_eq!(acquisitions[0].to_string(), "20210110T120000");
//! ```

pub mod client;
pub mod coordinator;
pub mod dispatcher;
pub mod extract;
pub mod inventory;
pub mod layout;
pub mod matcher;
pub mod models;
pub mod observer;

// Re-export main public API
pub use client::{ClientConfig, OrbitClient, OrbitSource};
pub use coordinator::{OrbitSync, RunReport, SatelliteReport, SyncSettings};
pub use dispatcher::{DispatchStats, RetrievalDispatcher};
pub use extract::TimestampExtractor;
pub use inventory::Inventory;
pub use layout::{StorageConfig, StorageLayout};
pub use matcher::{
    match_chunk, partition, reduce, MatchMapping, MatchPool, MatchSettings, ValidityEncoding,
    ValidityInterval,
};
pub use models::{AcquisitionTimestamp, OrbitPass, ProcessorMode, RetrievalJob};
pub use observer::{MemoryObserver, RunEvent, RunObserver, TracingObserver};
