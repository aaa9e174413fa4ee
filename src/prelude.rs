//! Prelude module for Orbit Fetcher Library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use orbit_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use orbit_fetcher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let source = Arc::new(OrbitClient::new()?);
//!     let sync = OrbitSync::new(SyncSettings::default(), source, TracingObserver::shared());
//!
//!     let inventory = Inventory::new("/data/insar", OrbitPass::Descending);
//!     let report = sync.run(&inventory, ProcessorMode::Isce).await?;
//!     println!("{} orbit files matched", report.total_matched());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Essential app components that are used in most integrations
pub use crate::app::{
    // Matching core
    AcquisitionTimestamp,
    MatchMapping,
    MatchSettings,
    TimestampExtractor,
    ValidityEncoding,
    ValidityInterval,

    // Collaborators
    ClientConfig,
    Inventory,
    OrbitClient,
    OrbitSource,
    StorageConfig,
    StorageLayout,

    // Orchestration
    DispatchStats,
    OrbitSync,
    RetrievalDispatcher,
    RunReport,
    SyncSettings,

    // Selection and diagnostics
    MemoryObserver,
    OrbitPass,
    ProcessorMode,
    RetrievalJob,
    RunEvent,
    RunObserver,
    TracingObserver,
};

// Configuration
pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{
    CHUNK_DIVISOR, DATE_FORMAT, DEFAULT_RATE_LIMIT_RPS, DEFAULT_RETRIEVAL_WORKERS, POEORB_URL,
    USER_AGENT,
};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

// Common external crate re-exports for convenience
pub use tokio;
