//! Application constants for Orbit Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("Orbit-Fetcher/", env!("CARGO_PKG_VERSION"), " (InSAR Tool)");

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 10;

    /// Default rate limit for catalog requests (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 20;
}

/// Remote POEORB catalog
pub mod catalog {
    /// Directory listing of precise orbit ephemerides
    pub const POEORB_URL: &str = "https://s1qc.asf.alaska.edu/aux_poeorb/";

    /// CSS selector for catalog entries
    pub const ENTRY_SELECTOR: &str = "a[href]";
}

/// Satellite identification
pub mod satellites {
    /// Satellite prefixes looked for in the local SLC inventory
    pub const KNOWN: &[&str] = &["S1A", "S1B"];
}

/// Interval matching defaults
pub mod matching {
    /// Candidate list is split into `len / CHUNK_DIVISOR` sized chunks
    pub const CHUNK_DIVISOR: usize = 4;

    /// Trailing `_`-separated fields that carry the validity interval
    pub const VALIDITY_FIELDS: usize = 2;

    /// Fixed date-time format shared by acquisitions and orbit files
    pub const DATE_FORMAT: &str = "%Y%m%dT%H%M%S";

    /// Stamp a configured date format must read and write back unchanged
    pub const SAMPLE_STAMP: &str = "20210105T120000";

    /// Pattern for the `DATE8 T TIME6` acquisition stamp
    pub const ACQUISITION_PATTERN: &str = r"\d{8}T\d{6}";

    /// Leading marker on validity tokens (`V20210104T225942`)
    pub const VALIDITY_MARKER: char = 'V';

    /// Suffix carried by the last validity token
    pub const VALIDITY_SUFFIX: &str = ".EOF";

    /// Separator between candidate name fields
    pub const FIELD_SEPARATOR: char = '_';
}

/// Worker and concurrency configuration
pub mod workers {
    /// Default number of concurrent retrievals
    pub const DEFAULT_RETRIEVAL_WORKERS: usize = 10;

    /// Upper bound accepted for retrieval workers
    pub const MAX_RETRIEVAL_WORKERS: usize = 64;

    /// Fallback when the host parallelism cannot be queried
    pub const FALLBACK_MATCH_WORKERS: usize = 4;
}

/// File and directory layout constants
pub mod files {
    /// Temporary file suffix for atomic operations
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// Directory holding SLC zips under `<data>/<pass>/`
    pub const SLC_DIRNAME: &str = "slc";

    /// Directory holding ISCE orbit files under `<data>/<pass>/`
    pub const ISCE_ORBITS_DIRNAME: &str = "orbits";

    /// SNAP auxdata path relative to the home directory
    pub const SNAP_POEORB_SUBDIR: &str = ".snap/auxdata/Orbits/Sentinel-1/POEORB";

    /// Glob pattern for SLC acquisitions
    pub const SLC_GLOB: &str = "*.zip";

    /// Extension appended to SNAP archives
    pub const ZIP_EXTENSION: &str = "zip";

    /// Default log file name when file logging is enabled
    pub const LOG_FILE_NAME: &str = "orbit_fetcher.log";
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file
    pub const LOCAL_FILE: &str = "orbit-fetcher.toml";

    /// Directory under the user config dir
    pub const APP_DIR: &str = "orbit-fetcher";

    /// File name under the user config dir
    pub const FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants for convenience
pub use catalog::POEORB_URL;
pub use http::{DEFAULT_RATE_LIMIT_RPS, USER_AGENT};
pub use matching::{CHUNK_DIVISOR, DATE_FORMAT, VALIDITY_FIELDS};
pub use workers::DEFAULT_RETRIEVAL_WORKERS;
