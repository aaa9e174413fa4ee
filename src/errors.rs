//! Error types for Orbit Fetcher
//!
//! Each concern gets its own error enum. Most failures in the matching core are
//! local to one identifier or candidate and are reported through the run
//! observer instead of being propagated; only listing, inventory and
//! configuration failures end a run.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to pull a timestamp out of an acquisition identifier
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No `DATE8 T TIME6` substring in the identifier
    #[error("No acquisition timestamp found in '{identifier}'")]
    NotFound { identifier: String },

    /// The substring matched but is not a valid date-time
    #[error("Invalid acquisition timestamp '{text}' in '{identifier}'")]
    InvalidTimestamp {
        identifier: String,
        text: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Failure to decode a candidate's validity interval
#[derive(Error, Debug)]
pub enum IntervalParseError {
    /// Not enough trailing fields to hold a start and an end
    #[error("Candidate '{candidate}' has {found} validity fields, {required} required")]
    MissingFields {
        candidate: String,
        found: usize,
        required: usize,
    },

    /// A validity token is not a timestamp in the fixed format
    #[error("Candidate '{candidate}' has invalid validity token '{token}'")]
    InvalidTimestamp {
        candidate: String,
        token: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Failures of the parallel matching pool itself
#[derive(Error, Debug)]
pub enum MatchError {
    /// A chunk task panicked or was cancelled
    #[error("Matching task for chunk {chunk_index} did not complete: {reason}")]
    WorkerPanicked { chunk_index: usize, reason: String },

    /// Concurrency limiter was closed while tasks were pending
    #[error("Matching pool closed before all chunks were scheduled")]
    PoolClosed,
}

/// Local SLC inventory errors
#[derive(Error, Debug)]
pub enum InventoryError {
    /// None of the known satellite prefixes appear in the inventory
    #[error("No satellite identifiers found in {directory}")]
    NoSatellites { directory: PathBuf },

    /// Invalid glob pattern built from the inventory directory
    #[error("Invalid inventory pattern")]
    Pattern(#[from] glob::PatternError),

    /// Directory entry could not be read while globbing
    #[error("Failed to read inventory entry")]
    Glob(#[from] glob::GlobError),
}

/// Remote catalog listing errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP transport failure
    #[error("Catalog request failed")]
    Http(#[from] reqwest::Error),

    /// Listing returned a non-success status
    #[error("Failed to retrieve catalog listing {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// Catalog URL cannot be parsed
    #[error("Invalid catalog URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// CSS selector used on the listing is invalid
    #[error("Invalid CSS selector: {selector}")]
    InvalidSelector { selector: String },
}

/// Retrieval and persistence errors for a single orbit file
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// HTTP transport failure
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Failed to download {name}: HTTP {status}")]
    Status { name: String, status: u16 },

    /// Orbit URL cannot be built
    #[error("Invalid URL for {name}: {error}")]
    InvalidUrl { name: String, error: String },

    /// File I/O failure while persisting
    #[error("File I/O error")]
    Io(#[from] std::io::Error),

    /// SNAP archive could not be written
    #[error("Failed to build orbit archive")]
    Archive(#[from] zip::result::ZipError),

    /// Candidate prefix or representative date cannot name a storage path
    #[error("Cannot derive storage path for {name} from '{key}'")]
    InvalidLayoutKey { name: String, key: String },

    /// Temp file could not be renamed into place
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be rendered as TOML
    #[error("Failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// User directories cannot be resolved
    #[error("Could not determine {what} directory")]
    MissingDirectory { what: String },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Interval(#[from] IntervalParseError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Extraction(_) => "extraction",
            AppError::Interval(_) => "interval",
            AppError::Match(_) => "matching",
            AppError::Inventory(_) => "inventory",
            AppError::Catalog(_) => "catalog",
            AppError::Retrieval(_) => "retrieval",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Extraction result type alias
pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;

/// Interval parse result type alias
pub type IntervalResult<T> = std::result::Result<T, IntervalParseError>;

/// Matching pool result type alias
pub type MatchResult<T> = std::result::Result<T, MatchError>;

/// Inventory result type alias
pub type InventoryResult<T> = std::result::Result<T, InventoryError>;

/// Catalog result type alias
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Retrieval result type alias
pub type RetrievalResult<T> = std::result::Result<T, RetrievalError>;

/// Config result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
