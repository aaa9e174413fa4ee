//! Configuration management for Orbit Fetcher
//!
//! Settings are loaded from TOML with zero-config defaults. A file given with
//! `--config` must exist; otherwise `./orbit-fetcher.toml` and then the user
//! config file are tried. Every section and field is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::client::parse_catalog_url;
use crate::app::{
    ClientConfig, MatchSettings, StorageConfig, SyncSettings, ValidityEncoding,
};
use crate::app::matcher::default_match_workers;
use crate::app::AcquisitionTimestamp;
use crate::constants::{catalog, config as config_paths, http, matching, satellites, workers};
use crate::errors::{AppError, ConfigError, ConfigResult, Result};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Interval matching settings
    pub matching: MatchingConfigToml,
    /// Retrieval settings
    pub retrieval: RetrievalConfigToml,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Storage roots
    pub storage: StorageConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly matching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfigToml {
    /// Candidate list is cut into `len / chunk_divisor` sized chunks
    pub chunk_divisor: usize,
    /// Chunks matched at once (None = host parallelism)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_workers: Option<usize>,
    /// Trailing fields of a candidate name holding its validity window
    pub validity_fields: usize,
    /// Date-time format of acquisitions and validity bounds
    pub date_format: String,
    /// Marker stripped from validity tokens
    pub validity_marker: char,
    /// Orbit file suffix
    pub validity_suffix: String,
}

impl Default for MatchingConfigToml {
    fn default() -> Self {
        Self {
            chunk_divisor: matching::CHUNK_DIVISOR,
            match_workers: None,
            validity_fields: matching::VALIDITY_FIELDS,
            date_format: matching::DATE_FORMAT.to_string(),
            validity_marker: matching::VALIDITY_MARKER,
            validity_suffix: matching::VALIDITY_SUFFIX.to_string(),
        }
    }
}

/// TOML-friendly retrieval configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfigToml {
    /// Concurrent retrievals
    pub workers: usize,
    /// Satellite prefixes looked for in the SLC inventory
    pub known_satellites: Vec<String>,
}

impl Default for RetrievalConfigToml {
    fn default() -> Self {
        Self {
            workers: workers::DEFAULT_RETRIEVAL_WORKERS,
            known_satellites: satellites::KNOWN.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Orbit catalog directory listing
    pub catalog_url: String,
    /// TCP keep-alive (None = disabled)
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub tcp_keepalive: Option<Duration>,
    /// TCP nodelay setting
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout (None = no timeout)
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            catalog_url: catalog::POEORB_URL.to_string(),
            tcp_keepalive: Some(Duration::from_secs(30)),
            tcp_nodelay: true,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            rate_limit_rps: http::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

/// TOML-friendly storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfigToml {
    /// SNAP POEORB root (None = `~/.snap/auxdata/Orbits/Sentinel-1/POEORB`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap_root: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
    /// Enable file logging
    pub file_logging: bool,
    /// Log file path (None = `orbit_fetcher.log` in the working directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Enable colored output
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: false,
            log_file: None,
            colored_output: true,
        }
    }
}

impl AppConfig {
    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Explicit config file (must exist)
    /// 3. Otherwise the first config file found in the standard locations
    ///
    /// CLI arguments are applied by the caller on top of the result.
    pub async fn load(config_file_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path }.into());
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        let config = match config_path {
            Some(path) => {
                debug!("Loading config from: {}", path.display());
                Self::load_from_file(&path).await?
            }
            None => {
                debug!("No config file found in standard locations, using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(config_paths::LOCAL_FILE)];
        if let Ok(user_path) = Self::default_config_path() {
            search_paths.push(user_path);
        }

        search_paths.into_iter().find(|path| {
            let found = path.exists();
            if found {
                debug!("Found config file: {}", path.display());
            }
            found
        })
    }

    /// Get the default config file path for the current user
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::MissingDirectory {
            what: "user config".to_string(),
        })?;

        Ok(config_dir
            .join(config_paths::APP_DIR)
            .join(config_paths::FILE_NAME))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::generic(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::InvalidFormat)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Write the commented default template to `path`
    ///
    /// An existing file is only replaced when `force` is set.
    pub async fn write_default_config(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(AppError::generic(format!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            )));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::generic(format!(
                        "Failed to create config directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        tokio::fs::write(path, Self::generate_default_config_content())
            .await
            .map_err(|e| {
                AppError::generic(format!(
                    "Failed to write config file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        info!("Wrote default configuration to {}", path.display());
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check values that would make a run meaningless
    pub fn validate(&self) -> ConfigResult<()> {
        let m = &self.matching;
        if m.chunk_divisor == 0 {
            return Err(invalid("matching.chunk_divisor", 0, "must be at least 1"));
        }
        if m.match_workers == Some(0) {
            return Err(invalid("matching.match_workers", 0, "must be at least 1"));
        }
        if m.validity_fields < 2 {
            return Err(invalid(
                "matching.validity_fields",
                m.validity_fields,
                "a validity window needs a start and an end field",
            ));
        }
        let round_trips = AcquisitionTimestamp::parse(matching::SAMPLE_STAMP, &m.date_format)
            .map(|ts| ts.format(&m.date_format) == matching::SAMPLE_STAMP)
            .unwrap_or(false);
        if !round_trips {
            return Err(invalid(
                "matching.date_format",
                &m.date_format,
                &format!(
                    "must read and write stamps like {} unchanged",
                    matching::SAMPLE_STAMP
                ),
            ));
        }
        if m.validity_suffix.is_empty() {
            return Err(invalid(
                "matching.validity_suffix",
                "\"\"",
                "must not be empty",
            ));
        }

        let r = &self.retrieval;
        if r.workers == 0 || r.workers > workers::MAX_RETRIEVAL_WORKERS {
            return Err(invalid(
                "retrieval.workers",
                r.workers,
                &format!("must be between 1 and {}", workers::MAX_RETRIEVAL_WORKERS),
            ));
        }
        if r.known_satellites.is_empty() {
            return Err(invalid(
                "retrieval.known_satellites",
                "[]",
                "at least one satellite prefix is required",
            ));
        }

        if self.client.rate_limit_rps == 0 {
            return Err(invalid("client.rate_limit_rps", 0, "must be at least 1"));
        }
        parse_catalog_url(&self.client.catalog_url).map_err(|e| ConfigError::InvalidValue {
            field: "client.catalog_url".to_string(),
            value: self.client.catalog_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    /// Convert TOML-friendly configuration to runtime configuration
    pub fn to_runtime_config(&self) -> (SyncSettings, ClientConfig) {
        let settings = SyncSettings {
            matching: self.matching.to_runtime_config(),
            retrieval_workers: self.retrieval.workers,
            storage: self.storage.to_runtime_config(),
            known_satellites: self.retrieval.known_satellites.clone(),
            dry_run: false,
        };
        (settings, self.client.to_runtime_config())
    }

    /// Generate default configuration content with helpful comments
    pub fn generate_default_config_content() -> String {
        format!(
            r#"# Orbit Fetcher Configuration
# Every setting is optional; remove a line to fall back to its default.

[matching]
# Candidate list is split into len / chunk_divisor sized chunks
chunk_divisor = {}
# Chunks matched at once (defaults to the number of CPUs)
# match_workers = 8
# How candidate names encode their validity window
validity_fields = {}
date_format = "{}"
validity_marker = "{}"
validity_suffix = "{}"

[retrieval]
# Concurrent orbit file downloads
workers = {}
known_satellites = ["S1A", "S1B"]

[client]
catalog_url = "{}"
tcp_keepalive = "30s"
tcp_nodelay = true
pool_idle_timeout = "90s"
pool_max_per_host = {}
request_timeout = "60s"
connect_timeout = "30s"
rate_limit_rps = {}

[storage]
# SNAP auxdata root (defaults to ~/.snap/auxdata/Orbits/Sentinel-1/POEORB)
# snap_root = "/path/to/POEORB"

[logging]
level = "info"  # error, warn, info, debug, trace
file_logging = false
colored_output = true
# log_file = "orbit_fetcher.log"
"#,
            matching::CHUNK_DIVISOR,
            matching::VALIDITY_FIELDS,
            matching::DATE_FORMAT,
            matching::VALIDITY_MARKER,
            matching::VALIDITY_SUFFIX,
            workers::DEFAULT_RETRIEVAL_WORKERS,
            catalog::POEORB_URL,
            http::POOL_MAX_PER_HOST,
            http::DEFAULT_RATE_LIMIT_RPS,
        )
    }
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl MatchingConfigToml {
    /// Convert to runtime MatchSettings
    pub fn to_runtime_config(&self) -> MatchSettings {
        MatchSettings {
            chunk_divisor: self.chunk_divisor,
            match_workers: self.match_workers.unwrap_or_else(default_match_workers),
            encoding: ValidityEncoding {
                fields: self.validity_fields,
                date_format: self.date_format.clone(),
                marker: self.validity_marker,
                suffix: self.validity_suffix.clone(),
            },
        }
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            catalog_url: self.catalog_url.clone(),
            tcp_keepalive: self.tcp_keepalive,
            tcp_nodelay: self.tcp_nodelay,
            pool_idle_timeout: self.pool_idle_timeout,
            pool_max_per_host: self.pool_max_per_host,
            request_timeout: self.request_timeout,
            connect_timeout: self.connect_timeout,
            rate_limit_rps: self.rate_limit_rps,
        }
    }
}

impl StorageConfigToml {
    /// Convert to runtime StorageConfig
    pub fn to_runtime_config(&self) -> StorageConfig {
        StorageConfig {
            snap_root: self.snap_root.clone(),
        }
    }
}
