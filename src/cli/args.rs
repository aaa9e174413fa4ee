//! Command-line argument parsing for Orbit Fetcher
//!
//! This module defines the CLI structure using clap derive macros: matching
//! local SLC acquisitions against the precise orbit catalog, downloading the
//! matched orbit files, and managing the configuration file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::{OrbitPass, ProcessorMode};
use crate::constants::workers;

/// Orbit Fetcher - Download Sentinel-1 precise orbit files
#[derive(Parser, Debug)]
#[command(
    name = "orbit_fetcher",
    version,
    about = "Download Sentinel-1 precise orbit files for local SLC acquisitions",
    long_about = "Matches the acquisition times of local Sentinel-1 SLC products against the
validity windows of the POEORB catalog and stores the matching orbit files where
SNAP or ISCE expect them."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match acquisitions and download the orbit files
    Download(DownloadArgs),

    /// Match acquisitions and print the mapping without downloading
    Match(MatchArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Inventory selection shared by `download` and `match`
#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    /// Root directory holding `<orbit-pass>/slc/*.zip`
    #[arg(long, value_name = "DIR")]
    pub data_directory: PathBuf,

    /// Orbit pass subdirectory to scan
    #[arg(long, value_enum)]
    pub orbit_pass_name: OrbitPass,

    /// Override the candidate chunk divisor
    #[arg(long, value_name = "D")]
    pub chunk_divisor: Option<usize>,
}

/// Arguments for the download command
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub inventory: InventoryArgs,

    /// Processor whose storage layout is used
    #[arg(long, value_enum)]
    pub insar_processor: ProcessorMode,

    /// Number of concurrent download workers
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Dry run - show what would be downloaded without downloading
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the match command
#[derive(Args, Debug, Clone)]
pub struct MatchArgs {
    #[command(flatten)]
    pub inventory: InventoryArgs,

    /// Print the mapping as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a commented default configuration file
    Init {
        /// Target path (defaults to the user config file)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Logging level requested on the command line, if any
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}

impl InventoryArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_divisor == Some(0) {
            return Err("Chunk divisor must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl DownloadArgs {
    /// Reject worker counts and divisors that cannot run
    pub fn validate(&self) -> Result<(), String> {
        self.inventory.validate()?;

        if let Some(count) = self.workers {
            if count == 0 {
                return Err("Number of workers must be greater than 0".to_string());
            }
            if count > workers::MAX_RETRIEVAL_WORKERS {
                return Err(format!(
                    "Number of workers must not exceed {}",
                    workers::MAX_RETRIEVAL_WORKERS
                ));
            }
        }

        Ok(())
    }
}
