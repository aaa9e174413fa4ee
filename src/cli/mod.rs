//! Command-line interface components
//!
//! This module contains CLI-specific code for the Orbit Fetcher application,
//! including argument parsing, command handlers and progress display.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{
    Cli, Commands, ConfigAction, ConfigArgs, DownloadArgs, GlobalArgs, InventoryArgs, MatchArgs,
};
pub use commands::{handle_config, handle_download, handle_match};
pub use progress::ProgressObserver;
