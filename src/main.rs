//! Orbit Fetcher CLI application
//!
//! Command-line interface for matching Sentinel-1 SLC acquisitions against the
//! POEORB catalog and downloading the covering precise orbit files.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

// Import CLI modules through the library (module is public but not re-exported)
use orbit_fetcher::cli::{handle_config, handle_download, handle_match, Cli, Commands};
use orbit_fetcher::config::{AppConfig, LoggingConfig};
use orbit_fetcher::constants::files;
use orbit_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    // Initialize program
    let result = run().await;

    // Handle any errors that occurred
    if let Err(e) = result {
        tracing::error!(category = e.category(), "{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok(); // Ignore errors if file doesn't exist

    // Parse command line arguments
    let cli = Cli::parse_args();

    let config = AppConfig::load(cli.global.config.clone()).await?;

    // Initialize logging based on verbosity and the logging section
    init_logging(&cli, &config.logging);

    info!("Orbit Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    let quiet = cli.global.quiet;

    // Execute the appropriate command
    match cli.command {
        Commands::Download(args) => {
            info!("Executing download command");
            handle_download(args, &config, quiet).await
        }
        Commands::Match(args) => {
            info!("Executing match command");
            handle_match(args, &config, quiet).await
        }
        Commands::Config(args) => {
            info!("Executing config command");
            handle_config(args, &config).await
        }
    }
}

/// Initialize logging from CLI verbosity, falling back to the config level
///
/// `RUST_LOG` directives take precedence over both.
fn init_logging(cli: &Cli, logging: &LoggingConfig) {
    let level = cli
        .log_level()
        .map(|level| level.to_string().to_lowercase())
        .unwrap_or_else(|| logging.level.clone());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("orbit_fetcher={}", level)));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(logging.colored_output)
        .with_level(cli.global.very_verbose); // Show levels only in very verbose mode

    let mut file_error = None;
    let file_layer = if logging.file_logging {
        let path = logging
            .log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(files::LOG_FILE_NAME));
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true),
            ),
            Err(e) => {
                file_error = Some(format!("{}: {}", path.display(), e));
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    if let Some(error) = file_error {
        warn!("File logging disabled, could not open {}", error);
    }

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
