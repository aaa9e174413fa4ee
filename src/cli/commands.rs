//! Command handlers for the CLI
//!
//! Each handler turns parsed arguments plus the loaded [`AppConfig`] into
//! runtime settings, runs the requested operation and prints a summary.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::app::{
    Inventory, MatchMapping, OrbitClient, OrbitSync, ProcessorMode, RunReport, SyncSettings,
};
use crate::cli::args::{ConfigAction, ConfigArgs, DownloadArgs, InventoryArgs, MatchArgs};
use crate::cli::progress::ProgressObserver;
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Handle the download command
pub async fn handle_download(args: DownloadArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let (settings, client_config) = config.to_runtime_config();
    let mut settings = apply_inventory_overrides(settings, &args.inventory);
    if let Some(workers) = args.workers {
        settings = settings.with_retrieval_workers(workers);
    }
    settings = settings.with_dry_run(args.dry_run);
    debug!("Sync settings: {:?}", settings);

    let source = Arc::new(OrbitClient::with_config(&client_config)?);
    let sync = OrbitSync::new(settings, source, ProgressObserver::shared(quiet));
    let inventory = inventory_for(&args.inventory);

    info!(
        "Scanning {} for {} orbit files",
        inventory.slc_directory().display(),
        args.insar_processor
    );
    let report = sync.run(&inventory, args.insar_processor).await?;

    if !quiet {
        print_download_summary(&report, args.dry_run);
    }

    let totals = report.total_dispatch();
    if totals.failed > 0 {
        info!("{} orbit files could not be retrieved", totals.failed);
    }
    Ok(())
}

/// Handle the match command
pub async fn handle_match(args: MatchArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    args.inventory.validate().map_err(AppError::generic)?;

    let (settings, client_config) = config.to_runtime_config();
    let settings = apply_inventory_overrides(settings, &args.inventory).with_dry_run(true);

    let source = Arc::new(OrbitClient::with_config(&client_config)?);
    let sync = OrbitSync::new(settings, source, ProgressObserver::shared(quiet));
    let inventory = inventory_for(&args.inventory);

    // Layout is never used in a dry run
    let report = sync.run(&inventory, ProcessorMode::Isce).await?;

    if args.json {
        let by_satellite: IndexMap<&str, &MatchMapping> = report
            .satellites
            .iter()
            .map(|s| (s.satellite.as_str(), &s.mapping))
            .collect();
        let rendered = serde_json::to_string_pretty(&by_satellite)
            .map_err(|e| AppError::generic(format!("Failed to render mapping: {}", e)))?;
        println!("{}", rendered);
    } else {
        print_mapping(&report);
    }
    Ok(())
}

/// Handle configuration management
pub async fn handle_config(args: ConfigArgs, config: &AppConfig) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        ConfigAction::Init { path, force } => {
            let path = match path {
                Some(path) => path,
                None => AppConfig::default_config_path()?,
            };
            AppConfig::write_default_config(&path, force).await?;
            println!("📁 Created default configuration file:");
            println!("   {}", path.display());
            println!("   You can customize settings by editing this file.");
            Ok(())
        }
    }
}

fn inventory_for(args: &InventoryArgs) -> Inventory {
    Inventory::new(&args.data_directory, args.orbit_pass_name)
}

fn apply_inventory_overrides(settings: SyncSettings, args: &InventoryArgs) -> SyncSettings {
    match args.chunk_divisor {
        Some(divisor) => settings.with_chunk_divisor(divisor),
        None => settings,
    }
}

fn print_download_summary(report: &RunReport, dry_run: bool) {
    println!("\n📊 Orbit Summary:");
    for satellite in &report.satellites {
        println!(
            "  {}: {} acquisitions, {} catalog entries, {} matched",
            satellite.satellite,
            satellite.acquisitions,
            satellite.candidates,
            satellite.mapping.len()
        );
        if let Some(stats) = satellite.dispatch {
            println!(
                "    retrieved {} of {} ({} failed)",
                stats.succeeded, stats.submitted, stats.failed
            );
        }
    }

    if dry_run {
        println!("\nDry run - nothing was downloaded.");
        for satellite in &report.satellites {
            for job in satellite.mapping.retrieval_jobs() {
                println!("  {}", job.candidate);
            }
        }
    }
}

fn print_mapping(report: &RunReport) {
    for satellite in &report.satellites {
        if satellite.mapping.is_empty() {
            println!("{}: no matching strings found", satellite.satellite);
            continue;
        }
        println!("{}:", satellite.satellite);
        for (candidate, dates) in satellite.mapping.iter() {
            println!("  {}", candidate);
            for date in dates {
                println!("    {}", date);
            }
        }
    }
}
