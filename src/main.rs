//! jtlreport - JMeter results aggregator
//!
//! A CLI tool that groups the samples of a JTL results log by transaction
//! label and writes an aggregate CSV plus an HTML report with bar charts.
//!
//! Exit codes:
//!   0 - Success (both reports written)
//!   1 - Any error (missing/empty input, missing columns, malformed data, I/O)

mod analysis;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("jtlreport v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration failed: {:#}", e);
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    let Some(input) = args.input.as_deref() else {
        eprintln!("Error: An input results file is required");
        std::process::exit(1);
    };

    let start_time = Instant::now();
    match pipeline::run(input, &config) {
        Ok(artifacts) => {
            info!(
                "Wrote {} transactions ({} samples) to {} and {} in {:.2}s",
                artifacts.rows,
                artifacts.total_samples,
                artifacts.csv_path.display(),
                artifacts.html_path.display(),
                start_time.elapsed().as_secs_f64()
            );
            Ok(())
        }
        Err(e) => {
            error!("{}: {}", e.kind(), e);
            eprintln!("❌ Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Handle --init-config: generate a default .jtlreport.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize the delimiter, report title, and chart colors.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
