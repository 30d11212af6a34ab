//! l2dump - L2 dataplane state dump
//!
//! Replays a captured dump session and prints the resulting bridge domains,
//! FIB entries and cross-connects as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vpp_binapi::{ReplayCapture, ReplayChannel};
use vpp_l2dump::{collect_report, DumpTable, L2DumpConfig, LoggingConfig, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "l2dump")]
#[command(about = "Dump bridge domains, L2 FIB entries and cross-connects", long_about = None)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Captured dump session (JSON) to replay
    #[arg(long)]
    capture: PathBuf,

    /// Tables to dump, overriding the configuration
    #[arg(short, long, value_enum)]
    table: Vec<DumpTable>,

    /// List bridge domain IDs only
    #[arg(long)]
    ids_only: bool,

    /// Log level, overriding the configuration
    #[arg(long)]
    log_level: Option<String>,
}

/// Initializes tracing/logging subsystem
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Loads the configuration and applies the command line overrides.
///
/// Returns whether the configuration file was found. Runs before logging is
/// initialized, so the caller reports a missing file.
fn load_config(args: &Args) -> Result<(L2DumpConfig, bool)> {
    let loaded = L2DumpConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let found = loaded.is_some();
    let mut config = loaded.unwrap_or_default();

    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if !args.table.is_empty() {
        config.dump.tables = args.table.clone();
    }
    if args.ids_only {
        config.dump.bridge_domain_ids_only = true;
    }

    config.validate()?;
    Ok((config, found))
}

fn run(args: &Args, config: &L2DumpConfig) -> Result<bool> {
    let capture = ReplayCapture::from_file(&args.capture)?;
    let channel = ReplayChannel::new(capture);

    let report = collect_report(&channel, &config.dump);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(report.is_complete())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let (config, found) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("l2dump: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging);
    if !found {
        warn!(path = %args.config.display(), "Config file not found, using defaults");
    }
    info!(capture = %args.capture.display(), "--- Starting l2dump ---");

    match run(&args, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            error!("One or more dumps failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "l2dump failed");
            ExitCode::FAILURE
        }
    }
}
