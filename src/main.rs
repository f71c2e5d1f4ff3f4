//! okrsync - GitHub-backed OKR progress tracker
//!
//! A CLI tool that keeps a yearly OKR document in sync with GitHub
//! activity and prints a human-readable progress report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (fetch setup, document missing/unparsable,
//!       unknown goal/metric path, config failure)
//!   2 - Usage error (clap)

mod cli;
mod config;
mod github;
mod models;
mod report;
mod store;
mod sync;

use anyhow::{Context, Result};
use cli::{Args, Command};
use config::Config;
use models::{MetricValue, OkrDocument};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init early (no logging needed)
    if matches!(args.command, Command::Init) {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    debug!("okrsync v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
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

/// Dispatch the requested subcommand.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    match args.command {
        Command::Sync => sync::run(&config).await,
        Command::Set {
            goal,
            metric,
            value,
        } => handle_set(&config, &goal, &metric, &value),
        Command::View => handle_view(&config),
        Command::Touch => handle_touch(&config),
        // Handled before logging init
        Command::Init => unreachable!("init is handled in main"),
    }
}

/// Handle `init`: generate a default .okrsync.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".okrsync.toml");

    if path.exists() {
        eprintln!("⚠️  .okrsync.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .okrsync.toml")?;

    println!("✅ Created .okrsync.toml with default settings.");
    println!("   Edit it to set your GitHub username, year, and file paths.");
    Ok(())
}

/// Handle `set`: targeted manual update of one metric's current value.
fn handle_set(config: &Config, goal: &str, metric: &str, value: &str) -> Result<()> {
    let path = PathBuf::from(config.okr_file());
    let mut doc: OkrDocument = store::load_document(&path)?;

    let previous = doc
        .metric(goal, metric)
        .with_context(|| format!("Cannot update {}.{}", goal, metric))?
        .current
        .clone();

    let parsed = MetricValue::parse(value);
    doc.set_current(goal, metric, parsed.clone())
        .with_context(|| format!("Cannot update {}.{}", goal, metric))?;
    doc.last_update = sync::today_stamp();

    store::save_document(&path, &doc)?;
    match previous {
        Some(previous) => println!("✅ Updated {}.{}: {} -> {}", goal, metric, previous, parsed),
        None => println!("✅ Updated {}.{} to {}", goal, metric, parsed),
    }
    Ok(())
}

/// Handle `view`: print the formatted progress report.
fn handle_view(config: &Config) -> Result<()> {
    let path = PathBuf::from(config.okr_file());
    let doc: OkrDocument = store::load_document(&path)?;
    print!("{}", report::render_report(&doc, config.github.year));
    Ok(())
}

/// Handle `touch`: heartbeat that only bumps the timestamp.
fn handle_touch(config: &Config) -> Result<()> {
    let path = PathBuf::from(config.okr_file());
    let mut doc: OkrDocument = store::load_document(&path)?;

    doc.last_update = sync::today_stamp();
    store::save_document(&path, &doc)?;

    println!("✅ Touched {} ({})", path.display(), doc.last_update);
    Ok(())
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
            info!("Loaded default config from .okrsync.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
