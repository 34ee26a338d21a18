//! Core Web Vitals trace replay
//!
//! Replays a JSON trace of performance-entry batches through the engine and
//! prints the resulting metrics.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vitals_core::MonitorConfig;
use vitals_replay::{replay, OutputFormat, Reporter, Trace};

#[derive(Parser, Debug)]
#[command(name = "vitals-replay")]
#[command(version, about = "Replay performance-entry traces through the Core Web Vitals engine")]
struct Args {
    /// Trace file (JSON)
    trace: PathBuf,

    /// Monitor configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Console)]
    format: OutputFormat,
}

fn load_config(path: Option<&PathBuf>) -> Result<MonitorConfig> {
    let Some(path) = path else {
        return Ok(MonitorConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    MonitorConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("Invalid log filter")?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let trace = Trace::from_file(&args.trace)?;
    tracing::info!("Replaying {} steps from {}", trace.steps.len(), args.trace.display());

    let outcome = replay(&trace, &config);
    let report = Reporter::new(args.format).render(&outcome)?;
    println!("{}", report);

    Ok(())
}
