//! reef tick replay - Entry Point
//!
//! Feeds recorded ticks through the engine and writes one JSON line per
//! tick to stdout.

use anyhow::Result;
use clap::Parser;
use reef_bot::config::DEFAULT_CONFIG_PATH;
use reef_bot::{load_ticks, AppConfig, Engine};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Replay recorded ticks through the reef engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via REEF_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// JSON file holding an array of ticks
    #[arg(short, long)]
    ticks: String,

    /// Emit full per-tick reports instead of driver output only
    #[arg(long)]
    report: bool,

    /// Run the conversion path search before replaying
    #[arg(long)]
    paths: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = AppConfig::resolve_path(args.config.as_deref());
    let config = AppConfig::load(config_path.as_deref())?;
    reef_telemetry::init_logging_with(&config.telemetry.log_level)?;

    info!("Starting reef replay v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!(path = %path, "Config file loaded"),
        None => warn!(path = DEFAULT_CONFIG_PATH, "Config file not found, using defaults"),
    }
    info!(
        instruments = config.instruments.len(),
        arbitrage = config.arbitrage.enabled,
        "Configuration loaded"
    );

    let ticks = load_ticks(&args.ticks)?;
    info!(ticks = ticks.len(), path = %args.ticks, "Ticks loaded");

    let mut engine = Engine::new(&config)?;

    if args.paths {
        if let Some(result) = engine.conversion_paths(Decimal::ONE) {
            for path in result.profitable() {
                println!("{}", serde_json::to_string(path)?);
            }
        }
    }

    for tick in &ticks {
        let report = engine.process(tick);
        let line = if args.report {
            serde_json::to_string(&report)?
        } else {
            serde_json::to_string(&report.output)?
        };
        println!("{line}");
    }

    for (symbol, instrument) in engine.instruments() {
        let tracker = instrument.tracker();
        info!(
            symbol = %symbol,
            position = tracker.position(),
            realized_pnl = %tracker.realized_pnl(),
            cash = %tracker.cash(),
            open_lots = tracker.ledger().len(),
            "Final state"
        );
    }
    info!(ticks = engine.ticks(), "Replay complete");

    Ok(())
}
