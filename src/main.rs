//! Replay a recorded head tracking trace and print the resulting events.
//!
//! Usage:
//!   headtrack-replay trace.json                  # settings from the default config file
//!   headtrack-replay trace.json --gesture dwell  # override the click gesture
//!   headtrack-replay trace.json --json           # one JSON event per line
//!
//! Logs go to stderr; `RUST_LOG` overrides the level.

use anyhow::{Context, Result};
use clap::Parser;
use headtrack::replay::{self, Trace};
use headtrack::{ClickGesture, Settings};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "headtrack-replay", version, about = "Replay a recorded head tracking trace")]
struct Cli {
    /// Trace file (JSON)
    trace: PathBuf,

    /// Settings file; defaults to the platform config location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Click gesture to use instead of the configured one
    #[arg(long)]
    gesture: Option<ClickGesture>,

    /// Dwell time in seconds
    #[arg(long, value_name = "SECS")]
    dwell: Option<f64>,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => match Settings::default_path() {
            Ok(path) => Settings::load_or_default(&path)?,
            Err(err) => {
                warn!("{}; using default settings", err);
                Settings::default()
            }
        },
    };

    if let Some(gesture) = cli.gesture {
        settings.click_gesture = gesture;
    }
    if let Some(dwell) = cli.dwell {
        settings.dwell_time_secs = dwell;
    }
    settings.validate()?;
    Ok(settings)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = load_settings(&cli).context("Failed to load settings")?;
    let trace = Trace::load(&cli.trace)?;
    let summary = replay::run(&trace, settings);

    for event in &summary.events {
        if cli.json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!("{}", event);
        }
    }
    Ok(())
}
