//! # Garden
//!
//! Command-line driver for the garden pollination simulator.
//!
//! Runs a garden script (from a file or stdin) against a fresh garden, then
//! prints the notification history and the final state as JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod script;

use anyhow::{Context, Result};
use clap::Parser;
use garden_sim::Garden;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::GardenConfig;

/// Run a garden script and report the outcome.
#[derive(Debug, Parser)]
#[command(name = "garden", version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to the platform config directory).
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Script to run; `-` or nothing reads stdin.
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,
}

impl Args {
    /// Script file to read, or `None` for stdin.
    fn script_file(&self) -> Option<&PathBuf> {
        self.script.as_ref().filter(|path| path.as_os_str() != "-")
    }
}

/// Main entry point.
fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(GardenConfig::config_path);
    let loaded = GardenConfig::try_load_from(&config_path);
    let directive = loaded
        .as_ref()
        .map_or("garden=info", |config| config.log_directive.as_str());

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    let config = match loaded {
        Ok(config) => {
            info!("Using config {}", config_path.display());
            config
        },
        Err(e) => {
            warn!("{e}, using defaults");
            GardenConfig::default()
        },
    };

    let source = match args.script_file() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read script from stdin")?;
            buffer
        },
    };
    let script = script::parse_script(&source)?;
    info!(steps = script.len(), "Script parsed");

    let mut garden = Garden::new(config.sim.clone());
    let mut stdout = io::stdout().lock();
    script::run_script(&mut garden, &script, &mut stdout)?;

    info!(now_ms = garden.now(), "Script finished");
    script::write_history(&garden, &mut stdout)?;
    if config.print_snapshot {
        let json = serde_json::to_string_pretty(&garden.snapshot())?;
        writeln!(stdout, "{json}")?;
    }
    Ok(())
}
