//! Interaction Testbed
//!
//! Runs a scripted interaction session without a window and logs every
//! use and grab transition.
//!
//! Settings can be loaded from a TOML file with `--config <path>`.

use anyhow::{Context, Result};
use clap::Parser;
use interaction::InteractionConfig;
use std::path::PathBuf;
use testbed::{Scenario, ScenarioMode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Interaction Testbed
///
/// Plays a scripted timeline against the hand interaction core.
#[derive(Parser, Debug)]
#[command(name = "testbed")]
#[command(about = "Headless hand interaction testbed", long_about = None)]
struct Args {
    /// Interaction config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input timeline to play
    #[arg(short, long, value_enum, default_value = "auto")]
    mode: ScenarioMode,

    /// Number of ticks to run
    #[arg(short, long, default_value = "24")]
    ticks: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print events as JSON lines when done
    #[arg(long)]
    json: bool,

    /// Print the effective config and exit
    #[arg(long)]
    dump_config: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<InteractionConfig> {
    let path = match path {
        Some(path) => path.clone(),
        None => {
            // Try default config location
            let default_config = PathBuf::from("crates/apps/testbed/config/interaction.toml");
            if !default_config.exists() {
                return Ok(InteractionConfig::default());
            }
            default_config
        }
    };
    tracing::info!("Loading config: {}", path.display());
    InteractionConfig::from_file(&path)
        .with_context(|| format!("Failed to load config {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.to_string().to_lowercase().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config(args.config.as_ref())?;
    if args.dump_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    tracing::info!("Interaction testbed v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Mode: {:?}, ticks: {}", args.mode, args.ticks);

    let mut scenario = Scenario::new(config, args.mode)?;
    let report = scenario.run(args.ticks);

    tracing::info!(
        "Finished {} ticks in {} mode with {} events",
        report.ticks,
        report.mode,
        report.events.len()
    );

    if args.json {
        for (tick, event) in &report.events {
            let mut line = serde_json::to_value(event)?;
            line["tick"] = (*tick).into();
            println!("{}", line);
        }
    }

    Ok(())
}
