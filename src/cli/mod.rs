//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod calculate;
pub mod config;
pub mod map;
pub mod search;
pub mod serve;

use crate::config::Config;
use crate::error::Result;
use crate::store::{FileStore, LocationStore};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Pick a location, then estimate its rooftop solar output
#[derive(Parser)]
#[command(name = "solarscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for a place and select it
    Search(search::SearchArgs),

    /// Refine the selected location on the map
    Map(map::MapArgs),

    /// Estimate solar output at the selected location
    Calculate(calculate::CalculateArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),
}

/// Install the tracing subscriber; `RUST_LOG` overrides `default`
pub fn init_logging(default: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Location store backed by the configured storage file
pub(crate) fn open_location_store(config: &Config) -> Result<LocationStore> {
    let file = FileStore::open(config)?;
    Ok(LocationStore::new(Arc::new(file)))
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve(_) => init_logging("info"),
        _ => init_logging("warn"),
    }

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Map(args) => map::run(args).await,
        Commands::Calculate(args) => calculate::run(args),
        Commands::Config(args) => config::run(args),
        Commands::Serve(args) => serve::run(args).await,
    }
}
