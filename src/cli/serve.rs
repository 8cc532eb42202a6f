//! Serve command handler
//!
//! Starts the HTTP server in foreground mode.

use crate::config::Config;
use crate::error::Result;
use crate::server;
use crate::store::{FileStore, LocationStore, MemoryStore};
use clap::Args;
use std::sync::Arc;
use tracing::info;

/// Serve command arguments
#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Keep the selected location in memory only
    #[arg(long)]
    pub ephemeral: bool,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let store = if args.ephemeral {
        info!("Using in-memory location storage");
        LocationStore::new(Arc::new(MemoryStore::new()))
    } else {
        let file = FileStore::open(&config)?;
        info!(path = %file.path().display(), "Using file location storage");
        LocationStore::new(Arc::new(file))
    };

    info!(
        "Starting solarscope server v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.server_addr()
    );

    server::run(config, store).await
}
