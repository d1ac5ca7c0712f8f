//! watchlog - personal movie-list CLI
//!
//! Thin consumer of the watchlog-core session layer: auth and movie
//! commands play the role the web app's pages do.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;
mod notify;

use cli::{Cli, Commands};
use watchlog_core::SessionManager;
use watchlog_core::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("watchlog=warn".parse()?))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load()?;
    config.ensure_dirs()?;
    tracing::debug!(api = %config.api.url, "loaded configuration");

    // One session context for the whole run, restored before any command
    let session = SessionManager::with_notifier(&config, Arc::new(notify::TermNotifier))?;
    session.restore();

    // Execute command
    match cli.command {
        Commands::Auth(cmd) => commands::auth::execute(cmd.action, &session, &config).await,
        Commands::Movies(cmd) => commands::movies::execute(cmd.action, &session).await,
        Commands::Version => {
            println!("watchlog {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
