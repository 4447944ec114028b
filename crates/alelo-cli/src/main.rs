//! Alelo CLI - manage Meu Alelo profiles and sessions from the terminal.
//!
//! Profiles live under `ALELO_HOME` (default `~/.alelo`). Every error ends
//! up here and exits with status 1.

mod cli;
mod commands;
mod prompt;

use std::io;
use std::process::ExitCode;

use alelo_core::config::Config;
use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

/// Initialize the tracing subscriber for logging
fn init_tracing(verbose: bool) {
    // RUST_LOG takes precedence; --verbose raises the fallback level
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    debug!(?config, "Configuration resolved");

    let mut out = io::stdout();
    if cli.env {
        commands::show_env(&config, &mut out)?;
    }

    match cli.command {
        Some(Commands::Profile { action }) => commands::run_profile(&config, action, &mut out).await,
        None => commands::status(&config, cli.verbose, &mut out),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    info!("Alelo CLI starting");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[!] {:#}", e);
            ExitCode::from(1)
        }
    }
}
