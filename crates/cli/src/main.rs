// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! joust - observe and replay agent games and tournaments

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod output;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, replay, serve, sessions, watch};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "joust",
    version,
    about = "Joust - watch agents play games and tournaments"
)]
struct Cli {
    /// Config file (defaults to ./joust.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve captured sessions to observers
    Serve(serve::ServeArgs),
    /// List sessions on a server
    Sessions(sessions::SessionsArgs),
    /// Follow a live session
    Watch(watch::WatchArgs),
    /// Rebuild a session from a capture file
    Replay(replay::ReplayArgs),
    /// Configuration tools
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    match cli.command {
        Commands::Config(args) => config::handle(args, cli.config.as_deref()),
        Commands::Replay(args) => replay::handle(args),
        Commands::Sessions(args) => sessions::handle(args).await,
        Commands::Serve(args) => {
            let config = settings::load(cli.config.as_deref())?;
            serve::handle(args, &config).await
        }
        Commands::Watch(args) => {
            let config = settings::load(cli.config.as_deref())?;
            watch::handle(args, &config).await
        }
    }
}

/// Logs go to stderr; stdout carries command output only
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("JOUST_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
