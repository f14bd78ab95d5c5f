// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use joust_server::Client;
use joust_storage::SessionKind;
use std::path::PathBuf;

#[derive(Args)]
pub struct SessionsArgs {
    /// Server socket
    #[arg(long)]
    pub socket: PathBuf,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub async fn handle(args: SessionsArgs) -> Result<()> {
    let sessions = Client::connect(&args.socket).await?.sessions().await?;

    match args.format {
        OutputFormat::Json => output::print_json(&sessions),
        OutputFormat::Text if sessions.is_empty() => println!("No sessions"),
        OutputFormat::Text => {
            println!("{:<40} {:<11} {:>7} STATUS", "ID", "KIND", "EVENTS");
            for s in sessions {
                let kind = match s.kind {
                    SessionKind::Game => "game",
                    SessionKind::Tournament => "tournament",
                };
                println!(
                    "{:<40} {:<11} {:>7} {}",
                    s.id,
                    kind,
                    s.events,
                    output::status_label(&s.status)
                );
            }
        }
    }
    Ok(())
}
