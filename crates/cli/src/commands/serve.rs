// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serve command: publish captured sessions to observers

use anyhow::{anyhow, Context, Result};
use clap::Args;
use joust_core::Config;
use joust_server::{bind, serve};
use joust_storage::{restore, Broadcaster};
use std::path::PathBuf;

#[derive(Args)]
pub struct ServeArgs {
    /// Socket path to listen on
    #[arg(long)]
    pub socket: PathBuf,

    /// Capture files to serve; each becomes a session named after the file.
    /// A capture that stops before the session ended is served as failed.
    #[arg(required = true)]
    pub captures: Vec<PathBuf>,
}

pub async fn handle(args: ServeArgs, config: &Config) -> Result<()> {
    let broadcaster = Broadcaster::with_capacity(config.log.max_events);
    for path in &args.captures {
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("cannot name a session after {}", path.display()))?;
        let kind = restore(&broadcaster, id, path)
            .with_context(|| format!("cannot restore {}", path.display()))?;
        tracing::info!(session = id, ?kind, "restored capture");
    }

    let listener = bind(&args.socket)?;
    println!(
        "serving {} sessions on {}",
        args.captures.len(),
        args.socket.display()
    );

    serve(listener, broadcaster, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    })
    .await;

    let _ = std::fs::remove_file(&args.socket);
    Ok(())
}
