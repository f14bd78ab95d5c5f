// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch command: follow a session live, reconnecting as needed

use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use clap::Args;
use joust_core::Config;
use joust_server::{Client, Observer, ObserverHandler, Snapshot};
use joust_storage::{CaptureError, CaptureWriter, Envelope, LogStatus, SessionEvent};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct WatchArgs {
    /// Server socket
    #[arg(long)]
    pub socket: PathBuf,

    /// Session to follow (defaults to the only running session)
    pub session: Option<String>,

    /// Follow one match of a tournament session
    #[arg(long = "match")]
    pub match_id: Option<String>,

    /// Record every received event to a JSON-lines file
    #[arg(long)]
    pub capture: Option<PathBuf>,

    /// Stop after this many consecutive failed connection attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

struct Printer {
    format: OutputFormat,
    capture: Option<CaptureWriter>,
    capture_error: Option<CaptureError>,
}

impl ObserverHandler for Printer {
    fn on_event(&mut self, envelope: &Envelope<SessionEvent>, _snapshot: &Snapshot) {
        output::print_envelope(envelope, self.format);
        if let Some(writer) = &mut self.capture {
            if let Err(e) = writer.append(envelope) {
                tracing::error!(error = %e, "capture failed, no longer recording");
                self.capture = None;
                self.capture_error = Some(e);
            }
        }
    }
}

pub async fn handle(args: WatchArgs, config: &Config) -> Result<()> {
    let session = match args.session {
        Some(session) => session,
        None => pick_session(&args.socket).await?,
    };

    let mut observer = Observer::new(&args.socket, &session, &config.observer);
    if let Some(match_id) = &args.match_id {
        observer = observer.with_match(match_id);
    }
    if let Some(attempts) = args.max_attempts {
        observer = observer.with_max_attempts(attempts);
    }

    let mut printer = Printer {
        format: args.format,
        capture: args.capture.as_deref().map(CaptureWriter::create).transpose()?,
        capture_error: None,
    };
    let observed = observer.run(&mut printer).await?;

    match args.format {
        OutputFormat::Text => {
            println!("session {} {}", session, output::status_label(&observed.status));
            println!("{}", output::summary(&observed.snapshot));
        }
        OutputFormat::Json => output::print_json(&serde_json::json!({
            "session": session,
            "status": observed.status,
            "summary": output::summary_json(&observed.snapshot),
        })),
    }

    if let Some(e) = printer.capture_error {
        return Err(e.into());
    }
    if let LogStatus::Failed { reason } = observed.status {
        bail!("session {} failed: {}", session, reason);
    }
    Ok(())
}

/// The only running session, or the only session at all
async fn pick_session(socket: &Path) -> Result<String> {
    let sessions = Client::connect(socket).await?.sessions().await?;
    let running: Vec<&str> = sessions
        .iter()
        .filter(|s| s.status.is_open())
        .map(|s| s.id.as_str())
        .collect();
    match (running.as_slice(), sessions.as_slice()) {
        ([id], _) => Ok(id.to_string()),
        ([], [only]) => Ok(only.id.clone()),
        ([], []) => bail!("no sessions on {}", socket.display()),
        _ => {
            let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
            bail!("several sessions, pick one of: {}", ids.join(", "))
        }
    }
}
