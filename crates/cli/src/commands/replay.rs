// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replay command: rebuild a session from a capture file

use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use joust_server::Snapshot;
use joust_storage::read_capture;
use std::path::PathBuf;

#[derive(Args)]
pub struct ReplayArgs {
    /// Capture file written by `joust watch --capture`
    pub file: PathBuf,

    /// Print every event before the summary
    #[arg(long)]
    pub events: bool,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn handle(args: ReplayArgs) -> Result<()> {
    let envelopes = read_capture(&args.file)
        .with_context(|| format!("cannot read capture {}", args.file.display()))?;
    if args.events {
        for envelope in &envelopes {
            output::print_envelope(envelope, args.format);
        }
    }

    let snapshot = Snapshot::from_envelopes(&envelopes)
        .with_context(|| format!("capture {} does not replay", args.file.display()))?;
    match args.format {
        OutputFormat::Text => println!("{}", output::summary(&snapshot)),
        OutputFormat::Json => output::print_json(&output::summary_json(&snapshot)),
    }
    Ok(())
}
