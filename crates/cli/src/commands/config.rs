// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config command

use crate::settings::{self, DEFAULT_CONFIG};
use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use joust_core::Config;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Validate a config file
    Check {
        /// File to check (defaults to --config, then ./joust.toml)
        path: Option<PathBuf>,
    },
    /// Print the effective configuration
    Show,
}

pub fn handle(args: ConfigArgs, explicit: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommand::Check { path } => {
            let path = path
                .or_else(|| settings::locate(explicit))
                .ok_or_else(|| anyhow!("no config file given and no {} found", DEFAULT_CONFIG))?;
            Config::load(&path).with_context(|| format!("invalid config {}", path.display()))?;
            println!("{}: ok", path.display());
        }
        ConfigCommand::Show => {
            let config = settings::load(explicit)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
