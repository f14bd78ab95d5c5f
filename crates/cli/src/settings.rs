// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config file discovery

use anyhow::{Context, Result};
use joust_core::Config;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "joust.toml";

/// The file to read: `explicit`, else `./joust.toml` when it exists
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG);
            local.exists().then_some(local)
        }
    }
}

/// Load and validate the config, falling back to defaults without a file
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    match locate(explicit) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            Config::load(&path).with_context(|| format!("invalid config {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}
