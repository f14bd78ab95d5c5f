// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `joust.toml` configuration
//!
//! Every section and key is optional; `Config::default()` is a complete,
//! valid configuration.

use crate::tournament::{ColorAssignment, DrawPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value in {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Attempts per turn before the side forfeits
    pub max_retries: u32,
    #[serde(with = "humantime_serde")]
    pub move_timeout: Duration,
    pub show_legal_moves: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            move_timeout: Duration::from_secs(120),
            show_legal_moves: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TournamentConfig {
    pub draw_policy: DrawPolicy,
    pub colors: ColorAssignment,
    /// Extra games a drawn match may play under the rematch policy. A match
    /// still drawn after the last one is settled by seed: the lower seed
    /// advances.
    pub max_rematches: u32,
    pub rng_seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            draw_policy: DrawPolicy::Rematch,
            colors: ColorAssignment::Random,
            max_rematches: 10,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObserverConfig {
    #[serde(with = "humantime_serde")]
    pub min_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Appends beyond this many events fail
    pub max_events: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub game: GameConfig,
    pub tournament: TournamentConfig,
    pub observer: ObserverConfig,
    pub log: LogConfig,
}

impl Config {
    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.max_retries == 0 {
            return Err(ConfigError::Invalid {
                field: "game.max_retries",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.game.move_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "game.move_timeout",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.observer.min_delay.is_zero() {
            return Err(ConfigError::Invalid {
                field: "observer.min_delay",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.observer.min_delay > self.observer.max_delay {
            return Err(ConfigError::Invalid {
                field: "observer.min_delay",
                reason: format!(
                    "{:?} exceeds max_delay {:?}",
                    self.observer.min_delay, self.observer.max_delay
                ),
            });
        }
        if self.log.max_events == Some(0) {
            return Err(ConfigError::Invalid {
                field: "log.max_events",
                reason: "must be at least 1 when set".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
