//! Game configuration.
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! standard rules.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::board::province::SUPPLY_CENTER_COUNT;

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("victory threshold {0} is outside 1..=34")]
    VictoryThreshold(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Supply centers needed to win outright.
    pub victory_centers: usize,
    /// Year of the first Spring Movement phase of a new game.
    pub start_year: u16,
    /// Whether `Game` keeps every past state.
    pub keep_history: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config { victory_centers: 18, start_year: 1901, keep_history: true }
    }
}

impl Config {
    /// Loads a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let data = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Config::from_json(&data)
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.victory_centers == 0 || self.victory_centers > SUPPLY_CENTER_COUNT {
            return Err(ConfigError::VictoryThreshold(self.victory_centers));
        }
        Ok(())
    }
}
