//! Configuration management for scoutbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "scoutbook";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "scoutbook.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SCOUTBOOK_`)
/// 2. TOML config file at `~/.config/scoutbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Roster editing configuration.
    pub roster: RosterConfig,
    /// Match breakdown chart configuration.
    pub breakdown: BreakdownConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/scoutbook/scoutbook.db`
    pub database_path: Option<PathBuf>,
}

/// Roster-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Delay after the last field edit before the roster is written.
    pub debounce_ms: u64,
}

/// How teams are ordered before the breakdown is truncated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamOrder {
    /// Plain string comparison, so "10" sorts before "9".
    #[default]
    Lexicographic,
    /// Integer comparison for numeric team numbers; anything else after them.
    Numeric,
}

/// Breakdown chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakdownConfig {
    /// Maximum number of teams included in the per-category breakdown.
    pub max_teams: usize,
    /// Ordering applied to team numbers before truncation.
    pub team_order: TeamOrder,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self { debounce_ms: 100 }
    }
}

impl Default for BreakdownConfig {
    fn default() -> Self {
        Self {
            max_teams: 8,
            team_order: TeamOrder::Lexicographic,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `SCOUTBOOK_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("SCOUTBOOK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.roster.debounce_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "roster.debounce_ms must be greater than 0".to_string(),
            });
        }

        if self.breakdown.max_teams == 0 {
            return Err(Error::ConfigValidation {
                message: "breakdown.max_teams must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the roster debounce delay as a Duration.
    #[must_use]
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.roster.debounce_ms)
    }
}
