//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/ploy/config.toml)
//! 3. Environment variables (PLOY_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::storage::persistence::DEFAULT_CAPACITY_BYTES;

/// Environment variable prefix
const ENV_PREFIX: &str = "PLOY";

/// Default autosave quiet period in milliseconds
const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 300;

/// Keys accepted by [`Config::set`]
pub const CONFIG_KEYS: &[&str] = &[
    "data_dir",
    "autosave_delay_ms",
    "storage_capacity_bytes",
    "log_file",
    "log_level",
];

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the document, backup and device id slots
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Quiet period before a debounced save is written
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,

    /// Capacity that storage usage is reported against (not enforced)
    #[serde(default = "default_storage_capacity")]
    pub storage_capacity_bytes: usize,

    /// Log file path (optional, logs go to stderr when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Log level for ploy crates (e.g. "debug"); `PLOY_LOG` takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            storage_capacity_bytes: DEFAULT_CAPACITY_BYTES,
            log_file: None,
            log_level: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (PLOY_DATA_DIR, PLOY_AUTOSAVE_DELAY_MS, ...)
    /// 2. Config file (~/.config/ploy/config.toml or PLOY_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // PLOY_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // PLOY_AUTOSAVE_DELAY_MS
        if let Ok(val) = std::env::var(format!("{}_AUTOSAVE_DELAY_MS", ENV_PREFIX)) {
            self.autosave_delay_ms = val
                .parse()
                .with_context(|| format!("Invalid PLOY_AUTOSAVE_DELAY_MS: {:?}", val))?;
        }

        // PLOY_STORAGE_CAPACITY
        if let Ok(val) = std::env::var(format!("{}_STORAGE_CAPACITY", ENV_PREFIX)) {
            self.storage_capacity_bytes = val
                .parse()
                .with_context(|| format!("Invalid PLOY_STORAGE_CAPACITY: {:?}", val))?;
        }

        // PLOY_LOG_FILE
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        Ok(())
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Set a value by key, as `ploy config set` does
    ///
    /// An empty value or `none` clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let cleared = value.is_empty() || value == "none";
        match key {
            "data_dir" => self.data_dir = PathBuf::from(value),
            "autosave_delay_ms" => {
                self.autosave_delay_ms = value
                    .parse()
                    .context("Invalid value for autosave_delay_ms. Use a number of milliseconds.")?;
            }
            "storage_capacity_bytes" => {
                self.storage_capacity_bytes = value
                    .parse()
                    .context("Invalid value for storage_capacity_bytes. Use a number of bytes.")?;
            }
            "log_file" => self.log_file = (!cleared).then(|| PathBuf::from(value)),
            "log_level" => self.log_level = (!cleared).then(|| value.to_string()),
            _ => bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                CONFIG_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with PLOY_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ploy")
            .join("config.toml")
    }

    /// Quiet period for debounced saves
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ploy")
}

fn default_autosave_delay_ms() -> u64 {
    DEFAULT_AUTOSAVE_DELAY_MS
}

fn default_storage_capacity() -> usize {
    DEFAULT_CAPACITY_BYTES
}
