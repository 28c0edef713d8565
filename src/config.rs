//! Configuration file handling for ascii-noise.
//!
//! Loads configuration from `~/.config/ascii-noise/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::NoiseError;
use crate::settings::{SettingsStore, SettingsUpdate};

/// Configuration file structure for ascii-noise.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Global defaults, applied through [`SettingsStore::configure`].
    #[serde(default)]
    pub defaults: SettingsUpdate,
    #[serde(default)]
    pub terminal: TerminalConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerminalConfig {
    #[serde(default = "default_cols")]
    pub cols: u16,
    #[serde(default = "default_rows")]
    pub rows: u16,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            rows: default_rows(),
        }
    }
}

fn default_cols() -> u16 {
    80
}

fn default_rows() -> u16 {
    24
}

impl Config {
    /// Load configuration.
    ///
    /// With `None` the default path is used and a missing file yields the
    /// default config. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::NotFound { path });
            }
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            source: e,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply the `[defaults]` table to `store`.
    ///
    /// Goes through the same validation as any other settings update.
    pub fn apply(&self, store: &SettingsStore) -> Result<(), ConfigError> {
        if self.defaults.is_empty() {
            return Ok(());
        }
        store
            .configure(self.defaults.clone())
            .map_err(ConfigError::Invalid)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file '{}' not found", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Config defaults rejected: {0}")]
    Invalid(NoiseError),
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("ascii-noise").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/ascii-noise/config.toml")
        })
}

/// Commented config written by `ascii-noise config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# ascii-noise configuration

[defaults]
# Text handed to the image source
# content = "STATIC"
# Characters drawn into the noise
# letters = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789"
# Words occasionally written over runs of filled cells
# words = ["signal", "noise"]
# font_family = "monospace"
# normal, bold, bolder, lighter or "100" through "900"
# font_weight = "900"
# Milliseconds between frames
# tick_interval_ms = 50

[terminal]
# Size of the terminal surface in character cells
cols = 80
rows = 24
"#;
