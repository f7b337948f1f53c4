//! The `Config` struct and its YAML persistence.
//!
//! Covers:
//! - `load` / `save` (YAML file I/O with atomic write)
//! - path helpers (`config_dir`, `config_path`, `state_dir`)
//! - `validate`

use crate::defaults;
use crate::error::ConfigError;
use crate::types::{LogLevel, NewWindowDimensions, RestoreWindows, WindowReusePolicy};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User configuration consulted by the window orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Whether folders open in a new window (on), the last active window (off),
    /// or as the open context decides (default)
    #[serde(default)]
    pub open_folders_in_new_window: WindowReusePolicy,

    /// Whether files open in a new window. Defaults to `off`: files go to the
    /// window that contains them, or the last active window
    #[serde(default = "crate::defaults::open_files_in_new_window")]
    pub open_files_in_new_window: WindowReusePolicy,

    /// Whether a request without any path opens a fresh empty window instead
    /// of focusing the last active one
    #[serde(default = "crate::defaults::bool_true")]
    pub open_without_arguments_in_new_window: bool,

    /// Which previously open windows are reconstructed at startup
    #[serde(default)]
    pub restore_windows: RestoreWindows,

    /// Size and mode of brand-new windows
    #[serde(default)]
    pub new_window_dimensions: NewWindowDimensions,

    /// Width of a default-sized window in logical pixels
    #[serde(default = "crate::defaults::default_window_width")]
    pub default_window_width: u32,

    /// Height of a default-sized window in logical pixels
    #[serde(default = "crate::defaults::default_window_height")]
    pub default_window_height: u32,

    /// File extension (without the dot) identifying workspace config files
    #[serde(default = "crate::defaults::workspace_file_extension")]
    pub workspace_file_extension: String,

    /// Maximum number of entries kept in the recently opened list
    #[serde(default = "crate::defaults::max_recent_entries")]
    pub max_recent_entries: usize,

    /// Debug log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            open_folders_in_new_window: WindowReusePolicy::default(),
            open_files_in_new_window: defaults::open_files_in_new_window(),
            open_without_arguments_in_new_window: defaults::bool_true(),
            restore_windows: RestoreWindows::default(),
            new_window_dimensions: NewWindowDimensions::default(),
            default_window_width: defaults::default_window_width(),
            default_window_height: defaults::default_window_height(),
            workspace_file_extension: defaults::workspace_file_extension(),
            max_recent_entries: defaults::max_recent_entries(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if !config_path.exists() {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        if contents.trim().is_empty() {
            log::info!("Config file {:?} is empty, using defaults", path);
            return Ok(Self::default());
        }

        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;
        config.validate()?;

        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let yaml = serde_yaml_ng::to_string(self).context("Failed to serialize config")?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)
            .with_context(|| format!("Failed to write config to {:?}", temp_path))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to move config into place at {:?}", path))?;

        log::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject values the orchestrator cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_window_width == 0 || self.default_window_height == 0 {
            return Err(ConfigError::Validation(format!(
                "default window size must be non-zero (got {}x{})",
                self.default_window_width, self.default_window_height
            )));
        }
        let ext = self.workspace_file_extension.trim_start_matches('.');
        if ext.is_empty() {
            return Err(ConfigError::Validation(
                "workspace_file_extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Workspace extension without a leading dot
    pub fn workspace_extension(&self) -> &str {
        self.workspace_file_extension.trim_start_matches('.')
    }

    /// Directory holding the config file
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("par-windows")
    }

    /// Path of the YAML config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Directory for runtime state (window state slot, ad-hoc workspaces)
    pub fn state_dir() -> PathBuf {
        dirs::data_local_dir()
            .or_else(dirs::config_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("par-windows")
    }
}
