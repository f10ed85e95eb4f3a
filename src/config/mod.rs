//
//  bamboo-cli
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! This module handles loading, saving, and accessing the CLI's settings,
//! stored as TOML in a platform-specific directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/bamboo/config.toml`
//! - **macOS**: `~/Library/Application Support/bamboo/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\bamboo\config\config.toml`
//!
//! The `BAMBOO_CONFIG` environment variable points the CLI at another file.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [server]
//! host = "https://ci.example.com"
//! username = "jdoe"
//! password = "s3cret"
//!
//! [walker]
//! max_pages = 1000
//! max_chain_depth = 64
//! ```
//!
//! ## Precedence
//!
//! Command-line flags and `BAMBOO_*` environment variables override the file,
//! which overrides the built-in defaults.
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O operations
//! - [`server`]: Server connection settings

mod file;
mod server;

pub use file::*;
pub use server::*;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::WalkLimits;

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV: &str = "BAMBOO_CONFIG";

/// Keys understood by [`Config::get`] and [`Config::set`].
pub const KEYS: &[&str] = &["host", "username", "password", "max_pages", "max_chain_depth"];

/// Global configuration container.
///
/// # Fields
///
/// * `server` - Where and as whom to connect
/// * `walker` - Bounds for paginated and dependent-build walks
///
/// # Examples
///
/// ```rust
/// use bamboo_cli::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.walker.max_pages, 1000);
/// assert!(config.server.host.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub walker: WalkLimits,
}

impl Config {
    /// Loads configuration from the default location.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or is not valid TOML.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        write_config_file(path, &content)
    }

    /// Returns the path to the configuration file.
    ///
    /// `BAMBOO_CONFIG` wins when set; otherwise the platform configuration
    /// directory for `bamboo` is used. The file may not exist.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use bamboo_cli::config::Config;
    ///
    /// let path = Config::config_path()?;
    /// println!("Config file: {}", path.display());
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("", "", "bamboo")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Gets a configuration value by key.
    ///
    /// # Supported Keys
    ///
    /// | Key | Field |
    /// |-----|-------|
    /// | `"host"` | `server.host` |
    /// | `"username"` | `server.username` |
    /// | `"password"` | `server.password` |
    /// | `"max_pages"` | `walker.max_pages` |
    /// | `"max_chain_depth"` | `walker.max_chain_depth` |
    ///
    /// Returns `None` for unknown keys and unset values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bamboo_cli::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.get("max_chain_depth"), Some("64".to_string()));
    /// assert_eq!(config.get("host"), None);
    /// assert_eq!(config.get("unknown_key"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "host" => self.server.host.clone(),
            "username" => self.server.username.clone(),
            "password" => self.server.password.clone(),
            "max_pages" => Some(self.walker.max_pages.to_string()),
            "max_chain_depth" => Some(self.walker.max_chain_depth.to_string()),
            _ => None,
        }
    }

    /// Sets a configuration value by key.
    ///
    /// Hosts are normalized with [`normalize_host`]; limits must be positive
    /// integers. Changes are only persisted by [`Config::save`].
    ///
    /// # Errors
    ///
    /// Fails for unknown keys and for limits that are not positive integers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bamboo_cli::config::Config;
    ///
    /// let mut config = Config::default();
    /// config.set("host", "ci.example.com:8085")?;
    /// assert_eq!(config.get("host"), Some("http://ci.example.com:8085".to_string()));
    /// assert!(config.set("max_pages", "zero").is_err());
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "host" => self.server.host = Some(normalize_host(value)),
            "username" => self.server.username = Some(value.to_string()),
            "password" => self.server.password = Some(value.to_string()),
            "max_pages" => self.walker.max_pages = parse_limit(key, value)?,
            "max_chain_depth" => self.walker.max_chain_depth = parse_limit(key, value)?,
            _ => bail!("Unknown config key '{}'. Valid keys: {}", key, KEYS.join(", ")),
        }
        Ok(())
    }

    /// Resets a configuration value to its default.
    ///
    /// Returns `false` for unknown keys.
    pub fn unset(&mut self, key: &str) -> bool {
        let defaults = WalkLimits::default();
        match key {
            "host" => self.server.host = None,
            "username" => self.server.username = None,
            "password" => self.server.password = None,
            "max_pages" => self.walker.max_pages = defaults.max_pages,
            "max_chain_depth" => self.walker.max_chain_depth = defaults.max_chain_depth,
            _ => return false,
        }
        true
    }
}

fn parse_limit(key: &str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => bail!("'{}' must be a positive integer, got '{}'", key, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set("host", "https://ci.example.com/").unwrap();
        config.set("username", "jdoe").unwrap();
        config.set("max_chain_depth", "8").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.server.host.as_deref(), Some("https://ci.example.com"));
        assert_eq!(loaded.walker.max_chain_depth, 8);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nhost = \"http://ci:8085\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.host.as_deref(), Some("http://ci:8085"));
        assert_eq!(config.walker, WalkLimits::default());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_set_rejects_unknown_key_and_bad_limit() {
        let mut config = Config::default();
        assert!(config.set("editor", "vim").is_err());
        assert!(config.set("max_pages", "0").is_err());
        assert!(config.set("max_pages", "-3").is_err());
        assert_eq!(config.walker.max_pages, 1000);
    }

    #[test]
    fn test_unset_restores_defaults() {
        let mut config = Config::default();
        config.set("password", "p").unwrap();
        config.set("max_pages", "3").unwrap();

        assert!(config.unset("password"));
        assert!(config.unset("max_pages"));
        assert!(!config.unset("nope"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_every_key_is_readable() {
        let mut config = Config::default();
        for key in KEYS {
            config.set(key, "7").unwrap();
            assert!(config.get(key).is_some(), "{key}");
        }
    }
}
