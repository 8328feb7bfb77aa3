//
//  bitbucket-provider
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! User-level defaults for the `bbp` binary, loaded from a TOML file in the
//! platform-specific configuration directory. Everything here is optional:
//! a missing file means built-in defaults.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/bbp/config.toml`
//! - **macOS**: `~/Library/Application Support/bbp/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\bbp\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [defaults]
//! manifest = "infra/bitbucket.toml"
//! state = "infra/bitbucket.tfstate.json"
//! ```
//!
//! Command-line flags always win over these values.
//!
//! ## Submodules
//!
//! - [`file`]: File I/O, including the atomic writes used for state
//! - [`hosts`]: API host helpers used as keyring keys

mod file;
mod hosts;

pub use file::*;
pub use hosts::*;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Manifest read when `--manifest` is not given.
pub const DEFAULT_MANIFEST: &str = "bitbucket.toml";

/// State file used when `--state` is not given.
pub const DEFAULT_STATE: &str = "bitbucket.tfstate.json";

/// User-level configuration for `bbp`.
///
/// # Examples
///
/// ```rust
/// use bitbucket_provider::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.manifest_path(None).to_str(), Some("bitbucket.toml"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
}

/// Default paths, relative to the working directory.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Defaults {
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    #[serde(default)]
    pub state: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the default location.
    ///
    /// A missing file is not an error; defaults are used.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Returns the path to the configuration file.
    ///
    /// The file may not exist; this only returns where it would be.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Resolves the manifest path: flag, then configured default, then
    /// [`DEFAULT_MANIFEST`].
    pub fn manifest_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.defaults.manifest.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST))
    }

    /// Resolves the state path the same way as [`manifest_path`](Self::manifest_path).
    pub fn state_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.defaults.state.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_defaults() {
        let config: Config = toml::from_str(
            r#"
            [defaults]
            manifest = "infra/bitbucket.toml"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.manifest_path(None),
            PathBuf::from("infra/bitbucket.toml")
        );
        assert_eq!(
            config.manifest_path(Some(Path::new("other.toml"))),
            PathBuf::from("other.toml")
        );
        assert_eq!(config.state_path(None), PathBuf::from(DEFAULT_STATE));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.defaults.manifest.is_none());
    }
}
