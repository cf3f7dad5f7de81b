//! User configuration
//!
//! Optional TOML file at `~/.config/flotilla/config.toml`. A missing file
//! means defaults; CLI flags override whatever is configured here.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::ssh::ExecOptions;

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("flotilla"))
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FlotillaConfig {
    /// Override for the inventory file location.
    pub inventory_path: Option<String>,
    /// ssh ConnectTimeout, in seconds.
    pub connect_timeout_secs: u64,
    /// Per-host deadline, in seconds. 0 disables the bound.
    pub command_timeout_secs: u64,
}

impl Default for FlotillaConfig {
    fn default() -> Self {
        Self {
            inventory_path: None,
            connect_timeout_secs: 10,
            command_timeout_secs: 300,
        }
    }
}

impl FlotillaConfig {
    /// Load config.toml, or defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = config_dir()?.join("config.toml");

        if !path.exists() {
            log::debug!("config file does not exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Resolve the inventory file location.
    pub fn inventory_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.inventory_path {
            return Ok(PathBuf::from(path));
        }
        Ok(config_dir()?.join("hosts.json"))
    }

    /// Execution tunables with this config's timeouts applied.
    pub fn exec_options(&self) -> ExecOptions {
        ExecOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            command_timeout: match self.command_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: FlotillaConfig = toml::from_str("").unwrap();
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.command_timeout_secs, 300);
        assert!(config.inventory_path.is_none());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config: FlotillaConfig = toml::from_str("command_timeout_secs = 60").unwrap();
        assert_eq!(config.command_timeout_secs, 60);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn full_file_parses() {
        let config: FlotillaConfig = toml::from_str(
            r#"
            inventory_path = "/tmp/hosts.json"
            connect_timeout_secs = 5
            command_timeout_secs = 120
            "#,
        )
        .unwrap();
        assert_eq!(config.inventory_path.as_deref(), Some("/tmp/hosts.json"));
        assert_eq!(config.connect_timeout_secs, 5);
        assert_eq!(config.command_timeout_secs, 120);
    }

    #[test]
    fn zero_command_timeout_disables_deadline() {
        let config = FlotillaConfig {
            command_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.exec_options().command_timeout.is_none());
    }

    #[test]
    fn timeouts_map_to_exec_options() {
        let config = FlotillaConfig {
            connect_timeout_secs: 3,
            command_timeout_secs: 42,
            ..Default::default()
        };
        let opts = config.exec_options();
        assert_eq!(opts.connect_timeout, Duration::from_secs(3));
        assert_eq!(opts.command_timeout, Some(Duration::from_secs(42)));
    }
}
