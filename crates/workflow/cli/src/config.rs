//! CLI configuration

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// Log filter directive, used when `RUST_LOG` is unset
    pub log_filter: Option<String>,

    /// Roles assumed by `route` and `check-access` when no `--role` is given
    pub default_roles: Vec<String>,

    /// Permissions assumed when no `--perm` is given
    pub default_permissions: Vec<String>,

    /// Default output format
    pub output: OutputFormat,
}

impl CliConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };
        Self::load_from(&config_path)
    }

    /// Load from an explicit path; a missing file yields the defaults
    pub fn load_from(config_path: &Path) -> CliResult<Self> {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)?;
            let config: CliConfig =
                toml::from_str(&contents).map_err(|e| CliError::Config(e.to_string()))?;
            tracing::debug!(path = %config_path.display(), "Loaded configuration");
            Ok(config)
        } else {
            Ok(CliConfig::default())
        }
    }

    /// Render as TOML
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Roles from the command line, or the configured defaults
    pub fn roles_or_default(&self, roles: Vec<String>) -> Vec<String> {
        if roles.is_empty() {
            self.default_roles.clone()
        } else {
            roles
        }
    }

    /// Permissions from the command line, or the configured defaults
    pub fn permissions_or_default(&self, perms: Vec<String>) -> Vec<String> {
        if perms.is_empty() {
            self.default_permissions.clone()
        } else {
            perms
        }
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("routeflow").join("config.toml"))
    }
}
