//! Configuration file management for sysfolio.
//!
//! Settings live in `<config_dir>/sysfolio/config.toml`
//! (`~/.config/sysfolio/config.toml` on Linux). A missing file means
//! defaults; a malformed one is an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FolioError, Result};
use crate::log_stream::DEFAULT_CAPACITY;
use crate::service::ServiceDirectory;
use crate::telemetry::{LoadTestConfig, DEFAULT_WINDOW};

/// Root configuration structure for config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SysfolioConfig {
    /// Optional TOML file replacing the canned service directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services_file: Option<PathBuf>,
    pub terminal: TerminalSettings,
    pub load_test: LoadTestSettings,
    pub log_stream: LogStreamSettings,
    pub api: ApiSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalSettings {
    pub prompt: String,
    /// Seed the history with the greeting record
    pub welcome: bool,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            prompt: "guest@portfolio:~$ ".to_string(),
            welcome: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadTestSettings {
    pub concurrent_users: u32,
    pub duration_secs: u32,
    pub tick_millis: u64,
    /// Rolling sample window size
    pub window: usize,
    /// Fixed RNG seed; entropy when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for LoadTestSettings {
    fn default() -> Self {
        let defaults = LoadTestConfig::default();
        Self {
            concurrent_users: defaults.concurrent_users(),
            duration_secs: defaults.duration_secs(),
            tick_millis: 1000,
            window: DEFAULT_WINDOW,
            seed: None,
        }
    }
}

impl LoadTestSettings {
    /// Validated load-test configuration from these settings.
    pub fn to_config(&self) -> Result<LoadTestConfig> {
        LoadTestConfig::new(self.concurrent_users, self.duration_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogStreamSettings {
    pub capacity: usize,
    pub tick_millis: u64,
}

impl Default for LogStreamSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            tick_millis: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the portfolio API serving `/api/profile`
    pub base_url: String,
    /// Issue the profile check before a load test starts
    pub probe: bool,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            probe: true,
            timeout_secs: 5,
        }
    }
}

impl SysfolioConfig {
    /// Returns the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| FolioError::config("Could not determine config directory"))?;
        Ok(dir.join("sysfolio").join("config.toml"))
    }

    /// Loads the configuration from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Loads the configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            FolioError::io(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            FolioError::config(format!(
                "Failed to parse configuration file at {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Builds the service directory: the configured file, or the canned list.
    pub fn service_directory(&self) -> Result<ServiceDirectory> {
        match &self.services_file {
            Some(path) => ServiceDirectory::load_from(path),
            None => Ok(ServiceDirectory::canned_now()),
        }
    }
}
