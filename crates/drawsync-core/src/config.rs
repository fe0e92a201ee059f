//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/drawsync/config.toml)
//! 3. Environment variables (DRAWSYNC_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable prefix
const ENV_PREFIX: &str = "DRAWSYNC";

/// Default GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default value for the `X-GitHub-Api-Version` header
pub const DEFAULT_API_VERSION: &str = "2022-11-28";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for local state (key-value store, logs)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API version sent with every request
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Name of the repository holding the synced document
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Description used when the repository is created
    #[serde(default = "default_repository_description")]
    pub repository_description: String,

    /// Whether the repository is created private
    #[serde(default = "default_true")]
    pub private_repository: bool,

    /// Path of the document inside the repository
    #[serde(default = "default_document_path")]
    pub document_path: String,

    /// Timeout for a whole push or pull, also applied per request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log file path (defaults to {data_dir}/debug.log)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            api_url: default_api_url(),
            api_version: default_api_version(),
            repository: default_repository(),
            repository_description: default_repository_description(),
            private_repository: true,
            document_path: default_document_path(),
            timeout_secs: default_timeout_secs(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (DRAWSYNC_DATA_DIR, DRAWSYNC_API_URL, ...)
    /// 2. Config file (~/.config/drawsync/config.toml or DRAWSYNC_CONFIG)
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
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {:?}", path))?;
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every sync fail
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!(
                "timeout_secs must be at least 1 (set in the config file or DRAWSYNC_TIMEOUT_SECS)"
            );
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_API_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.api_url = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_REPOSITORY", ENV_PREFIX)) {
            if !val.is_empty() {
                self.repository = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_DOCUMENT_PATH", ENV_PREFIX)) {
            if !val.is_empty() {
                self.document_path = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_TIMEOUT_SECS", ENV_PREFIX)) {
            if let Ok(secs) = val.parse() {
                self.timeout_secs = secs;
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<()> {
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
    /// Can be overridden with DRAWSYNC_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("drawsync")
            .join("config.toml")
    }

    /// Get the path to the local key-value store
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("store.json")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("debug.log"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("drawsync")
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_repository() -> String {
    "drawsync-data".to_string()
}

fn default_repository_description() -> String {
    "Automatically created by drawsync to save drawing data".to_string()
}

fn default_document_path() -> String {
    "data.json".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}
