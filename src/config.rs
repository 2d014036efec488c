use serde::Deserialize;
use std::path::{Path, PathBuf};

use thiserror::Error;

// =============================================================================
// HTTP-related constants
// =============================================================================

/// Timeout for a single HTTP request in milliseconds (30 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Number of attempts for a request that keeps failing transiently
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubled on each further attempt
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// User agent sent with every HTTP request
pub const DEFAULT_USER_AGENT: &str = concat!("git/plugin-catalog-", env!("CARGO_PKG_VERSION"));

/// Icon shown in the plugin table when a manifest has no `iconUrl`
pub const DEFAULT_ICON_URL: &str =
    "https://raw.githubusercontent.com/endless-sky/endless-sky/master/images/outfit/unknown.png";

const APP_DIR: &str = "plugin-catalog";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Top-level tool configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogConfig {
    pub http: HttpConfig,
    pub table: TableConfig,
}

/// Settings shared by the remote listing and the URL checker
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpConfig {
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Total attempts for transient failures (1 disables retries)
    pub max_attempts: u32,
    /// Initial retry delay in milliseconds
    pub retry_backoff_ms: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Markdown table rendering settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    pub default_icon_url: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_icon_url: DEFAULT_ICON_URL.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, the default
    /// location is tried and a missing file yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = config_path();
                if path.is_file() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the path to the default config file.
/// Uses $XDG_CONFIG_HOME/plugin-catalog if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/plugin-catalog,
/// or ./plugin-catalog if neither is available.
pub fn config_path() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir()).join(CONFIG_FILE)
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join(APP_DIR)
}
