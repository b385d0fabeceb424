use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::version::filter::FilterConfig;

// =============================================================================
// Constants
// =============================================================================

/// Default connect timeout for remote requests in milliseconds (30 seconds)
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 30_000;

/// Environment variable holding the optional bearer credential
pub const TOKEN_ENV: &str = "GITHUB_API_TOKEN";

/// Environment variable overriding the configured repository
pub const REPOSITORY_ENV: &str = "VERSION_CATALOG_REPOSITORY";

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "VERSION_CATALOG_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("No repository configured for {0}")]
    MissingRepository(String),
}

/// Plugin configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginConfig {
    /// Tool name used in diagnostics and as the shim name
    pub tool_name: String,
    /// Remote repository the versions are listed from
    pub repository: String,
    pub source: SourceKind,
    pub filter: FilterConfig,
    /// Version prefix removed from tag names before comparison
    pub strip_prefix: String,
    pub connect_timeout_ms: u64,
    /// Optional bearer credential for the remote
    pub api_token: Option<String>,
    pub build: BuildConfig,
    pub shim: ShimConfig,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            tool_name: "tool".to_string(),
            repository: String::new(),
            source: SourceKind::default(),
            filter: FilterConfig::default(),
            strip_prefix: "v".to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            api_token: None,
            build: BuildConfig::default(),
            shim: ShimConfig::default(),
        }
    }
}

/// How tags are listed
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    #[default]
    SmartHttp,
    GitCommand,
}

/// Build command configuration
///
/// `command`, `artifact` and `runtimeDir` accept the placeholders `{os}`,
/// `{arch}`, `{tool}` and `{source}`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
    /// Program and arguments, run in the source directory
    pub command: Vec<String>,
    /// Built binary, relative to the source directory
    pub artifact: String,
    /// Directory with runtime files to install next to the binary
    pub runtime_dir: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: vec!["make".to_string()],
            artifact: "build/bin/{tool}".to_string(),
            runtime_dir: None,
        }
    }
}

/// Shim configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ShimConfig {
    /// Variables exported before the real binary runs; `{install}` expands to
    /// the install path
    pub env: BTreeMap<String, String>,
}

/// Values read from the process environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    pub api_token: Option<String>,
    pub repository: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            api_token: non_empty_var(TOKEN_ENV),
            repository: non_empty_var(REPOSITORY_ENV),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl PluginConfig {
    /// Loads the config file (if any) and applies environment overrides
    pub fn load(path: Option<&Path>, overrides: EnvOverrides) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(overrides).validated()
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn with_overrides(mut self, overrides: EnvOverrides) -> Self {
        if let Some(token) = overrides.api_token {
            self.api_token = Some(token);
        }
        if let Some(repository) = overrides.repository {
            self.repository = repository;
        }
        self
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.repository.trim().is_empty() {
            return Err(ConfigError::MissingRepository(self.tool_name));
        }
        Ok(self)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Returns the path to the data directory for version-catalog.
/// Uses $XDG_DATA_HOME/version-catalog if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/version-catalog,
/// or ./version-catalog if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("version-catalog.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("version-catalog")
}
