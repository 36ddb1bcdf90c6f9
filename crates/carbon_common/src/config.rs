//! Configuration for carbond and carbonctl.
//!
//! Both read TOML with per-field defaults, then apply environment
//! overrides. A missing file means defaults; a file that exists but can't
//! be read or parsed is an error.

use crate::error::CarbonError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// System config file for carbond
pub const SERVER_CONFIG_PATH: &str = "/etc/carbon/carbond.toml";

/// Server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Sender address for welcome and tip emails
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// Maximum entries returned by the history endpoint
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_from_email() -> String {
    "noreply@carbontracker.com".to_string()
}

fn default_history_limit() -> usize {
    50
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            allowed_origins: default_allowed_origins(),
            from_email: default_from_email(),
            history_limit: default_history_limit(),
        }
    }
}

impl ServerConfig {
    /// Load from `$CARBOND_CONFIG` or the system path, then apply env overrides
    pub fn load() -> Result<Self, CarbonError> {
        let path = std::env::var("CARBOND_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(SERVER_CONFIG_PATH));
        let mut config: ServerConfig = load_toml_or_default(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overrides: `CARBOND_BIND`, `ALLOWED_ORIGINS` (comma separated), `FROM_EMAIL`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("CARBOND_BIND") {
            self.bind_addr = bind;
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            let parsed: Vec<String> = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
            if !parsed.is_empty() {
                self.allowed_origins = parsed;
            }
        }
        if let Some(from) = lookup("FROM_EMAIL") {
            self.from_email = from;
        }
    }
}

/// Client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attached to calculations so the server records history
    #[serde(default)]
    pub user_email: Option<String>,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            user_email: None,
        }
    }
}

impl ClientConfig {
    /// `$CARBONCTL_CONFIG`, else `$XDG_CONFIG_HOME/carbon/ctl.toml`
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("CARBONCTL_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("carbon").join("ctl.toml"))
    }

    pub fn load() -> Result<Self, CarbonError> {
        let mut config = match Self::config_path() {
            Some(path) => load_toml_or_default(&path)?,
            None => ClientConfig::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overrides: `CARBON_API_URL`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CARBON_API_URL") {
            self.api_url = url;
        }
    }
}

/// Parse a TOML file, or fall back to `T::default()` when it does not exist
pub fn load_toml_or_default<T>(path: &Path) -> Result<T, CarbonError>
where
    T: Default + for<'de> Deserialize<'de>,
{
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(T::default());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| CarbonError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&contents)
        .map_err(|e| CarbonError::Config(format!("Failed to parse {}: {}", path.display(), e)))
}
