//! Process configuration.
//!
//! Resolution order: built-in defaults, then the JSON file named by `MEETDESK_CONFIG`
//! (or `~/.meetdesk/config.json` when it exists), then environment overrides.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_ENV: &str = "MEETDESK_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Invalid bind address {0}")]
    InvalidAddress(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    /// Load the demo fixture into the empty store at startup.
    pub seed_demo_data: bool,
    pub log_filter: String,
    pub log_format: LogFormat,
    pub stats_latency_budget_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            seed_demo_data: true,
            log_filter: "info".to_string(),
            log_format: LogFormat::Text,
            stats_latency_budget_ms: 100,
        }
    }
}

impl Config {
    /// Resolve config from the file system and process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.with_env_overrides(|var| std::env::var(var).ok())
    }

    /// Read a config file. Fields missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `PORT`, `MEETDESK_BIND` and `MEETDESK_SEED` from `lookup`.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(port) = lookup("PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(bind) = lookup("MEETDESK_BIND") {
            self.bind_address = bind;
        }
        if let Some(seed) = lookup("MEETDESK_SEED") {
            self.seed_demo_data = match seed.trim().to_ascii_lowercase().as_str() {
                "0" | "false" => false,
                "1" | "true" => true,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: "MEETDESK_SEED",
                        value: seed,
                    })
                }
            };
        }
        Ok(self)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.bind_address, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidAddress(raw))
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".meetdesk").join("config.json"))
}
