use super::errors::ConfigError;
use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_MAX_CONCURRENCY,
    DEFAULT_PLAYER_BASE, DEFAULT_STORE_PATH,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::str::FromStr;
use tracing::Level;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinderPolicy {
    /// One channel at a time, stopping at the first live one
    Sequential,
    /// Every channel in flight at once, winner picked in list order
    #[default]
    Concurrent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    pub fn max_level(&self) -> Result<Level, ConfigError> {
        Level::from_str(&self.level).map_err(|_| ConfigError::InvalidLevel(self.level.clone()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivestreamConfig {
    pub policy: Option<FinderPolicy>,
    pub max_concurrency: Option<usize>,
    pub fetch_timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    pub player_base: Option<String>,
    pub autoplay: Option<bool>,
    pub cookies: Option<String>,
}

impl LivestreamConfig {
    pub fn policy(&self) -> FinderPolicy {
        self.policy.unwrap_or_default()
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY).max(1)
    }

    pub fn fetch_timeout_ms(&self) -> u64 {
        self.fetch_timeout_ms.unwrap_or(DEFAULT_FETCH_TIMEOUT_MS)
    }

    pub fn connect_timeout_ms(&self) -> u64 {
        self.connect_timeout_ms.unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS)
    }

    pub fn player_base(&self) -> &str {
        self.player_base
            .as_deref()
            .unwrap_or(DEFAULT_PLAYER_BASE)
            .trim_end_matches('/')
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    File,
    /// Nothing survives a restart
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    #[serde(default)]
    pub kind: StoreKind,
    pub path: Option<String>,
}

impl StoreConfig {
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(DEFAULT_STORE_PATH)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub port: u16,
    pub address: String,
    pub authorization: String,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub livestream: LivestreamConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;

        Self::from_json(path, &config)
    }

    pub fn from_json(path: &str, json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Config>(json).map_err(|source| ConfigError::Json {
            path: path.to_string(),
            source,
        })
    }

    pub fn max_level(&self) -> Result<Level, ConfigError> {
        match &self.logging {
            Some(logging) => logging.max_level(),
            None => Ok(Level::INFO),
        }
    }
}
