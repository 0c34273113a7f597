//! Server configuration.
//!
//! Defaults are overridden by an optional TOML file, which is in turn
//! overridden by command-line flags and environment variables in the binary.

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::storage::pg::default_pool_size;

/// Used when no secret is configured. Tokens signed with it are only fit for
/// local development.
pub const DEV_SECRET_KEY: &str = "snake-showdown-dev-secret-change-in-production";

pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Unset means the in-memory store.
    pub database_url: Option<String>,
    pub pool_size: usize,
    pub secret_key: String,
    pub token_ttl_days: i64,
    pub leaderboard_default_limit: usize,
    pub rpg_default_limit: usize,
    /// Upper bound applied to any caller-supplied `limit`.
    pub max_limit: usize,
    pub seed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            database_url: None,
            pool_size: default_pool_size(),
            secret_key: DEV_SECRET_KEY.to_string(),
            token_ttl_days: 7,
            leaderboard_default_limit: 100,
            rpg_default_limit: 10,
            max_limit: 500,
            seed: false,
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("pool_size", &self.pool_size)
            .field("secret_key", &"[REDACTED]")
            .field("token_ttl_days", &self.token_ttl_days)
            .field("leaderboard_default_limit", &self.leaderboard_default_limit)
            .field("rpg_default_limit", &self.rpg_default_limit)
            .field("max_limit", &self.max_limit)
            .field("seed", &self.seed)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ServerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.is_empty() {
            return Err(ConfigError::Invalid("secret_key must not be empty".into()));
        }
        if self.token_ttl_days <= 0 || self.token_ttl_days > MAX_TOKEN_TTL_DAYS {
            return Err(ConfigError::Invalid(format!(
                "token_ttl_days must be between 1 and {}",
                MAX_TOKEN_TTL_DAYS
            )));
        }
        if self.max_limit == 0 {
            return Err(ConfigError::Invalid("max_limit must be positive".into()));
        }
        if self.leaderboard_default_limit == 0 || self.rpg_default_limit == 0 {
            return Err(ConfigError::Invalid("default limits must be positive".into()));
        }
        Ok(())
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.secret_key == DEV_SECRET_KEY
    }

    /// Clamps a caller-supplied limit into `[1, max_limit]`.
    pub fn clamp_limit(&self, requested: Option<usize>, default: usize) -> usize {
        requested.unwrap_or(default).clamp(1, self.max_limit)
    }
}
