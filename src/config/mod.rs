//! Configuration module - environment variable parsing

use std::env;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Number of arena instances to run
    pub arena_count: usize,
    /// Maximum players per arena
    pub max_players: usize,
    /// Seconds an arena waits for players before starting partially full
    pub join_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            arena_count: parse_or("ARENA_COUNT", 3)?,
            max_players: parse_or("MAX_PLAYERS", 4)?,
            join_timeout_secs: parse_or("JOIN_TIMEOUT_SECS", 40)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            arena_count: 3,
            max_players: 4,
            join_timeout_secs: 40,
        }
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
