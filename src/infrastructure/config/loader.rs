use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Longest a single cache invalidation may be allowed to block a switch.
pub const MAX_INVALIDATION_TIMEOUT_MS: u64 = 30_000;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid invalidation_timeout_ms: {0}. Must be between 1 and {MAX_INVALIDATION_TIMEOUT_MS}")]
    InvalidInvalidationTimeout(u64),

    #[error("Invalid token cache max_capacity: {0}. Must be at least 1")]
    InvalidTokenCapacity(u64),

    #[error("registry.allowed_environments must name at least one environment")]
    NoAllowedEnvironments,

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .credswitch/config.yaml (project config, created by init)
    /// 3. .credswitch/local.yaml (local overrides, optional)
    /// 4. Environment variables (CREDSWITCH_* prefix, `__` separates sections)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".credswitch/config.yaml"))
            .merge(Yaml::file(".credswitch/local.yaml"))
            .merge(Env::prefixed("CREDSWITCH_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("CREDSWITCH_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let timeout = config.token_cache.invalidation_timeout_ms;
        if timeout == 0 || timeout > MAX_INVALIDATION_TIMEOUT_MS {
            return Err(ConfigError::InvalidInvalidationTimeout(timeout));
        }

        if config.token_cache.max_capacity == 0 {
            return Err(ConfigError::InvalidTokenCapacity(
                config.token_cache.max_capacity,
            ));
        }

        if config.token_cache.ttl_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "token_cache.ttl_secs must be positive".to_string(),
            ));
        }

        if config.registry.allowed_environments.is_empty() {
            return Err(ConfigError::NoAllowedEnvironments);
        }

        Ok(())
    }
}
