use serde::{Deserialize, Serialize};

use super::credential::Environment;

/// Main configuration structure for credswitch
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Token cache configuration
    #[serde(default)]
    pub token_cache: TokenCacheConfig,

    /// Credential registry configuration
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".credswitch/credswitch.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// sqlx connection URL for the configured path.
    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}

/// Which token cache implementation backs the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCacheBackend {
    /// Shared `SQLite` table, survives restarts
    Sqlite,
    /// Process-local moka cache
    Memory,
}

/// Token cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TokenCacheConfig {
    /// Cache backend
    #[serde(default = "default_token_backend")]
    pub backend: TokenCacheBackend,

    /// Maximum lifetime of a cached token in seconds
    #[serde(default = "default_token_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum number of cached tokens (memory backend)
    #[serde(default = "default_token_capacity")]
    pub max_capacity: u64,

    /// Upper bound for a single invalidation call in milliseconds
    #[serde(default = "default_invalidation_timeout_ms")]
    pub invalidation_timeout_ms: u64,
}

const fn default_token_backend() -> TokenCacheBackend {
    TokenCacheBackend::Sqlite
}

const fn default_token_ttl_secs() -> u64 {
    3600
}

const fn default_token_capacity() -> u64 {
    64
}

const fn default_invalidation_timeout_ms() -> u64 {
    2000
}

impl Default for TokenCacheConfig {
    fn default() -> Self {
        Self {
            backend: default_token_backend(),
            ttl_secs: default_token_ttl_secs(),
            max_capacity: default_token_capacity(),
            invalidation_timeout_ms: default_invalidation_timeout_ms(),
        }
    }
}

impl TokenCacheConfig {
    pub fn invalidation_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.invalidation_timeout_ms)
    }

    pub fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ttl_secs)
    }
}

/// Credential registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistryConfig {
    /// Environments new credential sets may target
    #[serde(default = "default_allowed_environments")]
    pub allowed_environments: Vec<Environment>,
}

fn default_allowed_environments() -> Vec<Environment> {
    Environment::ALL.to_vec()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            allowed_environments: default_allowed_environments(),
        }
    }
}
