//! Project setup and service wiring
//!
//! - Configuration directory and default config file creation
//! - Database initialization
//! - Construction of the registry, coordinator and status reporter from a
//!   loaded [`Config`]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::adapters::cache::MokaTokenCache;
use crate::adapters::signal::RecordingSignalSink;
use crate::adapters::sqlite::{initialize_database, PoolConfig, SqliteSecretStore, SqliteTokenCache};
use crate::domain::models::{Config, TokenCacheBackend};
use crate::domain::ports::{ClientSignalSink, TokenCache};
use crate::services::{AuthStatusReporter, CacheCoordinator, CredentialRegistry};

/// Name of the project-local state directory.
pub const CONFIG_DIR_NAME: &str = ".credswitch";

/// Default configuration template content
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# credswitch configuration
# Override settings by editing this file, adding .credswitch/local.yaml, or
# setting environment variables with the CREDSWITCH_ prefix
#
# Example environment variables:
#   export CREDSWITCH_DATABASE__PATH=/custom/path/credswitch.db
#   export CREDSWITCH_LOGGING__LEVEL=debug
#   export CREDSWITCH_TOKEN_CACHE__INVALIDATION_TIMEOUT_MS=5000

# Database configuration
database:
  # Path to SQLite database file (project-local)
  path: ".credswitch/credswitch.db"

  # Maximum number of database connections in pool
  max_connections: 5

# Logging configuration (logs go to stderr)
logging:
  # Log level: trace, debug, info, warn, error
  level: "info"

  # Log format: json, pretty
  format: "pretty"

# Server-side token cache
token_cache:
  # Backend: sqlite (shared across invocations) or memory (process-local)
  backend: "sqlite"

  # Maximum lifetime of a cached token in seconds
  ttl_secs: 3600

  # Maximum number of cached tokens (memory backend)
  max_capacity: 64

  # Upper bound for one invalidation call; a slower cache fails the switch
  invalidation_timeout_ms: 2000

# Credential registry
registry:
  # Environments new credential sets may target
  allowed_environments:
    - sandbox
    - live
"#;

/// Setup paths and directories
#[derive(Debug, Clone)]
pub struct SetupPaths {
    pub root: PathBuf,
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub database_file: PathBuf,
}

impl SetupPaths {
    /// Get setup paths for the current directory
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::for_root(current_dir))
    }

    /// Setup paths below an explicit project root
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let config_dir = root.join(CONFIG_DIR_NAME);

        Self {
            config_file: config_dir.join("config.yaml"),
            database_file: config_dir.join("credswitch.db"),
            config_dir,
            root,
        }
    }

    /// Check if the project is already initialized
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists() && self.database_file.exists()
    }

    pub fn database_url(&self) -> String {
        format!("sqlite:{}", self.database_file.display())
    }
}

/// Create the configuration directory. Returns whether it was created.
pub fn create_config_dir(paths: &SetupPaths) -> Result<bool> {
    if paths.config_dir.exists() {
        return Ok(false);
    }

    fs::create_dir_all(&paths.config_dir).context("Failed to create config directory")?;
    Ok(true)
}

/// Write the default configuration file. Returns whether it was written.
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<bool> {
    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE).context("Failed to write config file")?;
    Ok(true)
}

/// Create the database if needed and apply pending migrations.
///
/// Migrations are idempotent, so this never touches stored credentials.
pub async fn run_migrations(paths: &SetupPaths) -> Result<()> {
    let pool = initialize_database(&paths.database_url(), None)
        .await
        .context("Failed to initialize database")?;
    pool.close().await;
    Ok(())
}

/// The wired service graph used by the CLI and embedders.
pub struct CredentialServices {
    pub registry: Arc<CredentialRegistry>,
    pub reporter: AuthStatusReporter,
    pub coordinator: Arc<CacheCoordinator>,
}

/// Signals a CLI invocation keeps for its own output.
const RECORDED_SIGNAL_LIMIT: usize = 32;

/// Build services for a short-lived CLI invocation. Client instructions are
/// recorded in a bounded in-memory sink that nobody subscribes to.
///
/// Long-running hosts should call [`build_services_with_sink`] with a sink
/// that delivers to their clients, such as `BroadcastSignalSink`.
pub async fn build_services(config: &Config) -> Result<CredentialServices> {
    build_services_with_sink(config, Arc::new(RecordingSignalSink::with_limit(RECORDED_SIGNAL_LIMIT)))
        .await
}

/// Build services backed by the configured database and `signals`.
pub async fn build_services_with_sink(
    config: &Config,
    signals: Arc<dyn ClientSignalSink>,
) -> Result<CredentialServices> {
    let pool_config = PoolConfig {
        max_connections: config.database.max_connections,
        min_connections: 1,
        ..PoolConfig::default()
    };
    let pool = initialize_database(&config.database.url(), Some(pool_config))
        .await
        .with_context(|| format!("Failed to open database at {}", config.database.path))?;

    let token_cache: Arc<dyn TokenCache> = match config.token_cache.backend {
        TokenCacheBackend::Sqlite => {
            Arc::new(SqliteTokenCache::with_ttl(pool.clone(), config.token_cache.ttl()))
        }
        TokenCacheBackend::Memory => Arc::new(MokaTokenCache::with_limits(
            config.token_cache.ttl(),
            config.token_cache.max_capacity,
        )),
    };
    debug!(backend = ?config.token_cache.backend, "token cache selected");

    let coordinator = Arc::new(CacheCoordinator::with_timeout(
        token_cache,
        signals,
        config.token_cache.invalidation_timeout(),
    ));
    let store = Arc::new(SqliteSecretStore::new(pool));
    let registry = Arc::new(
        CredentialRegistry::open(store, coordinator.clone(), &config.registry)
            .await
            .context("Failed to open credential registry")?,
    );
    let reporter = AuthStatusReporter::new(registry.clone());

    Ok(CredentialServices {
        registry,
        reporter,
        coordinator,
    })
}

/// Relative display form of `path` below `root`.
pub fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}
