use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::connect::{
    BackoffPolicy, ConnectionAcquirer, ConnectionConfig, Endpoint, FailureClassifier, PgOpener,
};

/// Environment variable that overrides `[database] connection`.
pub const CONNECTION_ENV: &str = "PANTRY_DATABASE";

/// Startup configuration problems. Never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("database connection descriptor is not configured (set [database] connection or PANTRY_DATABASE)")]
    MissingConnection,
    #[error("invalid database connection descriptor: {0}")]
    InvalidConnection(String),
    #[error("invalid retry settings: {0}")]
    InvalidRetry(String),
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of connection attempts (including the first).
    pub max_attempts: u32,
    /// Delay after the first failed attempt, in milliseconds; doubles per attempt.
    pub base_delay_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_delay_ms: u64,
    /// Also retry password/role failures (28P01, 28000). Off unless diagnosing.
    pub retry_auth_failures: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
            retry_auth_failures: false,
        }
    }
}

/// `[database]` section. Missing keys take their `Default` values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `Host=..;Port=..;Database=..;Username=..;Password=..` or a `postgres://` URL.
    pub connection: String,
    /// Hosts substituted for the primary on later attempts (attempt 2 uses the first).
    pub fallback_hosts: Vec<String>,
    /// Per-attempt handshake timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Run `SELECT 1` on each fresh session before handing it out.
    pub validate_on_open: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection: String::new(),
            fallback_hosts: vec!["127.0.0.1".to_string()],
            connect_timeout_secs: 15,
            validate_on_open: true,
        }
    }
}

/// Global configuration loaded from `~/.config/pantry/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PantryConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl PantryConfig {
    /// Replace the descriptor with `PANTRY_DATABASE` when that variable is set and non-blank.
    pub fn apply_env_override(&mut self) {
        if let Ok(v) = std::env::var(CONNECTION_ENV) {
            if !v.trim().is_empty() {
                tracing::debug!("connection descriptor taken from {}", CONNECTION_ENV);
                self.database.connection = v;
            }
        }
    }

    pub fn connection_config(&self) -> Result<ConnectionConfig, ConfigError> {
        let fallbacks = self
            .database
            .fallback_hosts
            .iter()
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect();
        ConnectionConfig::from_descriptor(&self.database.connection, fallbacks)
    }

    pub fn backoff_policy(&self) -> Result<BackoffPolicy, ConfigError> {
        let retry = self.retry.clone().unwrap_or_default();
        if retry.max_attempts == 0 {
            return Err(ConfigError::InvalidRetry(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if retry.max_delay_ms < retry.base_delay_ms {
            return Err(ConfigError::InvalidRetry(format!(
                "max_delay_ms ({}) is below base_delay_ms ({})",
                retry.max_delay_ms, retry.base_delay_ms
            )));
        }
        Ok(BackoffPolicy {
            max_attempts: retry.max_attempts,
            base_delay: Duration::from_millis(retry.base_delay_ms),
            max_delay: Duration::from_millis(retry.max_delay_ms),
        })
    }

    pub fn classifier(&self) -> FailureClassifier {
        let retry_auth = self
            .retry
            .as_ref()
            .map(|r| r.retry_auth_failures)
            .unwrap_or(false);
        FailureClassifier::new(retry_auth)
    }

    pub fn opener(&self) -> PgOpener {
        PgOpener {
            connect_timeout: Duration::from_secs(self.database.connect_timeout_secs.max(1)),
            validate: self.database.validate_on_open,
        }
    }

    /// Build the PostgreSQL acquirer. Fails on a blank or malformed descriptor.
    pub fn acquirer(&self) -> Result<ConnectionAcquirer<PgOpener>, ConfigError> {
        let conn = self.connection_config()?;
        let backoff = self.backoff_policy()?;
        Ok(ConnectionAcquirer::new(Arc::new(conn), self.opener())
            .with_backoff(backoff)
            .with_classifier(self.classifier()))
    }

    /// Copy safe to print: the descriptor is replaced by its password-free form.
    pub fn redacted(&self) -> PantryConfig {
        let mut out = self.clone();
        out.database.connection = match Endpoint::parse(&self.database.connection) {
            Ok(ep) => ep.to_string(),
            Err(ConfigError::MissingConnection) => String::new(),
            Err(_) => "<invalid>".to_string(),
        };
        out
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pantry")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
/// The environment override is applied to the returned value.
pub fn load_or_init() -> Result<PantryConfig> {
    let path = config_path()?;
    let mut cfg = if path.exists() {
        load_from(&path)?
    } else {
        let default_cfg = PantryConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        default_cfg
    };
    cfg.apply_env_override();
    Ok(cfg)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<PantryConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: PantryConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
