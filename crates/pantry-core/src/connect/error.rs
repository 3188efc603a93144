//! Error types for a single open attempt and for a whole acquisition.

use std::time::Duration;
use thiserror::Error;

/// Failure of one connection attempt, normalized from the driver so it can be
/// classified before being surfaced.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Server answered with an error; `code` is the SQLSTATE when present.
    #[error("database error [{}]: {message}", .code.as_deref().unwrap_or("-"))]
    Database {
        code: Option<String>,
        message: String,
    },
    /// Socket-level failure (refused, reset, unreachable, DNS).
    #[error("network error: {0}")]
    Io(#[from] std::io::Error),
    /// Handshake did not complete within the connect timeout.
    #[error("connect timed out after {0:?}")]
    Timeout(Duration),
    #[error("tls error: {0}")]
    Tls(String),
    #[error("protocol error: {0}")]
    Protocol(String),
    /// Driver rejected the connect options themselves.
    #[error("invalid connection options: {0}")]
    Config(String),
    #[error("{0}")]
    Other(String),
}

impl ConnectError {
    /// SQLSTATE carried by a server error, if any.
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            ConnectError::Database { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for ConnectError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) => ConnectError::Database {
                code: db.code().map(|c| c.into_owned()),
                message: db.message().to_string(),
            },
            sqlx::Error::Io(io) => ConnectError::Io(io),
            sqlx::Error::Tls(t) => ConnectError::Tls(t.to_string()),
            sqlx::Error::Protocol(p) => ConnectError::Protocol(p),
            sqlx::Error::Configuration(c) => ConnectError::Config(c.to_string()),
            other => ConnectError::Other(other.to_string()),
        }
    }
}

/// Terminal failure of `ConnectionAcquirer::acquire`.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// Non-retryable cause; no further attempts were made.
    #[error("database connection failed: {source}")]
    Fatal {
        #[source]
        source: ConnectError,
    },
    /// Every attempt failed with a transient cause.
    #[error("failed to establish database connection after {attempts} attempts; last error: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: ConnectError,
    },
    /// Caller-imposed bound on the whole acquisition elapsed.
    #[error("database connection not established within {limit:?}")]
    TimedOut { limit: Duration },
}

impl AcquireError {
    /// The last connect failure behind this error, if one was observed.
    pub fn cause(&self) -> Option<&ConnectError> {
        match self {
            AcquireError::Fatal { source } | AcquireError::Exhausted { source, .. } => {
                Some(source)
            }
            AcquireError::TimedOut { .. } => None,
        }
    }
}
