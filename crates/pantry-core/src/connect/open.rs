//! Single connection attempt against one endpoint.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Connection, PgConnection};

use super::descriptor::Endpoint;
use super::error::ConnectError;

/// Opens one session against one endpoint. No retries happen here.
#[async_trait]
pub trait ConnectionOpener: Send + Sync {
    /// Live session handed to the caller on success.
    type Handle: Send;

    /// Attempt a single open. Anything partially opened must be released
    /// before an error is returned.
    async fn open(&self, endpoint: &Endpoint) -> Result<Self::Handle, ConnectError>;
}

/// PostgreSQL opener backed by a dedicated `sqlx::PgConnection`.
#[derive(Debug, Clone, Copy)]
pub struct PgOpener {
    /// Bound on the TCP + startup handshake.
    pub connect_timeout: Duration,
    /// Run `SELECT 1` on the fresh session before handing it out.
    pub validate: bool,
}

impl Default for PgOpener {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            validate: true,
        }
    }
}

#[async_trait]
impl ConnectionOpener for PgOpener {
    type Handle = PgHandle;

    async fn open(&self, endpoint: &Endpoint) -> Result<PgHandle, ConnectError> {
        let opts = endpoint.connect_options();
        let mut conn = tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&opts))
            .await
            .map_err(|_| ConnectError::Timeout(self.connect_timeout))??;

        if self.validate {
            if let Err(e) = conn.ping().await {
                // Dispose of the half-usable session before reporting.
                if let Err(close_err) = conn.close().await {
                    tracing::debug!("close after failed validation: {}", close_err);
                }
                return Err(e.into());
            }
        }

        Ok(PgHandle {
            conn,
            endpoint: endpoint.to_string(),
        })
    }
}

/// Owned PostgreSQL session returned by the acquirer.
///
/// Derefs to `PgConnection` so repositories can pass `&mut *handle` to
/// `sqlx` executors. Call [`PgHandle::close`] when the unit of work is done;
/// dropping the handle also closes the socket, without the graceful goodbye.
#[derive(Debug)]
pub struct PgHandle {
    conn: PgConnection,
    endpoint: String,
}

impl PgHandle {
    /// Redacted endpoint this session was opened against.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Gracefully terminate the session.
    pub async fn close(self) -> Result<(), sqlx::Error> {
        self.conn.close().await
    }
}

impl Deref for PgHandle {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        &self.conn
    }
}

impl DerefMut for PgHandle {
    fn deref_mut(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}
