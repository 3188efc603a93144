//! Repositories: validated, parameterized CRUD over acquired sessions.
//!
//! Every method validates its input first, then acquires one session,
//! runs its statement and closes the session on every path.

mod ingredients;
mod users;

pub use ingredients::IngredientRepository;
pub use users::UserRepository;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::connect::{AcquireError, ConnectionAcquirer, PgHandle, PgOpener};

/// Anything that can hand out a live PostgreSQL session.
#[async_trait]
pub trait ConnectionSource: Send + Sync {
    async fn acquire(&self) -> Result<PgHandle, AcquireError>;
}

#[async_trait]
impl ConnectionSource for ConnectionAcquirer<PgOpener> {
    async fn acquire(&self) -> Result<PgHandle, AcquireError> {
        ConnectionAcquirer::acquire(self).await
    }
}

#[async_trait]
impl<S: ConnectionSource + ?Sized> ConnectionSource for Arc<S> {
    async fn acquire(&self) -> Result<PgHandle, AcquireError> {
        (**self).acquire().await
    }
}

#[derive(Debug, Error)]
pub enum RepoError {
    /// Input rejected before touching the database.
    #[error("{0}")]
    Validation(String),
    #[error("a user with email '{0}' already exists")]
    DuplicateEmail(String),
    #[error(transparent)]
    Connection(#[from] AcquireError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0} returned no row")]
    NoRowReturned(&'static str),
}

pub type RepoResult<T> = Result<T, RepoError>;

fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

/// Close a session after its unit of work. Close failures are logged, not surfaced.
async fn release(conn: PgHandle) {
    let endpoint = conn.endpoint().to_string();
    if let Err(e) = conn.close().await {
        tracing::warn!(endpoint = %endpoint, "closing database session failed: {}", e);
    }
}
