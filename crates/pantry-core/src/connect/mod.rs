//! Connection acquisition: open, classify, back off, retry.
//!
//! This module encapsulates error classification (driver SQLSTATEs, socket
//! failures, timeouts), exponential backoff and the attempt-indexed host
//! rotation so that repositories only ever ask for a live session.

mod acquire;
mod classify;
mod descriptor;
mod error;
mod open;
mod policy;


pub use acquire::{AttemptResult, ConnectionAcquirer, ConnectionConfig};
pub use classify::{classify_sqlstate, FailureClassifier, FailureKind, TRANSIENT_SQLSTATES};
pub use descriptor::Endpoint;
pub use error::{AcquireError, ConnectError};
pub use open::{ConnectionOpener, PgHandle, PgOpener};
pub use policy::{BackoffPolicy, RetrySchedule};
