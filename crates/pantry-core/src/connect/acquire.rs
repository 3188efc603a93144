//! Retry loop: open until success, a fatal cause, or the attempt budget is spent.

use std::sync::Arc;
use std::time::Duration;

use super::classify::{FailureClassifier, FailureKind};
use super::descriptor::Endpoint;
use super::error::{AcquireError, ConnectError};
use super::open::ConnectionOpener;
use super::policy::BackoffPolicy;
use crate::config::ConfigError;

/// Immutable connection settings shared by every acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub primary: Endpoint,
    /// Host overrides for later attempts; only the first one is used today.
    pub fallback_hosts: Vec<String>,
}

impl ConnectionConfig {
    pub fn new(primary: Endpoint, fallback_hosts: Vec<String>) -> Self {
        Self {
            primary,
            fallback_hosts,
        }
    }

    pub fn from_descriptor(
        descriptor: &str,
        fallback_hosts: Vec<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(Endpoint::parse(descriptor)?, fallback_hosts))
    }

    /// Host rotation table, indexed by 1-based attempt number:
    /// 1 = primary, 2 = first fallback (primary if none), 3+ = primary.
    pub fn endpoint_for_attempt(&self, attempt: u32) -> Endpoint {
        match (attempt, self.fallback_hosts.first()) {
            (2, Some(host)) => self.primary.with_host(host),
            _ => self.primary.clone(),
        }
    }
}

/// Outcome of one classified attempt.
#[derive(Debug)]
pub enum AttemptResult<H> {
    Success(H),
    TransientFailure(ConnectError),
    FatalFailure(ConnectError),
}

/// Hands out live sessions, retrying transient failures with backoff.
///
/// Holds no mutable state: concurrent `acquire` calls each keep their own
/// attempt counter, and the config is shared read-only.
#[derive(Debug, Clone)]
pub struct ConnectionAcquirer<O> {
    config: Arc<ConnectionConfig>,
    opener: O,
    backoff: BackoffPolicy,
    classifier: FailureClassifier,
}

impl<O: ConnectionOpener> ConnectionAcquirer<O> {
    pub fn new(config: Arc<ConnectionConfig>, opener: O) -> Self {
        Self {
            config,
            opener,
            backoff: BackoffPolicy::default(),
            classifier: FailureClassifier::default(),
        }
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_classifier(mut self, classifier: FailureClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    /// Run attempt `attempt` (1-based) and classify its outcome.
    pub async fn attempt(&self, attempt: u32) -> AttemptResult<O::Handle> {
        let endpoint = self.config.endpoint_for_attempt(attempt);
        tracing::debug!(
            attempt,
            max_attempts = self.backoff.max_attempts,
            endpoint = %endpoint,
            "connection attempt"
        );
        match self.opener.open(&endpoint).await {
            Ok(handle) => AttemptResult::Success(handle),
            Err(e) => match self.classifier.classify(&e) {
                FailureKind::Transient => AttemptResult::TransientFailure(e),
                FailureKind::Fatal => AttemptResult::FatalFailure(e),
            },
        }
    }

    /// Acquire a live session.
    ///
    /// Fatal causes stop immediately. Transient causes are retried after
    /// `BackoffPolicy::delay_for(attempt)` until `max_attempts` is reached.
    /// Dropping the returned future cancels the in-flight open or sleep.
    pub async fn acquire(&self) -> Result<O::Handle, AcquireError> {
        let mut attempt = 1u32;
        loop {
            match self.attempt(attempt).await {
                AttemptResult::Success(handle) => {
                    tracing::info!(attempt, "database connection established");
                    return Ok(handle);
                }
                AttemptResult::FatalFailure(e) => {
                    tracing::warn!(attempt, "non-retryable connection error: {}", e);
                    return Err(AcquireError::Fatal { source: e });
                }
                AttemptResult::TransientFailure(e) => {
                    if !self.backoff.has_next(attempt) {
                        tracing::error!(
                            attempts = attempt,
                            "giving up on database connection: {}",
                            e
                        );
                        return Err(AcquireError::Exhausted {
                            attempts: attempt,
                            source: e,
                        });
                    }
                    let delay = self.backoff.delay_for(attempt);
                    tracing::info!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "connection attempt failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// `acquire` bounded by an overall deadline covering opens and backoff.
    pub async fn acquire_within(&self, limit: Duration) -> Result<O::Handle, AcquireError> {
        match tokio::time::timeout(limit, self.acquire()).await {
            Ok(res) => res,
            Err(_) => {
                tracing::warn!(limit_ms = limit.as_millis() as u64, "connection acquisition timed out");
                Err(AcquireError::TimedOut { limit })
            }
        }
    }
}
