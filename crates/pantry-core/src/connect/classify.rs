//! Classify connect failures into retryable and non-retryable kinds.

use super::error::ConnectError;

/// Retry classification of a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Expected to resolve on its own (server starting, connection limit, network blip).
    Transient,
    /// Will not resolve by retrying.
    Fatal,
}

/// SQLSTATEs retried by the acquirer.
pub const TRANSIENT_SQLSTATES: &[&str] = &[
    "53300", // too_many_connections
    "57P03", // cannot_connect_now (server starting up)
    "08001", // sqlclient_unable_to_establish_sqlconnection
    "08006", // connection_failure
    "08004", // sqlserver_rejected_establishment_of_sqlconnection
];

const AUTH_SQLSTATES: &[&str] = &[
    "28P01", // invalid_password
    "28000", // invalid_authorization_specification
];

/// Classify a bare SQLSTATE against the transient allow-list.
pub fn classify_sqlstate(code: &str) -> FailureKind {
    if TRANSIENT_SQLSTATES.contains(&code) {
        FailureKind::Transient
    } else {
        FailureKind::Fatal
    }
}

/// Pure classifier for connect errors.
///
/// `retry_auth_failures` additionally treats authentication failures as
/// transient, which is only useful while diagnosing a server that is still
/// provisioning its roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureClassifier {
    pub retry_auth_failures: bool,
}

impl FailureClassifier {
    pub fn new(retry_auth_failures: bool) -> Self {
        Self {
            retry_auth_failures,
        }
    }

    pub fn classify(&self, e: &ConnectError) -> FailureKind {
        match e {
            ConnectError::Database { code: Some(code), .. } => {
                if self.retry_auth_failures && AUTH_SQLSTATES.contains(&code.as_str()) {
                    return FailureKind::Transient;
                }
                classify_sqlstate(code)
            }
            ConnectError::Io(_) | ConnectError::Timeout(_) => FailureKind::Transient,
            ConnectError::Database { code: None, .. }
            | ConnectError::Tls(_)
            | ConnectError::Protocol(_)
            | ConnectError::Config(_)
            | ConnectError::Other(_) => FailureKind::Fatal,
        }
    }
}
