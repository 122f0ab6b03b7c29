//! Error types for the enforcement runtime.

use thiserror::Error;
use warden_event::EventError;
use warden_policy::PlanError;

/// Errors that can occur while handling one event.
#[derive(Debug, Error)]
pub enum EnforcerError {
    /// The payload could not be decoded into an audit event.
    #[error("malformed audit event: {0}")]
    BadInput(#[from] EventError),

    /// A rule matched but no remediation target could be derived.
    #[error(transparent)]
    Unresolvable(#[from] PlanError),

    /// The corrective API call failed.
    #[error("remediation failed for `{resource}`: {source}")]
    Remediation {
        resource: String,
        #[source]
        source: anyhow::Error,
    },
}

impl EnforcerError {
    /// Whether redelivering the same message can change the result.
    ///
    /// Bad input stays bad; only a failed remediation write is worth
    /// another delivery.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remediation { .. })
    }
}
