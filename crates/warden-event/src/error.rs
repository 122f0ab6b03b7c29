//! Error types for event decoding.

use thiserror::Error;

/// Errors produced while decoding an incoming message.
///
/// All variants describe malformed input: redelivering the same message
/// cannot fix any of them.
#[derive(Debug, Error)]
pub enum EventError {
    /// The push envelope body is not valid JSON.
    #[error("push envelope is not valid JSON: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The message data field is not valid base64.
    #[error("message data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded log entry is not valid JSON.
    #[error("log entry is not valid JSON: {0}")]
    Entry(#[source] serde_json::Error),

    /// A required log entry field is absent or empty.
    #[error("log entry is missing required field `{0}`")]
    MissingField(&'static str),
}
