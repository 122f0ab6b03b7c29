//! Error types for the Dialogflow client.

use thiserror::Error;

/// Errors that can occur while calling the Dialogflow API.
#[derive(Debug, Error)]
pub enum DialogflowError {
    /// Failed to construct the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or the response not read.
    #[error("transport error calling {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("{url} returned HTTP {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    /// A success response did not match the expected shape.
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// No access token could be acquired.
    #[error("failed to acquire access token: {0}")]
    Auth(String),
}
