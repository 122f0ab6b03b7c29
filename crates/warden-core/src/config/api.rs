//! Dialogflow API client configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the outbound Dialogflow REST client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Fixed base endpoint overriding regional resolution.
    ///
    /// Leave unset in production so the client derives the regional
    /// endpoint from each event's resource location. Tests point this at
    /// a local mock server.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds for a single remediation call.
    ///
    /// The client makes exactly one attempt per call; redelivery handles
    /// transient failures.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Environment variable holding a static OAuth access token.
    ///
    /// When set and present, the client uses the token verbatim instead of
    /// the metadata server. Intended for local runs and tests.
    #[serde(default)]
    pub access_token_env: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            access_token_env: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
