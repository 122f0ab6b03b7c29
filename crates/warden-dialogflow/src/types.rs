//! Minimal Dialogflow resource types.
//!
//! Only the fields the enforcer reads or writes are modeled; unknown
//! response fields are ignored on deserialization and update masks bound
//! every write, so partial bodies are safe.

use serde::{Deserialize, Serialize};

/// A Dialogflow CX agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Full resource name, `projects/*/locations/*/agents/*`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_settings: Option<AdvancedSettings>,
}

/// Agent advanced settings; only the logging block matters here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging_settings: Option<LoggingSettings>,
}

/// CX logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingSettings {
    #[serde(default)]
    pub enable_stackdriver_logging: bool,

    #[serde(default)]
    pub enable_interaction_logging: bool,
}

/// A Dialogflow ES project agent (v2 surface).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsAgent {
    /// Owning project, `projects/*`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent: String,

    #[serde(default)]
    pub enable_logging: bool,
}

/// A Dialogflow CX webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    /// Full resource name, `projects/*/locations/*/agents/*/webhooks/*`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_web_service: Option<GenericWebService>,
}

/// A Dialogflow ES fulfillment (v2 surface).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fulfillment {
    /// Full resource name, `projects/*/agent/fulfillment`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_web_service: Option<GenericWebService>,
}

/// The HTTP service behind a webhook or fulfillment.
///
/// `username` and `password` serialize even when empty: blanking them is
/// exactly what a credential scrub writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericWebService {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

/// Response page of `ListAgents`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAgentsResponse {
    #[serde(default)]
    pub agents: Vec<Agent>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Response page of `ListWebhooks`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWebhooksResponse {
    #[serde(default)]
    pub webhooks: Vec<Webhook>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Standard Google API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleErrorBody {
    pub error: GoogleError,
}

/// The error detail inside [`GoogleErrorBody`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleError {
    #[serde(default)]
    pub code: u16,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub status: String,
}
