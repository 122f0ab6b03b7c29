//! Cloud Logging entry types.
//!
//! Only the fields the enforcer needs are modeled; everything else in the
//! entry is ignored during deserialization.

use crate::error::EventError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A Cloud Logging entry as routed by an audit-log sink.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// The audit-log payload.
    #[serde(default)]
    pub proto_payload: Option<ProtoPayload>,

    /// Unique id of the entry within its log.
    #[serde(default)]
    pub insert_id: Option<String>,

    /// When the logged call happened.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// The `protoPayload` of an audit-log entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtoPayload {
    /// API service that served the call, e.g. `dialogflow.googleapis.com`.
    #[serde(default)]
    pub service_name: Option<String>,

    /// Fully qualified method, e.g.
    /// `google.cloud.dialogflow.cx.v3.Webhooks.UpdateWebhook`.
    #[serde(default)]
    pub method_name: Option<String>,

    /// Resource the call operated on.
    #[serde(default)]
    pub resource_name: Option<String>,

    /// Where the resource lives.
    #[serde(default)]
    pub resource_location: Option<ResourceLocation>,

    /// The request message of the audited call, as loosely typed JSON.
    #[serde(default)]
    pub request: serde_json::Value,
}

/// Location info attached to the payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLocation {
    /// Regions the resource currently lives in; the first one is used for
    /// endpoint resolution.
    #[serde(default)]
    pub current_locations: Vec<String>,
}

impl LogEntry {
    /// Parse a log entry from decoded message data.
    pub fn from_json(data: &[u8]) -> Result<Self, EventError> {
        serde_json::from_slice(data).map_err(EventError::Entry)
    }
}
