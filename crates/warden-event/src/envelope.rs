//! Pub/Sub push envelope types.

use crate::error::EventError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

/// The JSON wrapper Pub/Sub POSTs to a push endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEnvelope {
    /// The wrapped message.
    pub message: PubsubMessage,

    /// Full subscription name that delivered the message.
    #[serde(default)]
    pub subscription: Option<String>,
}

/// A single Pub/Sub message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubsubMessage {
    /// Base64-encoded payload; here, a Cloud Logging entry.
    #[serde(default)]
    pub data: String,

    /// Server-assigned message id.
    #[serde(default)]
    pub message_id: Option<String>,

    /// When the message was published.
    #[serde(default)]
    pub publish_time: Option<DateTime<Utc>>,

    /// Message attributes set by the publisher.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl PushEnvelope {
    /// Parse an envelope from a raw HTTP body.
    pub fn from_json(body: &[u8]) -> Result<Self, EventError> {
        serde_json::from_slice(body).map_err(EventError::Envelope)
    }
}

impl PubsubMessage {
    /// Decode the base64 `data` field.
    pub fn decoded_data(&self) -> Result<Vec<u8>, EventError> {
        Ok(STANDARD.decode(&self.data)?)
    }
}
