//! Inbound event model for Warden.
//!
//! A Pub/Sub push delivery arrives as a JSON envelope whose `message.data`
//! field carries a base64-encoded Cloud Logging entry. This crate decodes
//! that chain and normalizes the interesting parts into an [`AuditEvent`]:
//!
//! ```text
//! HTTP body -> PushEnvelope -> base64 data -> LogEntry -> AuditEvent
//! ```
//!
//! Every decoding failure maps to an [`EventError`]; the enforcer treats
//! all of them as non-retryable bad input.

pub mod entry;
pub mod envelope;
pub mod error;
pub mod event;

pub use entry::{LogEntry, ProtoPayload, ResourceLocation};
pub use envelope::{PubsubMessage, PushEnvelope};
pub use error::EventError;
pub use event::{AuditEvent, DIALOGFLOW_SERVICE};
