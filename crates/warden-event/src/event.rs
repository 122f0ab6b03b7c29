//! The normalized audit event.

use crate::entry::LogEntry;
use crate::error::EventError;
use serde_json::Value;
use std::collections::BTreeMap;

/// Service identifier for the Dialogflow API.
pub const DIALOGFLOW_SERVICE: &str = "dialogflow.googleapis.com";

/// An immutable record decoded from one incoming message.
///
/// Created once per delivery, consumed by the enforcer, then discarded.
/// `request_fields` flattens the audited request message into a map from
/// leaf field name to scalar value, so policy rules can refer to fields
/// like `enableLogging` without knowing where the API nests them.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// API service that served the audited call.
    pub service_name: String,

    /// Fully qualified method name.
    pub method_name: String,

    /// Resource the call operated on.
    pub resource_name: String,

    /// Region the resource lives in, when the entry carries one.
    pub location: Option<String>,

    /// The audited request message, untouched.
    pub request: Value,

    /// Scalar leaves of `request`, keyed by leaf field name.
    pub request_fields: BTreeMap<String, Value>,
}

impl AuditEvent {
    /// Decode an event from raw message data (a JSON log entry).
    pub fn from_payload(data: &[u8]) -> Result<Self, EventError> {
        Self::from_entry(LogEntry::from_json(data)?)
    }

    /// Build an event from a parsed log entry.
    pub fn from_entry(entry: LogEntry) -> Result<Self, EventError> {
        let payload = entry
            .proto_payload
            .ok_or(EventError::MissingField("protoPayload"))?;

        let service_name = payload
            .service_name
            .filter(|s| !s.is_empty())
            .ok_or(EventError::MissingField("protoPayload.serviceName"))?;
        let method_name = payload
            .method_name
            .filter(|s| !s.is_empty())
            .ok_or(EventError::MissingField("protoPayload.methodName"))?;
        let resource_name = payload
            .resource_name
            .filter(|s| !s.is_empty())
            .ok_or(EventError::MissingField("protoPayload.resourceName"))?;

        let location = payload
            .resource_location
            .and_then(|l| l.current_locations.into_iter().next())
            .filter(|l| !l.is_empty());

        let mut request_fields = BTreeMap::new();
        collect_scalars(&payload.request, &mut request_fields);

        Ok(Self {
            service_name,
            method_name,
            resource_name,
            location,
            request: payload.request,
            request_fields,
        })
    }

    /// Whether the event came from the Dialogflow API.
    pub fn is_dialogflow(&self) -> bool {
        self.service_name == DIALOGFLOW_SERVICE
    }

    /// Whether the method name ends in the given suffix, e.g.
    /// `Webhooks.UpdateWebhook`.
    pub fn method_matches(&self, suffix: &str) -> bool {
        self.method_name.ends_with(suffix)
    }

    /// Look up a flattened request field by leaf name.
    pub fn request_field(&self, name: &str) -> Option<&Value> {
        self.request_fields.get(name)
    }

    /// The `parent` field of the audited request, if present.
    pub fn request_parent(&self) -> Option<&str> {
        self.request.get("parent").and_then(Value::as_str)
    }

    /// The project id the resource belongs to.
    pub fn project_id(&self) -> Option<&str> {
        let mut segments = self.resource_name.split('/');
        match (segments.next(), segments.next()) {
            (Some("projects"), Some(id)) if !id.is_empty() => Some(id),
            _ => None,
        }
    }

    /// The CX agent owning this resource: the resource name truncated
    /// after the `agents/<id>` segment. `None` for non-agent resources.
    pub fn agent_name(&self) -> Option<String> {
        let segments: Vec<&str> = self.resource_name.split('/').collect();
        let idx = segments.iter().position(|s| *s == "agents")?;
        if idx + 1 >= segments.len() || segments[idx + 1].is_empty() {
            return None;
        }
        Some(segments[..=idx + 1].join("/"))
    }

    /// The ES project parent: `projects/<id>` when the resource is an ES
    /// agent path such as `projects/<id>/agent/fulfillment`.
    pub fn es_parent(&self) -> Option<String> {
        let segments: Vec<&str> = self.resource_name.split('/').collect();
        match segments.as_slice() {
            ["projects", project, "agent", ..] if !project.is_empty() => {
                Some(format!("projects/{project}"))
            }
            _ => None,
        }
    }
}

/// Walk a JSON value and collect every scalar leaf under its own key.
///
/// Later occurrences of a key win; audited requests do not reuse leaf
/// names with conflicting meanings.
fn collect_scalars(value: &Value, out: &mut BTreeMap<String, Value>) {
    if let Value::Object(map) = value {
        for (key, val) in map {
            match val {
                Value::Object(_) => collect_scalars(val, out),
                Value::Array(_) => {}
                scalar => {
                    out.insert(key.clone(), scalar.clone());
                }
            }
        }
    }
}
