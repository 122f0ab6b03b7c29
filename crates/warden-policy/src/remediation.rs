//! Remediation planning.
//!
//! A matched rule says *what* is wrong; planning resolves *where* to fix
//! it from the event's resource name. CX resources are addressed through
//! their owning agent, ES resources through their project parent.

use crate::rules::{PolicyKind, PolicyRule};
use thiserror::Error;
use warden_event::AuditEvent;

/// A concrete corrective action against one Dialogflow resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remediation {
    /// Enable logging on a CX agent.
    EnableAgentLogging { agent: String },
    /// Enable logging on every CX agent under a location parent.
    ///
    /// Used for `Agents.CreateAgent` entries that only name the parent.
    EnableAgentLoggingUnder { parent: String },
    /// Enable logging on an ES project agent.
    EnableEsAgentLogging { parent: String },
    /// Blank the static credentials of one CX webhook.
    ScrubWebhookCredentials { webhook: String },
    /// Blank the static credentials of every webhook under an agent.
    ScrubWebhooksUnder { agent: String },
    /// Blank the static credentials of an ES fulfillment.
    ScrubFulfillmentCredentials { name: String },
}

impl Remediation {
    /// The resource (or parent) the action targets.
    pub fn target(&self) -> &str {
        match self {
            Self::EnableAgentLogging { agent }
            | Self::ScrubWebhooksUnder { agent } => agent,
            Self::EnableAgentLoggingUnder { parent }
            | Self::EnableEsAgentLogging { parent } => parent,
            Self::ScrubWebhookCredentials { webhook } => webhook,
            Self::ScrubFulfillmentCredentials { name } => name,
        }
    }

    /// Short action label for reports.
    pub fn action(&self) -> &'static str {
        match self {
            Self::EnableAgentLogging { .. }
            | Self::EnableAgentLoggingUnder { .. }
            | Self::EnableEsAgentLogging { .. } => "enable_logging",
            Self::ScrubWebhookCredentials { .. }
            | Self::ScrubWebhooksUnder { .. }
            | Self::ScrubFulfillmentCredentials { .. } => "scrub_credentials",
        }
    }
}

/// A rule matched but no remediation target could be derived.
#[derive(Debug, Clone, Error)]
#[error("cannot derive a remediation target for rule `{rule}` from resource `{resource}`")]
pub struct PlanError {
    /// Id of the matched rule.
    pub rule: &'static str,
    /// The resource name that could not be resolved.
    pub resource: String,
}

impl PlanError {
    fn new(rule: &PolicyRule, event: &AuditEvent) -> Self {
        Self {
            rule: rule.id,
            resource: event.resource_name.clone(),
        }
    }
}

/// Resolve the corrective action for a matched rule.
pub fn plan(rule: &PolicyRule, event: &AuditEvent) -> Result<Remediation, PlanError> {
    match rule.kind {
        PolicyKind::LoggingEnabled => {
            if let Some(agent) = event.agent_name() {
                return Ok(Remediation::EnableAgentLogging { agent });
            }
            // A CreateAgent entry may name only the location; enforce
            // everything under the requested parent.
            if event.method_matches("Agents.CreateAgent") {
                if let Some(parent) = event.request_parent() {
                    return Ok(Remediation::EnableAgentLoggingUnder {
                        parent: parent.to_string(),
                    });
                }
            }
            if let Some(parent) = event.es_parent() {
                return Ok(Remediation::EnableEsAgentLogging { parent });
            }
            Err(PlanError::new(rule, event))
        }
        PolicyKind::NoStaticCredentials => {
            if event.resource_name.contains("/webhooks/") {
                return Ok(Remediation::ScrubWebhookCredentials {
                    webhook: event.resource_name.clone(),
                });
            }
            if let Some(agent) = event.agent_name() {
                return Ok(Remediation::ScrubWebhooksUnder { agent });
            }
            if event.es_parent().is_some() {
                return Ok(Remediation::ScrubFulfillmentCredentials {
                    name: event.resource_name.clone(),
                });
            }
            Err(PlanError::new(rule, event))
        }
    }
}
