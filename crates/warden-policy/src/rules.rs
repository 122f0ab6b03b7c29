//! The rule table and matching engine.

use serde_json::Value;
use std::fmt;
use warden_core::PoliciesConfig;
use warden_event::AuditEvent;

/// What a policy enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Interaction logging must stay enabled on agents.
    LoggingEnabled,
    /// Webhooks and fulfillments must not carry static credentials.
    NoStaticCredentials,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoggingEnabled => write!(f, "LOGGING_ENABLED"),
            Self::NoStaticCredentials => write!(f, "NO_STATIC_CREDENTIALS"),
        }
    }
}

/// A request-field condition.
///
/// Holds when the flattened request field is present and equals the
/// expected boolean. Absent fields never satisfy a condition: a request
/// that does not mention a setting cannot be disabling it.
#[derive(Debug, Clone, Copy)]
pub struct FieldCondition {
    /// Leaf field name in the audited request, e.g. `enableLogging`.
    pub field: &'static str,
    /// Value that marks the request as non-compliant.
    pub equals: bool,
}

impl FieldCondition {
    fn holds(&self, event: &AuditEvent) -> bool {
        matches!(
            event.request_field(self.field),
            Some(Value::Bool(actual)) if *actual == self.equals
        )
    }
}

/// One row of the rule table: a predicate plus a remediation kind.
#[derive(Debug, Clone, Copy)]
pub struct PolicyRule {
    /// Stable identifier used in reports and logs.
    pub id: &'static str,

    /// Remediation family this rule triggers.
    pub kind: PolicyKind,

    /// Method-name suffixes the rule applies to.
    pub method_suffixes: &'static [&'static str],

    /// Field conditions, any of which marks a violation. An empty list
    /// means the method alone triggers the rule.
    pub conditions: &'static [FieldCondition],
}

impl PolicyRule {
    /// Whether the event violates this rule.
    pub fn matches(&self, event: &AuditEvent) -> bool {
        if !self.method_suffixes.iter().any(|s| event.method_matches(s)) {
            return false;
        }
        if self.conditions.is_empty() {
            return true;
        }
        self.conditions.iter().any(|c| c.holds(event))
    }
}

/// Agent logging must be enabled.
///
/// Method set and field conditions mirror the audit-log sink filter that
/// routes events here in the first place.
pub const LOGGING_RULE: PolicyRule = PolicyRule {
    id: "agent-logging-enabled",
    kind: PolicyKind::LoggingEnabled,
    method_suffixes: &[
        "Webhooks.CreateWebhook",
        "Webhooks.UpdateWebhook",
        "Agents.CreateAgent",
        "Agents.UpdateAgent",
        "Fulfillments.UpdateFulfillment",
    ],
    conditions: &[
        FieldCondition { field: "enableLogging", equals: false },
        FieldCondition { field: "enableStackdriverLogging", equals: false },
    ],
};

/// Webhooks and fulfillments must not carry static credentials.
pub const CREDENTIAL_RULE: PolicyRule = PolicyRule {
    id: "no-static-credentials",
    kind: PolicyKind::NoStaticCredentials,
    method_suffixes: &[
        "Webhooks.CreateWebhook",
        "Webhooks.UpdateWebhook",
        "Fulfillments.UpdateFulfillment",
    ],
    conditions: &[],
};

/// The active rule set, built once at startup.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<PolicyRule>,
}

impl RuleSet {
    /// Build the rule set enabled by configuration.
    pub fn from_config(config: &PoliciesConfig) -> Self {
        let mut rules = Vec::new();
        if config.enforce_logging {
            rules.push(LOGGING_RULE);
        }
        if config.scrub_credentials {
            rules.push(CREDENTIAL_RULE);
        }
        Self { rules }
    }

    /// The active rules.
    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    /// Return every active rule the event violates.
    pub fn evaluate(&self, event: &AuditEvent) -> Vec<&PolicyRule> {
        let matched: Vec<&PolicyRule> =
            self.rules.iter().filter(|r| r.matches(event)).collect();

        if !matched.is_empty() {
            tracing::debug!(
                method = %event.method_name,
                resource = %event.resource_name,
                rules = ?matched.iter().map(|r| r.id).collect::<Vec<_>>(),
                "event violates policy"
            );
        }

        matched
    }
}
