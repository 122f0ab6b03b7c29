//! Remediation reporting.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Record of one remediation write.
#[derive(Debug, Clone, Serialize)]
pub struct RemediationRecord {
    /// Unique record id.
    pub record_id: Uuid,

    /// When the write was issued.
    pub occurred_at: DateTime<Utc>,

    /// Id of the violated rule.
    pub rule_id: String,

    /// Method name of the triggering audit event.
    pub method: String,

    /// Resource the write targeted.
    pub resource: String,

    /// Action label, e.g. `enable_logging`.
    pub action: String,
}

impl RemediationRecord {
    /// Create a record for a write issued now.
    pub fn new(rule_id: &str, method: &str, resource: &str, action: &str) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            rule_id: rule_id.to_string(),
            method: method.to_string(),
            resource: resource.to_string(),
            action: action.to_string(),
        }
    }
}

/// Trait boundary for remediation reporting. Later can ship to a topic or
/// table.
pub trait RemediationSink: Send + Sync {
    fn record(&self, record: &RemediationRecord);
}

/// Emits records as structured log events.
pub struct TracingSink;

impl RemediationSink for TracingSink {
    fn record(&self, record: &RemediationRecord) {
        tracing::info!(
            record_id = %record.record_id,
            rule = %record.rule_id,
            method = %record.method,
            resource = %record.resource,
            action = %record.action,
            "remediation applied"
        );
    }
}
