//! The enforcer itself.

use crate::error::EnforcerError;
use crate::remedy::RemediationApi;
use crate::report::{RemediationRecord, RemediationSink};
use std::sync::Arc;
use warden_event::AuditEvent;
use warden_policy::{Remediation, RuleSet, plan};

/// What handling one event amounted to.
#[derive(Debug)]
pub enum Outcome {
    /// Event from another service or project; nothing to do.
    Ignored,
    /// Dialogflow event that violates no active rule.
    Compliant,
    /// Corrective writes were issued.
    Remediated(Vec<RemediationRecord>),
}

/// Stateless per-invocation classifier + action.
///
/// One instance is shared across deliveries; it holds only immutable
/// configuration and the API seam, so concurrent invocations need no
/// coordination.
pub struct Enforcer {
    project: Option<String>,
    rules: RuleSet,
    api: Arc<dyn RemediationApi>,
    sink: Arc<dyn RemediationSink>,
}

impl Enforcer {
    /// Wire an enforcer from its rule set and seams.
    ///
    /// When `project` is set, events for other projects are ignored.
    pub fn new(
        project: Option<String>,
        rules: RuleSet,
        api: Arc<dyn RemediationApi>,
        sink: Arc<dyn RemediationSink>,
    ) -> Self {
        Self {
            project,
            rules,
            api,
            sink,
        }
    }

    /// Decode raw message data and handle the event.
    pub async fn handle_payload(&self, data: &[u8]) -> Result<Outcome, EnforcerError> {
        let event = AuditEvent::from_payload(data)?;
        self.handle(&event).await
    }

    /// Handle one decoded audit event.
    pub async fn handle(&self, event: &AuditEvent) -> Result<Outcome, EnforcerError> {
        if !event.is_dialogflow() {
            tracing::debug!(
                service = %event.service_name,
                "ignoring event from foreign service"
            );
            return Ok(Outcome::Ignored);
        }

        if let Some(project) = &self.project {
            if event.project_id() != Some(project.as_str()) {
                tracing::debug!(
                    resource = %event.resource_name,
                    enforced_project = %project,
                    "ignoring event outside the enforced project"
                );
                return Ok(Outcome::Ignored);
            }
        }

        let violations = self.rules.evaluate(event);
        if violations.is_empty() {
            return Ok(Outcome::Compliant);
        }

        let location = event.location.as_deref();
        let mut records = Vec::new();

        for rule in violations {
            let remediation = plan(rule, event)?;
            let touched = self
                .apply(&remediation, location)
                .await
                .map_err(|source| EnforcerError::Remediation {
                    resource: remediation.target().to_string(),
                    source,
                })?;

            for resource in touched {
                let record = RemediationRecord::new(
                    rule.id,
                    &event.method_name,
                    &resource,
                    remediation.action(),
                );
                self.sink.record(&record);
                records.push(record);
            }
        }

        Ok(Outcome::Remediated(records))
    }

    /// Issue the write(s) for one remediation, returning the resources
    /// touched.
    async fn apply(
        &self,
        remediation: &Remediation,
        location: Option<&str>,
    ) -> anyhow::Result<Vec<String>> {
        match remediation {
            Remediation::EnableAgentLogging { agent } => {
                self.api.enable_agent_logging(location, agent).await?;
                Ok(vec![agent.clone()])
            }
            Remediation::EnableAgentLoggingUnder { parent } => {
                self.api
                    .enable_logging_for_agents_under(location, parent)
                    .await
            }
            Remediation::EnableEsAgentLogging { parent } => {
                self.api.enable_es_agent_logging(location, parent).await?;
                Ok(vec![parent.clone()])
            }
            Remediation::ScrubWebhookCredentials { webhook } => {
                self.api.scrub_webhook_credentials(location, webhook).await?;
                Ok(vec![webhook.clone()])
            }
            Remediation::ScrubWebhooksUnder { agent } => {
                self.api.scrub_webhooks_under(location, agent).await
            }
            Remediation::ScrubFulfillmentCredentials { name } => {
                self.api
                    .scrub_fulfillment_credentials(location, name)
                    .await?;
                Ok(vec![name.clone()])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use warden_core::PoliciesConfig;
    use warden_event::LogEntry;

    /// In-memory stand-in for the Dialogflow API.
    ///
    /// Records every call and tracks per-agent logging state so tests can
    /// assert end-state convergence, not just call counts.
    #[derive(Default)]
    struct MockApi {
        calls: Mutex<Vec<String>>,
        logging: Mutex<BTreeMap<String, bool>>,
        fail: bool,
    }

    impl MockApi {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn logging_state(&self) -> BTreeMap<String, bool> {
            self.logging.lock().unwrap().clone()
        }

        fn push(&self, call: String) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("permission denied");
            }
            self.calls.lock().unwrap().push(call);
            Ok(())
        }
    }

    #[async_trait]
    impl RemediationApi for MockApi {
        async fn enable_agent_logging(
            &self,
            _location: Option<&str>,
            agent: &str,
        ) -> anyhow::Result<()> {
            self.push(format!("enable_agent_logging {agent}"))?;
            self.logging.lock().unwrap().insert(agent.to_string(), true);
            Ok(())
        }

        async fn enable_logging_for_agents_under(
            &self,
            _location: Option<&str>,
            parent: &str,
        ) -> anyhow::Result<Vec<String>> {
            self.push(format!("enable_logging_for_agents_under {parent}"))?;
            let agents = vec![format!("{parent}/agents/a"), format!("{parent}/agents/b")];
            let mut logging = self.logging.lock().unwrap();
            for agent in &agents {
                logging.insert(agent.clone(), true);
            }
            Ok(agents)
        }

        async fn enable_es_agent_logging(
            &self,
            _location: Option<&str>,
            parent: &str,
        ) -> anyhow::Result<()> {
            self.push(format!("enable_es_agent_logging {parent}"))?;
            self.logging.lock().unwrap().insert(parent.to_string(), true);
            Ok(())
        }

        async fn scrub_webhook_credentials(
            &self,
            _location: Option<&str>,
            webhook: &str,
        ) -> anyhow::Result<()> {
            self.push(format!("scrub_webhook_credentials {webhook}"))
        }

        async fn scrub_webhooks_under(
            &self,
            _location: Option<&str>,
            agent: &str,
        ) -> anyhow::Result<Vec<String>> {
            self.push(format!("scrub_webhooks_under {agent}"))?;
            Ok(vec![format!("{agent}/webhooks/w")])
        }

        async fn scrub_fulfillment_credentials(
            &self,
            _location: Option<&str>,
            name: &str,
        ) -> anyhow::Result<()> {
            self.push(format!("scrub_fulfillment_credentials {name}"))
        }
    }

    /// Sink that swallows records; tests assert via the returned outcome.
    struct NullSink;

    impl RemediationSink for NullSink {
        fn record(&self, _record: &RemediationRecord) {}
    }

    fn enforcer(api: Arc<MockApi>, policies: PoliciesConfig) -> Enforcer {
        Enforcer::new(
            None,
            RuleSet::from_config(&policies),
            api,
            Arc::new(NullSink),
        )
    }

    fn entry_json(service: &str, method: &str, resource: &str, request: Value) -> Vec<u8> {
        json!({
            "protoPayload": {
                "serviceName": service,
                "methodName": method,
                "resourceName": resource,
                "resourceLocation": { "currentLocations": ["global"] },
                "request": request,
            }
        })
        .to_string()
        .into_bytes()
    }

    fn event(method: &str, resource: &str, request: Value) -> AuditEvent {
        let data = entry_json("dialogflow.googleapis.com", method, resource, request);
        AuditEvent::from_entry(LogEntry::from_json(&data).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_foreign_service_is_ignored() {
        let api = Arc::new(MockApi::default());
        let enforcer = enforcer(api.clone(), PoliciesConfig::default());

        let data = entry_json(
            "compute.googleapis.com",
            "v1.compute.instances.insert",
            "projects/p/zones/z/instances/i",
            json!({ "enableLogging": false }),
        );
        let outcome = enforcer.handle_payload(&data).await.unwrap();

        assert!(matches!(outcome, Outcome::Ignored));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_project_is_ignored() {
        let api = Arc::new(MockApi::default());
        let enforcer = Enforcer::new(
            Some("watched".to_string()),
            RuleSet::from_config(&PoliciesConfig::default()),
            api.clone(),
            Arc::new(NullSink),
        );

        let outcome = enforcer
            .handle(&event(
                "google.cloud.dialogflow.cx.v3.Agents.UpdateAgent",
                "projects/other/locations/global/agents/a",
                json!({ "enableLogging": false }),
            ))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Ignored));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_logging_violation_issues_exactly_one_call() {
        let api = Arc::new(MockApi::default());
        let enforcer = enforcer(api.clone(), PoliciesConfig::default());

        let outcome = enforcer
            .handle(&event(
                "google.cloud.dialogflow.cx.v3.Agents.UpdateAgent",
                "projects/p/locations/global/agents/a",
                json!({ "agent": { "advancedSettings": {
                    "loggingSettings": { "enableStackdriverLogging": false }
                } } }),
            ))
            .await
            .unwrap();

        let Outcome::Remediated(records) = outcome else {
            panic!("expected remediation");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rule_id, "agent-logging-enabled");
        assert_eq!(records[0].resource, "projects/p/locations/global/agents/a");
        assert_eq!(
            api.calls(),
            ["enable_agent_logging projects/p/locations/global/agents/a"]
        );
    }

    #[tokio::test]
    async fn test_compliant_event_issues_no_call() {
        let api = Arc::new(MockApi::default());
        let enforcer = enforcer(api.clone(), PoliciesConfig::default());

        let outcome = enforcer
            .handle(&event(
                "google.cloud.dialogflow.cx.v3.Agents.UpdateAgent",
                "projects/p/locations/global/agents/a",
                json!({ "enableLogging": true }),
            ))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Compliant));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_method_name_is_bad_input() {
        let api = Arc::new(MockApi::default());
        let enforcer = enforcer(api.clone(), PoliciesConfig::default());

        let data = json!({
            "protoPayload": {
                "serviceName": "dialogflow.googleapis.com",
                "resourceName": "projects/p/locations/global/agents/a",
            }
        })
        .to_string()
        .into_bytes();

        let err = enforcer.handle_payload(&data).await.unwrap_err();
        assert!(matches!(err, EnforcerError::BadInput(_)));
        assert!(!err.is_retryable());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_remediation_failure_is_retryable() {
        let api = Arc::new(MockApi::failing());
        let enforcer = enforcer(api.clone(), PoliciesConfig::default());

        let err = enforcer
            .handle(&event(
                "google.cloud.dialogflow.cx.v3.Agents.UpdateAgent",
                "projects/p/locations/global/agents/a",
                json!({ "enableLogging": false }),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, EnforcerError::Remediation { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_redelivery_converges_to_the_same_state() {
        let api = Arc::new(MockApi::default());
        let enforcer = enforcer(api.clone(), PoliciesConfig::default());

        let event = event(
            "google.cloud.dialogflow.cx.v3.Agents.UpdateAgent",
            "projects/p/locations/global/agents/a",
            json!({ "enableLogging": false }),
        );

        enforcer.handle(&event).await.unwrap();
        let state_once = api.logging_state();

        enforcer.handle(&event).await.unwrap();
        let state_twice = api.logging_state();

        assert_eq!(state_once, state_twice);
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_update_webhook_example_remediates_owning_agent() {
        let api = Arc::new(MockApi::default());
        let enforcer = enforcer(api.clone(), PoliciesConfig::default());

        let outcome = enforcer
            .handle(&event(
                "google.cloud.dialogflow.cx.v3.Webhooks.UpdateWebhook",
                "projects/p/locations/global/agents/a/webhooks/w",
                json!({ "enableLogging": false }),
            ))
            .await
            .unwrap();

        let Outcome::Remediated(records) = outcome else {
            panic!("expected remediation");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(
            api.calls(),
            ["enable_agent_logging projects/p/locations/global/agents/a"]
        );
        assert_eq!(
            api.logging_state().get("projects/p/locations/global/agents/a"),
            Some(&true)
        );
    }

    #[tokio::test]
    async fn test_create_agent_fans_out_over_parent() {
        let api = Arc::new(MockApi::default());
        let enforcer = enforcer(api.clone(), PoliciesConfig::default());

        let outcome = enforcer
            .handle(&event(
                "google.cloud.dialogflow.cx.v3.Agents.CreateAgent",
                "projects/p/locations/eu-west1",
                json!({
                    "parent": "projects/p/locations/eu-west1",
                    "agent": { "advancedSettings": {
                        "loggingSettings": { "enableStackdriverLogging": false }
                    } }
                }),
            ))
            .await
            .unwrap();

        let Outcome::Remediated(records) = outcome else {
            panic!("expected remediation");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(
            api.calls(),
            ["enable_logging_for_agents_under projects/p/locations/eu-west1"]
        );
    }

    #[tokio::test]
    async fn test_es_fulfillment_logging_violation() {
        let api = Arc::new(MockApi::default());
        let enforcer = enforcer(api.clone(), PoliciesConfig::default());

        let outcome = enforcer
            .handle(&event(
                "google.cloud.dialogflow.v2.Fulfillments.UpdateFulfillment",
                "projects/p/agent/fulfillment",
                json!({ "enableLogging": false }),
            ))
            .await
            .unwrap();

        let Outcome::Remediated(records) = outcome else {
            panic!("expected remediation");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(api.calls(), ["enable_es_agent_logging projects/p"]);
    }

    #[tokio::test]
    async fn test_credential_scrub_when_enabled() {
        let api = Arc::new(MockApi::default());
        let enforcer = enforcer(
            api.clone(),
            PoliciesConfig {
                enforce_logging: false,
                scrub_credentials: true,
            },
        );

        let outcome = enforcer
            .handle(&event(
                "google.cloud.dialogflow.cx.v3.Webhooks.UpdateWebhook",
                "projects/p/locations/global/agents/a/webhooks/w",
                json!({ "webhook": { "genericWebService": { "username": "admin" } } }),
            ))
            .await
            .unwrap();

        let Outcome::Remediated(records) = outcome else {
            panic!("expected remediation");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rule_id, "no-static-credentials");
        assert_eq!(
            api.calls(),
            ["scrub_webhook_credentials projects/p/locations/global/agents/a/webhooks/w"]
        );
    }

    #[tokio::test]
    async fn test_both_rules_fire_on_one_event() {
        let api = Arc::new(MockApi::default());
        let enforcer = enforcer(
            api.clone(),
            PoliciesConfig {
                enforce_logging: true,
                scrub_credentials: true,
            },
        );

        let outcome = enforcer
            .handle(&event(
                "google.cloud.dialogflow.cx.v3.Webhooks.UpdateWebhook",
                "projects/p/locations/global/agents/a/webhooks/w",
                json!({ "enableLogging": false }),
            ))
            .await
            .unwrap();

        let Outcome::Remediated(records) = outcome else {
            panic!("expected remediation");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(
            api.calls(),
            [
                "enable_agent_logging projects/p/locations/global/agents/a",
                "scrub_webhook_credentials projects/p/locations/global/agents/a/webhooks/w",
            ]
        );
    }

    #[tokio::test]
    async fn test_unresolvable_target_is_not_retryable() {
        let api = Arc::new(MockApi::default());
        let enforcer = enforcer(api.clone(), PoliciesConfig::default());

        let err = enforcer
            .handle(&event(
                "google.cloud.dialogflow.cx.v3.Agents.CreateAgent",
                "organizations/strange/shape",
                json!({ "enableLogging": false }),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, EnforcerError::Unresolvable(_)));
        assert!(!err.is_retryable());
        assert!(api.calls().is_empty());
    }
}
