//! The remediation API boundary.

use async_trait::async_trait;
use warden_dialogflow::DialogflowClient;

/// Corrective writes the enforcer can issue.
///
/// Fan-out variants return the names of every resource touched so each
/// write gets its own report record.
#[async_trait]
pub trait RemediationApi: Send + Sync {
    /// Enable logging on one CX agent.
    async fn enable_agent_logging(
        &self,
        location: Option<&str>,
        agent: &str,
    ) -> anyhow::Result<()>;

    /// Enable logging on every CX agent under a location parent.
    async fn enable_logging_for_agents_under(
        &self,
        location: Option<&str>,
        parent: &str,
    ) -> anyhow::Result<Vec<String>>;

    /// Enable logging on an ES project agent.
    async fn enable_es_agent_logging(
        &self,
        location: Option<&str>,
        parent: &str,
    ) -> anyhow::Result<()>;

    /// Blank the static credentials of one CX webhook.
    async fn scrub_webhook_credentials(
        &self,
        location: Option<&str>,
        webhook: &str,
    ) -> anyhow::Result<()>;

    /// Blank the static credentials of every webhook under an agent.
    async fn scrub_webhooks_under(
        &self,
        location: Option<&str>,
        agent: &str,
    ) -> anyhow::Result<Vec<String>>;

    /// Blank the static credentials of an ES fulfillment.
    async fn scrub_fulfillment_credentials(
        &self,
        location: Option<&str>,
        name: &str,
    ) -> anyhow::Result<()>;
}

/// Production adapter backed by the Dialogflow REST client.
pub struct DialogflowRemediator {
    client: DialogflowClient,
}

impl DialogflowRemediator {
    pub fn new(client: DialogflowClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemediationApi for DialogflowRemediator {
    async fn enable_agent_logging(
        &self,
        location: Option<&str>,
        agent: &str,
    ) -> anyhow::Result<()> {
        self.client.enable_agent_logging(location, agent).await?;
        Ok(())
    }

    async fn enable_logging_for_agents_under(
        &self,
        location: Option<&str>,
        parent: &str,
    ) -> anyhow::Result<Vec<String>> {
        let agents = self.client.list_agents(location, parent).await?;
        let mut enforced = Vec::with_capacity(agents.len());
        for agent in agents {
            self.client.enable_agent_logging(location, &agent.name).await?;
            enforced.push(agent.name);
        }
        Ok(enforced)
    }

    async fn enable_es_agent_logging(
        &self,
        location: Option<&str>,
        parent: &str,
    ) -> anyhow::Result<()> {
        self.client.enable_es_agent_logging(location, parent).await?;
        Ok(())
    }

    async fn scrub_webhook_credentials(
        &self,
        location: Option<&str>,
        webhook: &str,
    ) -> anyhow::Result<()> {
        self.client.scrub_webhook_credentials(location, webhook).await?;
        Ok(())
    }

    async fn scrub_webhooks_under(
        &self,
        location: Option<&str>,
        agent: &str,
    ) -> anyhow::Result<Vec<String>> {
        let webhooks = self.client.list_webhooks(location, agent).await?;
        let mut scrubbed = Vec::with_capacity(webhooks.len());
        for webhook in webhooks {
            self.client
                .scrub_webhook_credentials(location, &webhook.name)
                .await?;
            scrubbed.push(webhook.name);
        }
        Ok(scrubbed)
    }

    async fn scrub_fulfillment_credentials(
        &self,
        location: Option<&str>,
        name: &str,
    ) -> anyhow::Result<()> {
        self.client
            .scrub_fulfillment_credentials(location, name)
            .await?;
        Ok(())
    }
}
