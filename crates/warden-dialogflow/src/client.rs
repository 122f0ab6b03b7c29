//! The Dialogflow REST client.

use crate::auth::TokenProvider;
use crate::endpoint::regional_endpoint;
use crate::error::DialogflowError;
use crate::types::{
    AdvancedSettings, Agent, EsAgent, Fulfillment, GenericWebService, GoogleErrorBody,
    ListAgentsResponse, ListWebhooksResponse, LoggingSettings, Webhook,
};
use reqwest::{Method, RequestBuilder, Response};
use std::sync::Arc;
use std::time::Duration;
use warden_core::ApiConfig;

/// Update mask blanking static credentials.
const CREDENTIAL_MASK: &str = "genericWebService.username,genericWebService.password";

/// Client for the Dialogflow CX v3 and ES v2 REST surfaces.
///
/// Each call is a single attempt bounded by the configured timeout; the
/// message delivery layer owns retry.
pub struct DialogflowClient {
    http: reqwest::Client,
    token: Arc<dyn TokenProvider>,
    endpoint_override: Option<String>,
}

impl DialogflowClient {
    /// Build a client from configuration and a token source.
    pub fn new(
        config: &ApiConfig,
        token: Arc<dyn TokenProvider>,
    ) -> Result<Self, DialogflowError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(DialogflowError::Client)?;

        Ok(Self {
            http,
            token,
            endpoint_override: config.endpoint.clone(),
        })
    }

    fn base_url(&self, location: Option<&str>) -> String {
        self.endpoint_override
            .clone()
            .unwrap_or_else(|| regional_endpoint(location))
    }

    /// Force stackdriver and interaction logging on for a CX agent.
    pub async fn enable_agent_logging(
        &self,
        location: Option<&str>,
        agent: &str,
    ) -> Result<(), DialogflowError> {
        let url = format!("{}/v3/{}", self.base_url(location), agent);
        let body = Agent {
            advanced_settings: Some(AdvancedSettings {
                logging_settings: Some(LoggingSettings {
                    enable_stackdriver_logging: true,
                    enable_interaction_logging: true,
                }),
            }),
            ..Default::default()
        };

        let builder = self
            .request(Method::PATCH, &url, &[("updateMask", "advancedSettings")])
            .await?
            .json(&body);
        self.execute(builder, &url).await?;
        Ok(())
    }

    /// List every CX agent under a location parent.
    pub async fn list_agents(
        &self,
        location: Option<&str>,
        parent: &str,
    ) -> Result<Vec<Agent>, DialogflowError> {
        let url = format!("{}/v3/{}/agents", self.base_url(location), parent);
        let mut agents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = Vec::new();
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let builder = self.request(Method::GET, &url, &query).await?;
            let response = self.execute(builder, &url).await?;
            let page: ListAgentsResponse =
                response.json().await.map_err(|source| DialogflowError::Decode {
                    url: url.clone(),
                    source,
                })?;

            agents.extend(page.agents);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(agents)
    }

    /// Force logging on for an ES project agent via `SetAgent`.
    pub async fn enable_es_agent_logging(
        &self,
        location: Option<&str>,
        parent: &str,
    ) -> Result<(), DialogflowError> {
        let url = format!("{}/v2/{}/agent", self.base_url(location), parent);
        let body = EsAgent {
            parent: parent.to_string(),
            enable_logging: true,
        };

        let builder = self
            .request(Method::POST, &url, &[("updateMask", "enableLogging")])
            .await?
            .json(&body);
        self.execute(builder, &url).await?;
        Ok(())
    }

    /// Blank the static credentials of a CX webhook.
    pub async fn scrub_webhook_credentials(
        &self,
        location: Option<&str>,
        webhook: &str,
    ) -> Result<(), DialogflowError> {
        let url = format!("{}/v3/{}", self.base_url(location), webhook);
        let body = Webhook {
            generic_web_service: Some(GenericWebService::default()),
            ..Default::default()
        };

        let builder = self
            .request(Method::PATCH, &url, &[("updateMask", CREDENTIAL_MASK)])
            .await?
            .json(&body);
        self.execute(builder, &url).await?;
        Ok(())
    }

    /// List every webhook under a CX agent.
    pub async fn list_webhooks(
        &self,
        location: Option<&str>,
        agent: &str,
    ) -> Result<Vec<Webhook>, DialogflowError> {
        let url = format!("{}/v3/{}/webhooks", self.base_url(location), agent);
        let mut webhooks = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = Vec::new();
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let builder = self.request(Method::GET, &url, &query).await?;
            let response = self.execute(builder, &url).await?;
            let page: ListWebhooksResponse =
                response.json().await.map_err(|source| DialogflowError::Decode {
                    url: url.clone(),
                    source,
                })?;

            webhooks.extend(page.webhooks);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(webhooks)
    }

    /// Blank the static credentials of an ES fulfillment.
    pub async fn scrub_fulfillment_credentials(
        &self,
        location: Option<&str>,
        name: &str,
    ) -> Result<(), DialogflowError> {
        let url = format!("{}/v2/{}", self.base_url(location), name);
        let body = Fulfillment {
            name: name.to_string(),
            generic_web_service: Some(GenericWebService::default()),
        };

        let builder = self
            .request(Method::PATCH, &url, &[("updateMask", CREDENTIAL_MASK)])
            .await?
            .json(&body);
        self.execute(builder, &url).await?;
        Ok(())
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<RequestBuilder, DialogflowError> {
        let token = self.token.access_token().await?;
        tracing::debug!(%method, %url, "sending Dialogflow request");
        Ok(self.http.request(method, url).bearer_auth(token).query(query))
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        url: &str,
    ) -> Result<Response, DialogflowError> {
        let response = builder
            .send()
            .await
            .map_err(|source| DialogflowError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<GoogleErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };

        Err(DialogflowError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}
