//! OAuth access tokens for outbound API calls.

use crate::error::DialogflowError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Metadata-server URL serving tokens for the attached service account.
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Refresh this long before the reported expiry.
const EXPIRY_SLACK: Duration = Duration::from_secs(60);

/// Source of bearer tokens for the Dialogflow API.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// A currently valid access token.
    async fn access_token(&self) -> Result<String, DialogflowError>;
}

/// Serves one fixed token. For tests and local runs.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, DialogflowError> {
        Ok(self.token.clone())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Fetches tokens from the GCE metadata server, caching until shortly
/// before expiry. This is the ambient identity of the execution
/// environment; no key material is configured or stored.
pub struct MetadataTokenProvider {
    http: reqwest::Client,
    endpoint: String,
    cached: RwLock<Option<CachedToken>>,
}

impl MetadataTokenProvider {
    /// Provider against the real metadata server.
    pub fn new() -> Result<Self, DialogflowError> {
        Self::with_endpoint(METADATA_TOKEN_URL)
    }

    /// Provider against a custom token URL. Tests point this at a mock.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, DialogflowError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(DialogflowError::Client)?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            cached: RwLock::new(None),
        })
    }

    async fn fetch(&self) -> Result<TokenResponse, DialogflowError> {
        let response = self
            .http
            .get(&self.endpoint)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|err| DialogflowError::Auth(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DialogflowError::Auth(format!(
                "metadata server returned HTTP {status}"
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|err| DialogflowError::Auth(err.to_string()))
    }
}

#[async_trait]
impl TokenProvider for MetadataTokenProvider {
    async fn access_token(&self) -> Result<String, DialogflowError> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.token.clone());
            }
        }

        let fetched = self.fetch().await?;
        tracing::debug!(expires_in = fetched.expires_in, "fetched access token");

        let expires_at = Instant::now()
            + Duration::from_secs(fetched.expires_in).saturating_sub(EXPIRY_SLACK);
        *self.cached.write().await = Some(CachedToken {
            token: fetched.access_token.clone(),
            expires_at,
        });

        Ok(fetched.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_static_provider_returns_token() {
        let provider = StaticTokenProvider::new("fixed");
        assert_eq!(provider.access_token().await.unwrap(), "fixed");
    }

    #[tokio::test]
    async fn test_metadata_provider_fetches_and_caches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/token"))
            .and(header("Metadata-Flavor", "Google"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "abc123",
                "expires_in": 3600,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            MetadataTokenProvider::with_endpoint(format!("{}/token", server.uri())).unwrap();

        assert_eq!(provider.access_token().await.unwrap(), "abc123");
        // Second call must come from the cache; the mock expects one hit.
        assert_eq!(provider.access_token().await.unwrap(), "abc123");
    }

    #[tokio::test]
    async fn test_metadata_provider_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let provider = MetadataTokenProvider::with_endpoint(server.uri()).unwrap();
        let err = provider.access_token().await.unwrap_err();
        assert!(matches!(err, DialogflowError::Auth(_)));
    }
}
