use anyhow::Context;
use std::sync::Arc;
use warden_core::{ApiConfig, WardenConfig};
use warden_dialogflow::{
    DialogflowClient, MetadataTokenProvider, StaticTokenProvider, TokenProvider,
};
use warden_enforcer::{DialogflowRemediator, Enforcer, TracingSink};
use warden_policy::RuleSet;
use warden_server::routes;
use warden_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut config = load_config()?;
    if config.project.is_none() {
        // Ambient project identity, resolved once at startup.
        config.project = std::env::var("GOOGLE_CLOUD_PROJECT").ok();
    }

    let token = token_provider(&config.api)?;
    let client = DialogflowClient::new(&config.api, token)?;
    let enforcer = Arc::new(Enforcer::new(
        config.project.clone(),
        RuleSet::from_config(&config.policies),
        Arc::new(DialogflowRemediator::new(client)),
        Arc::new(TracingSink),
    ));

    let app = routes::router(AppState { enforcer });
    let addr = config.server.bind_addr();
    tracing::info!("warden-server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_config() -> anyhow::Result<WardenConfig> {
    match std::env::var("WARDEN_CONFIG") {
        Ok(path) => WardenConfig::from_file(&path)
            .with_context(|| format!("loading configuration from {path}")),
        Err(_) => Ok(WardenConfig::default()),
    }
}

fn token_provider(api: &ApiConfig) -> anyhow::Result<Arc<dyn TokenProvider>> {
    if let Some(var) = &api.access_token_env {
        if let Ok(token) = std::env::var(var) {
            return Ok(Arc::new(StaticTokenProvider::new(token)));
        }
    }
    Ok(Arc::new(MetadataTokenProvider::new()?))
}
