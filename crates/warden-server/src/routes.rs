//! HTTP routes.

use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use warden_enforcer::Outcome;
use warden_event::PushEnvelope;

/// Build the router for the push endpoint and health check.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/pubsub/push", post(handle_push))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Pub/Sub push deliveries land here.
///
/// The response status is the acknowledgement: 2xx acks the message,
/// anything else triggers redelivery. Undecodable deliveries are acked
/// after a warning — a malformed event cannot become well-formed on
/// redelivery. The body is read raw so even non-JSON bodies reach that
/// path instead of an extractor rejection.
async fn handle_push(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let payload = PushEnvelope::from_json(&body).and_then(|e| e.message.decoded_data());
    let payload = match payload {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(error = %err, "dropping undecodable push delivery");
            return StatusCode::NO_CONTENT;
        }
    };

    match state.enforcer.handle_payload(&payload).await {
        Ok(Outcome::Ignored) | Ok(Outcome::Compliant) => StatusCode::NO_CONTENT,
        Ok(Outcome::Remediated(records)) => {
            tracing::info!(count = records.len(), "remediated non-compliant change");
            StatusCode::NO_CONTENT
        }
        Err(err) if err.is_retryable() => {
            tracing::error!(error = %err, "remediation failed; requesting redelivery");
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(err) => {
            tracing::warn!(error = %err, "dropping bad event");
            StatusCode::NO_CONTENT
        }
    }
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true, "service": "warden-server" }))
}
