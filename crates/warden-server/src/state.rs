//! Shared server state.

use std::sync::Arc;
use warden_enforcer::Enforcer;

/// State shared by all routes.
#[derive(Clone)]
pub struct AppState {
    /// The wired enforcer; stateless, shared across deliveries.
    pub enforcer: Arc<Enforcer>,
}
