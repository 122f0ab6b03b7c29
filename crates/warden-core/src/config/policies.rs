//! Policy toggles.

use serde::{Deserialize, Serialize};

/// Toggles controlling which policy rules are active.
///
/// Each toggle corresponds to one row in the rule table; adding a policy
/// means adding a toggle here and a rule row in `warden-policy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoliciesConfig {
    /// Require interaction logging on every Dialogflow agent.
    #[serde(default = "default_enforce_logging")]
    pub enforce_logging: bool,

    /// Strip static username/password credentials from webhooks and
    /// fulfillments. Off by default.
    #[serde(default)]
    pub scrub_credentials: bool,
}

impl Default for PoliciesConfig {
    fn default() -> Self {
        Self {
            enforce_logging: default_enforce_logging(),
            scrub_credentials: false,
        }
    }
}

fn default_enforce_logging() -> bool {
    true
}
