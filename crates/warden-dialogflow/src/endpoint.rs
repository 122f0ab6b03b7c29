//! Regional endpoint resolution.
//!
//! Dialogflow CX serves regional agents from regional endpoints
//! (`us-central1-dialogflow.googleapis.com` and so on); `global` and
//! unlocated resources use the default host.

/// Production API host.
pub const DEFAULT_HOST: &str = "dialogflow.googleapis.com";

/// Resolve the base URL for a resource location.
pub fn regional_endpoint(location: Option<&str>) -> String {
    match location {
        None | Some("") | Some("global") => format!("https://{DEFAULT_HOST}"),
        Some(region) => format!("https://{region}-{DEFAULT_HOST}"),
    }
}
