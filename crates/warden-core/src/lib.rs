// Configuration types shared across all Warden crates
pub mod config;

// Re-export commonly used config types for convenience
pub use config::{ApiConfig, ConfigError, PoliciesConfig, ServerConfig, WardenConfig};
