//! HTTP surface of the Warden enforcer.
//!
//! Exposed as a library so integration tests can drive the router
//! in-process; the binary in `main.rs` wires configuration and the real
//! Dialogflow client around it.

pub mod routes;
pub mod state;
