//! Dialogflow REST client.
//!
//! Every write here is a corrective, idempotent call: PATCH/SET with an
//! explicit update mask naming only the fields being forced back into
//! compliance. The client makes a single attempt per call with a bounded
//! timeout; retry belongs to the message delivery layer.
//!
//! Dialogflow CX requires regional API endpoints, so each call takes the
//! resource location from the triggering event (see [`endpoint`]).

pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod types;

pub use auth::{MetadataTokenProvider, StaticTokenProvider, TokenProvider};
pub use client::DialogflowClient;
pub use error::DialogflowError;
pub use types::{Agent, GenericWebService, LoggingSettings, Webhook};
