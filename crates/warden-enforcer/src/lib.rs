//! The Warden enforcement runtime.
//!
//! [`Enforcer`] is a stateless, single-hop handler: decode an audit event,
//! evaluate the rule table, issue the corrective API call(s), emit one
//! [`RemediationRecord`] per write. Delivery concerns (retry, ordering,
//! dead-lettering) stay with the messaging layer;
//! [`EnforcerError::is_retryable`] tells it which failures redelivery can
//! fix.

pub mod error;
pub mod handler;
pub mod remedy;
pub mod report;

pub use error::EnforcerError;
pub use handler::{Enforcer, Outcome};
pub use remedy::{DialogflowRemediator, RemediationApi};
pub use report::{RemediationRecord, RemediationSink, TracingSink};
