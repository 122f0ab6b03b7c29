//! Warden policy model.
//!
//! Policies are rows in a declarative rule table: each [`PolicyRule`] pairs
//! a predicate over audit events (method suffixes plus request-field
//! conditions) with a remediation kind. The matcher never special-cases a
//! rule; adding a policy means adding a row and a config toggle.
//!
//! [`RuleSet::evaluate`] classifies an event; [`plan`] turns a matched rule
//! plus the event's resource name into a concrete [`Remediation`].

pub mod remediation;
pub mod rules;

pub use remediation::{PlanError, Remediation, plan};
pub use rules::{FieldCondition, PolicyKind, PolicyRule, RuleSet};
