//! Order workflow services, one per error discipline.
//!
//! [`FaultOrderWorkflow`] and [`OutcomeOrderWorkflow`] implement the same
//! operations over the same repositories with the same step order:
//! validate inputs, fetch referenced entities, check not-found, check
//! business preconditions, mutate, persist.
//!
//! The fault service lets every fault propagate to the caller with `?` and
//! never catches or wraps one. The outcome service inspects every step's
//! [`outcome::Outcome`] at the call site and returns the failure before any
//! later step runs; its `place_order` shows the same discipline as one
//! `bind` chain across the whole order lifecycle.
//!
//! Entities are loaded, mutated locally and only persisted once every
//! precondition has passed, so a rejected operation is never half-saved.

pub mod fault_service;
pub mod outcome_service;

pub use fault_service::FaultOrderWorkflow;
pub use outcome_service::OutcomeOrderWorkflow;
