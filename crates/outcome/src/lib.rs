//! Explicit success/failure handling for the order-management demo.
//!
//! This crate provides the result-value half of the demo's two error
//! disciplines:
//! - [`Error`] — an immutable, categorized description of one failure with a
//!   stable machine code, human message and structured metadata
//! - [`Outcome`] — a container holding either a success value or exactly one
//!   [`Error`], with the combinators needed for railway-style composition
//!   (map, bind, tap, ensure, combine)
//!
//! The fault-raising half of the demo lives in the `domain` crate; both
//! halves converge on [`ErrorCategory`] so the HTTP boundary can map any
//! failure to a status code without business knowledge.

pub mod category;
pub mod container;
pub mod error;

pub use category::ErrorCategory;
pub use container::{Outcome, UnitOutcome};
pub use error::{Error, ErrorDetail};
