//! Shared types for the order-management demo.
//!
//! Identifier newtypes live here so that every crate agrees on what a
//! customer, product or order reference looks like without pulling in the
//! domain layer.

pub mod types;

pub use types::{CorrelationId, CustomerId, OrderId, ProductId};
