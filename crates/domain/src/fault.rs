//! Typed faults for the strict error discipline.

use common::{CustomerId, ProductId};
use outcome::{Error, ErrorCategory, ErrorDetail};
use serde_json::Value;
use thiserror::Error as ThisError;

use crate::money::{Currency, Money};

/// Faults raised by domain operations in the strict discipline.
///
/// One closed enum covers every failure the domain can produce so the HTTP
/// mapping stays exhaustive. Each variant carries a stable machine code, a
/// category (which decides the HTTP status) and the structured context
/// needed to reconstruct the failing condition.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Fault {
    /// A named input field failed validation.
    #[error("validation failed for field '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    /// A money amount below zero was supplied.
    #[error("amount must not be negative (got {amount} cents)")]
    NegativeAmount { amount: i64 },

    /// A currency code outside the whitelist was supplied.
    #[error("unknown currency code '{code}'")]
    UnknownCurrency { code: String },

    /// Arithmetic between two different currencies was attempted.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },

    /// A subtraction would have produced a negative amount.
    #[error("cannot subtract {requested} cents from {available} cents {currency}")]
    InsufficientBalance {
        available: i64,
        requested: i64,
        currency: Currency,
    },

    /// A malformed email address was supplied.
    #[error("'{value}' is not a valid email address")]
    InvalidEmail { value: String },

    /// A referenced entity does not exist.
    #[error("{entity} with id {id} was not found")]
    NotFound { entity: &'static str, id: String },

    /// A state-machine transition outside the legal set was requested.
    #[error("{entity} cannot transition from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    /// An operation was requested in a state that does not permit it.
    #[error("{entity} cannot {operation} while {current} (requires {required})")]
    InvalidState {
        entity: &'static str,
        operation: &'static str,
        current: String,
        required: &'static str,
    },

    /// A credit debit exceeded the customer's available credit.
    #[error("customer {customer_id} has {available} available, requested {requested}")]
    InsufficientCredit {
        customer_id: CustomerId,
        available: Money,
        requested: Money,
    },

    /// A credit restore would have pushed available credit past the limit.
    #[error("restoring {amount} would exceed credit limit {limit} for customer {customer_id}")]
    CreditLimitExceeded {
        customer_id: CustomerId,
        limit: Money,
        amount: Money,
    },

    /// An update presented a stale expected version.
    #[error("{entity} {id} version conflict: expected {expected}, actual {actual}")]
    VersionConflict {
        entity: &'static str,
        id: String,
        expected: u64,
        actual: u64,
    },

    /// A reservation exceeded the product's current stock.
    #[error("product {product_id} has {available} in stock, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },

    /// Activation was requested for a product with no stock.
    #[error("product {product_id} cannot be activated with zero stock")]
    NoStock { product_id: ProductId },

    /// Submission was requested for an order with no items.
    #[error("order has no items")]
    NoItems,

    /// A line item for the given product is not present in the order.
    #[error("item for product {product_id} not found in order")]
    ItemNotFound { product_id: ProductId },

    /// A payment did not cover the order total.
    #[error("payment of {paid} does not cover order total {total}")]
    Underpayment { total: Money, paid: Money },
}

impl Fault {
    /// Returns the stable machine code for this fault.
    pub fn code(&self) -> &'static str {
        match self {
            Fault::Validation { .. } => "general.validation",
            Fault::NegativeAmount { .. } => "money.negative_amount",
            Fault::UnknownCurrency { .. } => "money.unknown_currency",
            Fault::CurrencyMismatch { .. } => "money.currency_mismatch",
            Fault::InsufficientBalance { .. } => "money.insufficient_balance",
            Fault::InvalidEmail { .. } => "email.invalid_format",
            Fault::NotFound { .. } => "general.not_found",
            Fault::InvalidTransition { .. } => "general.invalid_transition",
            Fault::InvalidState { .. } => "general.invalid_state",
            Fault::InsufficientCredit { .. } => "customer.insufficient_credit",
            Fault::CreditLimitExceeded { .. } => "customer.credit_limit_exceeded",
            Fault::VersionConflict { .. } => "general.version_conflict",
            Fault::InsufficientStock { .. } => "product.insufficient_stock",
            Fault::NoStock { .. } => "product.no_stock",
            Fault::NoItems => "order.no_items",
            Fault::ItemNotFound { .. } => "order.item_not_found",
            Fault::Underpayment { .. } => "order.underpayment",
        }
    }

    /// Returns the failure category this fault belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Fault::Validation { .. }
            | Fault::NegativeAmount { .. }
            | Fault::UnknownCurrency { .. }
            | Fault::InvalidEmail { .. } => ErrorCategory::Validation,
            Fault::NotFound { .. } | Fault::ItemNotFound { .. } => ErrorCategory::NotFound,
            Fault::VersionConflict { .. } => ErrorCategory::Conflict,
            Fault::CurrencyMismatch { .. }
            | Fault::InsufficientBalance { .. }
            | Fault::InvalidTransition { .. }
            | Fault::InvalidState { .. }
            | Fault::InsufficientCredit { .. }
            | Fault::CreditLimitExceeded { .. }
            | Fault::InsufficientStock { .. }
            | Fault::NoStock { .. }
            | Fault::NoItems
            | Fault::Underpayment { .. } => ErrorCategory::Failure,
        }
    }

    /// Returns the HTTP status hint for this fault.
    pub fn status(&self) -> u16 {
        self.category().http_status()
    }
}

fn money_value(money: &Money) -> Value {
    serde_json::json!({
        "cents": money.cents(),
        "currency": money.currency().as_str(),
    })
}

/// The single bridge from the strict discipline to the safe one.
///
/// Code, message and category carry over verbatim; structured fields land in
/// metadata (and in the detail payload for validation and transition
/// faults), so both disciplines report equivalent failure information.
impl From<Fault> for Error {
    fn from(fault: Fault) -> Self {
        let message = fault.to_string();
        let error = Error::new(fault.code(), message, fault.category());

        match fault {
            Fault::Validation { field, .. } => error.with_detail(ErrorDetail::Validation {
                field: field.to_string(),
                attempted: None,
            }),
            Fault::NegativeAmount { amount } => error.with_detail(ErrorDetail::Validation {
                field: "amount".to_string(),
                attempted: Some(Value::from(amount)),
            }),
            Fault::UnknownCurrency { code } => error.with_detail(ErrorDetail::Validation {
                field: "currency".to_string(),
                attempted: Some(Value::String(code)),
            }),
            Fault::CurrencyMismatch { left, right } => error
                .with_metadata("left", Value::String(left.as_str().to_string()))
                .with_metadata("right", Value::String(right.as_str().to_string())),
            Fault::InsufficientBalance {
                available,
                requested,
                currency,
            } => error
                .with_metadata("available", Value::from(available))
                .with_metadata("requested", Value::from(requested))
                .with_metadata("currency", Value::String(currency.as_str().to_string())),
            Fault::InvalidEmail { value } => error.with_detail(ErrorDetail::Validation {
                field: "email".to_string(),
                attempted: Some(Value::String(value)),
            }),
            Fault::NotFound { entity, id } => error
                .with_metadata("entity", Value::String(entity.to_string()))
                .with_metadata("id", Value::String(id)),
            Fault::InvalidTransition { entity, from, to } => {
                error.with_detail(ErrorDetail::Transition {
                    entity: entity.to_string(),
                    from,
                    to,
                })
            }
            Fault::InvalidState {
                entity,
                operation,
                current,
                required,
            } => error
                .with_metadata("entity", Value::String(entity.to_string()))
                .with_metadata("operation", Value::String(operation.to_string()))
                .with_metadata("current", Value::String(current))
                .with_metadata("required", Value::String(required.to_string())),
            Fault::InsufficientCredit {
                customer_id,
                available,
                requested,
            } => error
                .with_metadata("customer_id", Value::String(customer_id.to_string()))
                .with_metadata("available", money_value(&available))
                .with_metadata("requested", money_value(&requested)),
            Fault::CreditLimitExceeded {
                customer_id,
                limit,
                amount,
            } => error
                .with_metadata("customer_id", Value::String(customer_id.to_string()))
                .with_metadata("limit", money_value(&limit))
                .with_metadata("amount", money_value(&amount)),
            Fault::VersionConflict {
                entity,
                id,
                expected,
                actual,
            } => error
                .with_metadata("entity", Value::String(entity.to_string()))
                .with_metadata("id", Value::String(id))
                .with_metadata("expected", Value::from(expected))
                .with_metadata("actual", Value::from(actual)),
            Fault::InsufficientStock {
                product_id,
                available,
                requested,
            } => error
                .with_metadata("product_id", Value::String(product_id.to_string()))
                .with_metadata("available", Value::from(available))
                .with_metadata("requested", Value::from(requested)),
            Fault::NoStock { product_id } => {
                error.with_metadata("product_id", Value::String(product_id.to_string()))
            }
            Fault::NoItems => error,
            Fault::ItemNotFound { product_id } => {
                error.with_metadata("product_id", Value::String(product_id.to_string()))
            }
            Fault::Underpayment { total, paid } => error
                .with_metadata("total", money_value(&total))
                .with_metadata("paid", money_value(&paid)),
        }
    }
}
