//! Immutable, categorized error values.

use std::collections::BTreeMap;

use common::CorrelationId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::category::ErrorCategory;

/// Code substituted when a caller constructs an error without one.
pub const GENERAL_CODE: &str = "general.failure";

/// Message substituted when a caller constructs an error without one.
pub const GENERAL_MESSAGE: &str = "An unexpected failure occurred";

/// Structured payload carried by specialized error values.
///
/// These are variants of [`Error`], not a separate hierarchy: every error is
/// the same value type, and the detail adds machine-readable context for the
/// failure kinds that have more to say than code/message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorDetail {
    /// No structured payload beyond code/message/metadata.
    #[default]
    None,

    /// A named field failed validation, optionally with the attempted value.
    Validation {
        field: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        attempted: Option<Value>,
    },

    /// An illegal state-machine transition was requested.
    Transition {
        entity: String,
        from: String,
        to: String,
    },

    /// An ordered, non-empty collection of independent child failures.
    Composite { errors: Vec<Error> },
}

/// An immutable description of one failure.
///
/// Code, message and category are fixed at construction; metadata may be
/// appended builder-style afterwards. Equality is structural over
/// (code, message, category) only — metadata and detail are excluded so that
/// enriching an error does not break comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Error {
    code: String,
    message: String,
    category: ErrorCategory,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "is_none_detail")]
    detail: ErrorDetail,
}

fn is_none_detail(detail: &ErrorDetail) -> bool {
    matches!(detail, ErrorDetail::None)
}

impl Error {
    /// Creates an error with an explicit code, message and category.
    ///
    /// Empty code or message fall back to the generic defaults.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        category: ErrorCategory,
    ) -> Self {
        let code = code.into();
        let message = message.into();
        Self {
            code: if code.is_empty() {
                GENERAL_CODE.to_string()
            } else {
                code
            },
            message: if message.is_empty() {
                GENERAL_MESSAGE.to_string()
            } else {
                message
            },
            category,
            metadata: BTreeMap::new(),
            detail: ErrorDetail::None,
        }
    }

    /// A business-rule failure with the given code.
    pub fn business(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, ErrorCategory::Failure)
    }

    /// A validation failure for one named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        Self::new("general.validation", message, ErrorCategory::Validation).with_detail(
            ErrorDetail::Validation {
                field,
                attempted: None,
            },
        )
    }

    /// A not-found failure for an entity looked up by id.
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        let entity = entity.into();
        let id = id.to_string();
        Self::new(
            "general.not_found",
            format!("{entity} with id {id} was not found"),
            ErrorCategory::NotFound,
        )
        .with_metadata("entity", Value::String(entity))
        .with_metadata("id", Value::String(id))
    }

    /// A conflict failure (duplicate or stale version).
    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, ErrorCategory::Conflict)
    }

    /// An illegal state-transition failure.
    pub fn invalid_transition(
        entity: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        let entity = entity.into();
        let from = from.into();
        let to = to.into();
        Self::new(
            "general.invalid_transition",
            format!("{entity} cannot transition from {from} to {to}"),
            ErrorCategory::Failure,
        )
        .with_detail(ErrorDetail::Transition { entity, from, to })
    }

    /// An unexpected/infrastructure failure.
    pub fn critical(message: impl Into<String>) -> Self {
        Self::new("general.critical", message, ErrorCategory::Critical)
    }

    /// Wraps an ordered, non-empty list of child errors.
    ///
    /// The composite takes the children's category when they all agree, and
    /// falls back to `Failure` for a mixed set, so the HTTP mapping of a
    /// uniform batch (e.g. all validation) stays intuitive.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty; an empty composite is a programming
    /// error, not a representable failure.
    pub fn composite(children: Vec<Error>) -> Self {
        assert!(
            !children.is_empty(),
            "a composite error requires at least one child"
        );
        let category = children
            .iter()
            .map(|c| c.category)
            .reduce(|a, b| if a == b { a } else { ErrorCategory::Failure })
            .unwrap_or_default();
        let count = children.len();
        Self::new(
            "general.composite",
            format!("{count} failures occurred"),
            category,
        )
        .with_detail(ErrorDetail::Composite { errors: children })
    }

    /// Attaches the structured detail payload.
    pub fn with_detail(mut self, detail: ErrorDetail) -> Self {
        self.detail = detail;
        self
    }

    /// Appends one metadata entry, replacing any existing entry with the
    /// same key.
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Appends the correlation identifier under the `correlation_id` key.
    pub fn with_correlation(self, correlation_id: CorrelationId) -> Self {
        self.with_metadata(
            "correlation_id",
            Value::String(correlation_id.to_string()),
        )
    }

    /// Returns the stable machine code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the failure category.
    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    /// Returns the metadata entries.
    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// Returns the structured detail payload.
    pub fn detail(&self) -> &ErrorDetail {
        &self.detail
    }

    /// Returns the child errors when this is a composite, empty otherwise.
    pub fn children(&self) -> &[Error] {
        match &self.detail {
            ErrorDetail::Composite { errors } => errors,
            _ => &[],
        }
    }

    /// Returns the validated field name when this is a validation error.
    pub fn field(&self) -> Option<&str> {
        match &self.detail {
            ErrorDetail::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
            && self.message == other.message
            && self.category == other.category
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.category, self.code, self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_code_and_message_fall_back_to_defaults() {
        let err = Error::new("", "", ErrorCategory::Failure);
        assert_eq!(err.code(), GENERAL_CODE);
        assert_eq!(err.message(), GENERAL_MESSAGE);
    }

    #[test]
    fn equality_ignores_metadata() {
        let a = Error::business("order.no_items", "Order has no items");
        let b = Error::business("order.no_items", "Order has no items")
            .with_metadata("order_id", Value::String("abc".into()));
        assert_eq!(a, b);
    }

    #[test]
    fn equality_respects_code_message_category() {
        let a = Error::business("order.no_items", "Order has no items");
        let b = Error::business("order.empty", "Order has no items");
        assert_ne!(a, b);

        let c = Error::new("order.no_items", "Order has no items", ErrorCategory::Validation);
        assert_ne!(a, c);
    }

    #[test]
    fn metadata_accumulates_and_replaces_by_key() {
        let err = Error::business("x", "y")
            .with_metadata("k", Value::from(1))
            .with_metadata("k", Value::from(2))
            .with_metadata("other", Value::from(3));
        assert_eq!(err.metadata().len(), 2);
        assert_eq!(err.metadata()["k"], Value::from(2));
    }

    #[test]
    fn validation_carries_field() {
        let err = Error::validation("email", "Email is malformed");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.field(), Some("email"));
    }

    #[test]
    fn not_found_carries_entity_and_id() {
        let err = Error::not_found("Customer", "42");
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.metadata()["entity"], Value::String("Customer".into()));
        assert_eq!(err.metadata()["id"], Value::String("42".into()));
    }

    #[test]
    fn composite_preserves_child_order() {
        let a = Error::validation("name", "Name is required");
        let b = Error::validation("email", "Email is malformed");
        let composite = Error::composite(vec![a.clone(), b.clone()]);
        assert_eq!(composite.children(), &[a, b]);
    }

    #[test]
    fn composite_of_uniform_category_keeps_it() {
        let composite = Error::composite(vec![
            Error::validation("name", "bad"),
            Error::validation("email", "bad"),
        ]);
        assert_eq!(composite.category(), ErrorCategory::Validation);
    }

    #[test]
    fn composite_of_mixed_categories_is_failure() {
        let composite = Error::composite(vec![
            Error::validation("name", "bad"),
            Error::not_found("Product", "7"),
        ]);
        assert_eq!(composite.category(), ErrorCategory::Failure);
    }

    #[test]
    #[should_panic(expected = "at least one child")]
    fn empty_composite_panics() {
        let _ = Error::composite(vec![]);
    }

    #[test]
    fn correlation_lands_in_metadata() {
        let id = common::CorrelationId::fallback();
        let err = Error::business("x", "y").with_correlation(id);
        assert_eq!(
            err.metadata()["correlation_id"],
            Value::String(id.to_string())
        );
    }

    #[test]
    fn serializes_without_empty_fields() {
        let err = Error::business("order.no_items", "Order has no items");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "order.no_items");
        assert!(json.get("metadata").is_none());
        assert!(json.get("detail").is_none());
    }
}
