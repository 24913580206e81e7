//! Failure categories and their HTTP mapping.

use serde::{Deserialize, Serialize};

/// The category of a failure.
///
/// Categories are a closed set so the HTTP boundary can map every failure to
/// a status code exhaustively. `Failure` is the default business-rule
/// category; `Critical` marks unexpected/infrastructure conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ErrorCategory {
    /// A domain precondition was violated.
    #[default]
    Failure,

    /// Input was malformed or missing.
    Validation,

    /// A referenced entity does not exist.
    NotFound,

    /// A duplicate or version mismatch was detected.
    Conflict,

    /// Credentials are missing.
    Unauthorized,

    /// Authenticated but not allowed.
    Forbidden,

    /// Unexpected or infrastructure failure.
    Critical,
}

impl ErrorCategory {
    /// Returns the HTTP status code this category maps to.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCategory::Failure => 422,
            ErrorCategory::Validation => 400,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Conflict => 409,
            ErrorCategory::Unauthorized => 401,
            ErrorCategory::Forbidden => 403,
            ErrorCategory::Critical => 500,
        }
    }

    /// Returns the category name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Failure => "Failure",
            ErrorCategory::Validation => "Validation",
            ErrorCategory::NotFound => "NotFound",
            ErrorCategory::Conflict => "Conflict",
            ErrorCategory::Unauthorized => "Unauthorized",
            ErrorCategory::Forbidden => "Forbidden",
            ErrorCategory::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
