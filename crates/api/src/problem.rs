//! RFC 7807 problem details bodies.

use std::collections::BTreeMap;

use domain::Fault;
use outcome::Error;
use serde::Serialize;
use serde_json::Value;

/// An RFC 7807 "Problem Details" response body.
///
/// Built from either discipline's failure value without any business
/// knowledge: a fault supplies its own code and status hint, an error value
/// maps through its category. The two constructors produce identical
/// type/title/status/code for a fault and its bridged error value.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    /// URI identifying the problem type.
    #[serde(rename = "type")]
    pub problem_type: String,

    /// Short human-readable summary (the failure category).
    pub title: String,

    /// HTTP status code.
    pub status: u16,

    /// Human-readable explanation of this occurrence.
    pub detail: String,

    /// Stable machine code.
    pub code: String,

    /// Structured failure metadata, flattened into the body. Includes the
    /// correlation id when the failure carries one.
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl ProblemDetails {
    /// Builds a body from a propagated fault (strict discipline).
    pub fn from_fault(fault: &Fault) -> Self {
        Self {
            problem_type: format!("urn:problem:{}", fault.code()),
            title: fault.category().to_string(),
            status: fault.status(),
            detail: fault.to_string(),
            code: fault.code().to_string(),
            extensions: BTreeMap::new(),
        }
    }

    /// Builds a body from an error value (outcome discipline).
    pub fn from_error(error: &Error) -> Self {
        Self {
            problem_type: format!("urn:problem:{}", error.code()),
            title: error.category().to_string(),
            status: error.category().http_status(),
            detail: error.message().to_string(),
            code: error.code().to_string(),
            extensions: error.metadata().clone(),
        }
    }
}
