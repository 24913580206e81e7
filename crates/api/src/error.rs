//! API error type with problem-details HTTP responses.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use domain::Fault;
use outcome::Error;

use crate::problem::ProblemDetails;

/// API-level error rendered as an RFC 7807 response.
///
/// Wraps a fault propagated by the strict workflow, an error value returned
/// by the outcome workflow, or a request that failed to parse before
/// reaching either.
#[derive(Debug)]
pub enum ApiError {
    /// A fault propagated, untouched, from the fault-discipline workflow.
    Fault(Fault),
    /// A failure returned by the outcome-discipline workflow.
    Outcome(Error),
    /// The request itself was malformed (bad ids, unknown currency codes).
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let problem = match &self {
            ApiError::Fault(fault) => ProblemDetails::from_fault(fault),
            ApiError::Outcome(error) => ProblemDetails::from_error(error),
            ApiError::BadRequest(message) => {
                ProblemDetails::from_error(&Error::validation("request", message.clone()))
            }
        };

        if problem.status >= 500 {
            tracing::error!(code = %problem.code, detail = %problem.detail, "internal failure");
        }

        let status =
            StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            axum::Json(problem),
        )
            .into_response()
    }
}

impl From<Fault> for ApiError {
    fn from(fault: Fault) -> Self {
        ApiError::Fault(fault)
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError::Outcome(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_maps_to_its_status_hint() {
        let response = ApiError::Fault(Fault::NoItems).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/problem+json"
        );
    }

    #[test]
    fn outcome_error_maps_through_category() {
        let response = ApiError::Outcome(Error::not_found("Order", "7")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_request_is_a_validation_problem() {
        let response = ApiError::BadRequest("invalid uuid".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
