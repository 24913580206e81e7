//! The success/failure container and its combinators.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A container holding either a success value or exactly one [`Error`].
///
/// The sum type makes the mutual-exclusion invariant hold by construction:
/// a success carries no error and a failure carries no value. Reading the
/// wrong side ([`Outcome::value`] on a failure, [`Outcome::error`] on a
/// success) is caller misuse and panics — that is a logic bug in the caller,
/// not a domain failure, and is deliberately outside the error vocabulary.
///
/// Combinators follow railway semantics: a failure short-circuits every
/// subsequent step, and no mapping/binding function ever runs on a value
/// that does not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "body", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The operation succeeded with a value.
    Success(T),
    /// The operation failed with one error.
    Failure(Error),
}

/// Outcome of an operation with no meaningful success payload.
pub type UnitOutcome = Outcome<()>;

impl<T> Outcome<T> {
    /// Creates a successful outcome.
    pub fn success(value: T) -> Self {
        Outcome::Success(value)
    }

    /// Creates a failed outcome.
    pub fn failure(error: Error) -> Self {
        Outcome::Failure(error)
    }

    /// Converts a `Result` whose error type maps into [`Error`].
    pub fn from_result<E: Into<Error>>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(e) => Outcome::Failure(e.into()),
        }
    }

    /// Returns true if this is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns true if this is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Returns the success value.
    ///
    /// # Panics
    ///
    /// Panics if this is a failure. Accessing the value of a failed outcome
    /// is a programming error, not a recoverable condition.
    pub fn value(&self) -> &T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(error) => panic!(
                "attempted to read the value of a failed Outcome (error: {})",
                error.code()
            ),
        }
    }

    /// Consumes the outcome and returns the success value.
    ///
    /// # Panics
    ///
    /// Panics if this is a failure, like [`Outcome::value`].
    pub fn into_value(self) -> T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(error) => panic!(
                "attempted to read the value of a failed Outcome (error: {})",
                error.code()
            ),
        }
    }

    /// Returns the error.
    ///
    /// # Panics
    ///
    /// Panics if this is a success. Accessing the error of a successful
    /// outcome is a programming error.
    pub fn error(&self) -> &Error {
        match self {
            Outcome::Failure(error) => error,
            Outcome::Success(_) => {
                panic!("attempted to read the error of a successful Outcome")
            }
        }
    }

    /// Consumes the outcome and returns the error.
    ///
    /// # Panics
    ///
    /// Panics if this is a success, like [`Outcome::error`].
    pub fn into_error(self) -> Error {
        match self {
            Outcome::Failure(error) => error,
            Outcome::Success(_) => {
                panic!("attempted to read the error of a successful Outcome")
            }
        }
    }

    /// Returns the success value without panicking.
    pub fn value_opt(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// Returns the error without panicking.
    pub fn error_opt(&self) -> Option<&Error> {
        match self {
            Outcome::Failure(error) => Some(error),
            Outcome::Success(_) => None,
        }
    }

    /// Transforms the success value; a failure passes through unchanged.
    ///
    /// `f` is never invoked on a failure.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Sequences a dependent fallible step; a failure passes through
    /// unchanged and `f` is never invoked.
    ///
    /// This is the composition primitive: a chain of binds stops at the
    /// first failure without running any later step.
    pub fn bind<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Success(value) => f(value),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Invokes exactly one of the two branches and returns its result.
    pub fn match_with<R>(
        self,
        on_success: impl FnOnce(T) -> R,
        on_failure: impl FnOnce(Error) -> R,
    ) -> R {
        match self {
            Outcome::Success(value) => on_success(value),
            Outcome::Failure(error) => on_failure(error),
        }
    }

    /// Observes the success value without altering control flow.
    pub fn tap(self, f: impl FnOnce(&T)) -> Self {
        if let Outcome::Success(value) = &self {
            f(value);
        }
        self
    }

    /// Observes the error without altering control flow.
    pub fn tap_error(self, f: impl FnOnce(&Error)) -> Self {
        if let Outcome::Failure(error) = &self {
            f(error);
        }
        self
    }

    /// Turns a success whose value fails the predicate into the given
    /// failure. An existing failure passes through and the predicate is
    /// never evaluated.
    pub fn ensure(self, predicate: impl FnOnce(&T) -> bool, error: Error) -> Self {
        match self {
            Outcome::Success(value) => {
                if predicate(&value) {
                    Outcome::Success(value)
                } else {
                    Outcome::Failure(error)
                }
            }
            failure => failure,
        }
    }

    /// Async form of [`Outcome::map`]; same short-circuit and exactly-once
    /// semantics, with strictly sequential awaiting.
    pub async fn map_async<U, F, Fut>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = U>,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value).await),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Async form of [`Outcome::bind`]; a failure produced at any awaited
    /// step propagates without invoking later steps.
    pub async fn bind_async<U, F, Fut>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Outcome<U>>,
    {
        match self {
            Outcome::Success(value) => f(value).await,
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Converts into a plain `Result`, surrendering the combinators.
    pub fn into_result(self) -> Result<T, Error> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }
}

impl Outcome<()> {
    /// Creates a successful unit outcome.
    pub fn ok() -> Self {
        Outcome::Success(())
    }

    /// Combines many unit outcomes into one.
    ///
    /// Succeeds iff every input succeeded; otherwise fails with a single
    /// composite error wrapping every failing input's error, in input order.
    pub fn combine(outcomes: impl IntoIterator<Item = UnitOutcome>) -> UnitOutcome {
        let errors: Vec<Error> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                Outcome::Success(()) => None,
                Outcome::Failure(error) => Some(error),
            })
            .collect();

        if errors.is_empty() {
            Outcome::ok()
        } else {
            Outcome::Failure(Error::composite(errors))
        }
    }
}

impl<T, E: Into<Error>> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        Outcome::from_result(result)
    }
}
