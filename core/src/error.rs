//! Error taxonomy shared by the engine and its collaborators.
//!
//! Every failure class named here is machine-distinguishable so callers can
//! render distinct messages or decide on retries. Validation and
//! authorization failures are surfaced to the caller and never retried;
//! [`StoreError::Unavailable`] is the only class eligible for caller-driven
//! retry.

use crate::appointment::{AppointmentId, AppointmentStatus};
use crate::identity::Role;
use thiserror::Error;

/// Rejection reasons produced by the availability validator.
///
/// Checks run in declaration order and short-circuit on the first failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Service name, date, or time is missing or not parseable.
    #[error("service, date and time are required and must be well-formed")]
    MissingFields,

    /// Requested date lies strictly before the current date.
    #[error("requested date is in the past")]
    PastDate,

    /// Requested time falls outside the practice's opening hours.
    #[error("requested time is outside opening hours")]
    OutsideHours,

    /// No practice schedule has been configured yet.
    #[error("no practice schedule is configured")]
    NoScheduleConfigured,
}

/// Transport or persistence failure in an external store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The underlying store could not be reached or the round-trip failed.
    ///
    /// Callers may retry: `transition` is idempotent by construction, while
    /// retrying `submit` risks duplicate pending records (the engine carries
    /// no idempotency key).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failures of the lifecycle engine's operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No authenticated user is present.
    #[error("no authenticated user")]
    Unauthenticated,

    /// The caller lacks the required capability.
    #[error("caller lacks the {required} capability")]
    Unauthorized {
        /// The role the operation requires.
        required: Role,
    },

    /// No appointment exists with the given id.
    #[error("appointment not found: {0}")]
    NotFound(AppointmentId),

    /// Attempted to flip an appointment out of a terminal status.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Status the appointment currently holds.
        from: AppointmentStatus,
        /// Status the caller asked for.
        to: AppointmentStatus,
    },

    /// The booking candidate was rejected by the availability validator.
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    /// An external store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_convert_into_engine_errors() {
        let err: EngineError = ValidationError::OutsideHours.into();
        assert_eq!(err, EngineError::Rejected(ValidationError::OutsideHours));
    }

    #[test]
    fn store_errors_convert_into_engine_errors() {
        let err: EngineError = StoreError::Unavailable("connection reset".into()).into();
        assert!(matches!(err, EngineError::Store(_)));
    }

    #[test]
    fn display_messages_are_distinct() {
        let messages = [
            ValidationError::MissingFields.to_string(),
            ValidationError::PastDate.to_string(),
            ValidationError::OutsideHours.to_string(),
            ValidationError::NoScheduleConfigured.to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
