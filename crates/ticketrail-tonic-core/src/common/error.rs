//! Error types for the ticketing gRPC service.
//!
//! This module defines the transport-level `Error` enum. It wraps the domain
//! errors raised by [`ticketrail`] and adds the failures that only exist on
//! the wire. It implements `From<Error>` for `tonic::Status` so handlers can
//! return domain failures with `?`.
//!
//! ## Status mapping
//!
//! | Error | gRPC code |
//! |---|---|
//! | `InvalidArgument`, `InvalidRequest` | `INVALID_ARGUMENT` |
//! | `NotFound`, `SectionNotFound` | `NOT_FOUND` |
//! | `NoSeatsAvailable` | `RESOURCE_EXHAUSTED` |
//! | `SeatNotAssigned` | `FAILED_PRECONDITION` |
//! | `SeatUnavailable` | `ALREADY_EXISTS` |

use ticketrail::ErrorKind;
use tonic::{Code, Status};

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the ticketing service.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// A booking operation was rejected by the ledger or the allocator.
    #[error(transparent)]
    Booking(#[from] ticketrail::Error),

    /// The request message itself was malformed (e.g. a required nested
    /// message was absent).
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },
}

impl Error {
    pub(crate) fn missing(field: &str) -> Self {
        Self::InvalidRequest {
            reason: format!("missing required field `{field}`"),
        }
    }

    /// The gRPC status code this error is reported with.
    pub fn code(&self) -> Code {
        match self {
            Self::InvalidRequest { .. } => Code::InvalidArgument,
            Self::Booking(err) => match err.kind() {
                ErrorKind::InvalidArgument => Code::InvalidArgument,
                ErrorKind::NotFound | ErrorKind::SectionNotFound => Code::NotFound,
                ErrorKind::NoSeatsAvailable => Code::ResourceExhausted,
                ErrorKind::SeatNotAssigned => Code::FailedPrecondition,
                ErrorKind::SeatUnavailable => Code::AlreadyExists,
            },
        }
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        Status::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: ticketrail::Error) -> Status {
        Error::from(err).into()
    }

    #[test]
    fn maps_every_booking_failure() {
        let cases = [
            (
                ticketrail::Error::InvalidArgument {
                    reason: "missing required fields".into(),
                },
                Code::InvalidArgument,
            ),
            (
                ticketrail::Error::NotFound {
                    email: "x@y.com".into(),
                },
                Code::NotFound,
            ),
            (
                ticketrail::Error::NoSeatsAvailable { section: "A".into() },
                Code::ResourceExhausted,
            ),
            (
                ticketrail::Error::SectionNotFound { section: "Z".into() },
                Code::NotFound,
            ),
            (
                ticketrail::Error::SeatNotAssigned {
                    section: "A".into(),
                    seat: 1,
                },
                Code::FailedPrecondition,
            ),
            (
                ticketrail::Error::SeatUnavailable {
                    section: "B".into(),
                    seat: 2,
                },
                Code::AlreadyExists,
            ),
        ];

        for (err, code) in cases {
            let message = err.to_string();
            let status = status(err);
            assert_eq!(status.code(), code);
            assert_eq!(status.message(), message);
        }
    }

    #[test]
    fn malformed_request_is_invalid_argument() {
        let status = Status::from(Error::missing("user"));
        assert_eq!(status.code(), Code::InvalidArgument);
        assert!(status.message().contains("`user`"));
    }
}
