//! Error types for seat allocation and reservation bookkeeping.
//!
//! Every failure leaves allocator and ledger state exactly as it was before
//! the call. Transports map [`Error::kind`] onto their own status codes.

/// A result type defaulting to the crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors the allocator and the ledger can produce.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Caller input was missing or malformed. Detected before any state is
    /// touched.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// No reservation exists for the given email.
    #[error("ticket receipt not found for {email}")]
    NotFound { email: String },

    /// The section under the round-robin cursor has no free seat.
    #[error("no seats available in section {section}")]
    NoSeatsAvailable { section: String },

    /// The section name is not part of the configured inventory.
    #[error("section {section} not found")]
    SectionNotFound { section: String },

    /// The seat was expected to be occupied but is not.
    #[error("seat {seat} in section {section} is not assigned")]
    SeatNotAssigned { section: String, seat: u32 },

    /// The seat was expected to be free but is not.
    #[error("seat {seat} in section {section} is not available")]
    SeatUnavailable { section: String, seat: u32 },
}

/// The kind of an [`Error`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::InvalidArgument`].
    InvalidArgument,
    /// See [`Error::NotFound`].
    NotFound,
    /// See [`Error::NoSeatsAvailable`].
    NoSeatsAvailable,
    /// See [`Error::SectionNotFound`].
    SectionNotFound,
    /// See [`Error::SeatNotAssigned`].
    SeatNotAssigned,
    /// See [`Error::SeatUnavailable`].
    SeatUnavailable,
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Returns the kind of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NoSeatsAvailable { .. } => ErrorKind::NoSeatsAvailable,
            Self::SectionNotFound { .. } => ErrorKind::SectionNotFound,
            Self::SeatNotAssigned { .. } => ErrorKind::SeatNotAssigned,
            Self::SeatUnavailable { .. } => ErrorKind::SeatUnavailable,
        }
    }
}
