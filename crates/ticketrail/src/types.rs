//! Plain data carried between the ledger, the allocator and their callers.

use core::fmt;

/// Occupancy of a single seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeatState {
    Available,
    Assigned,
}

/// The identity of a ticket holder. The email is the sole identity key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Passenger {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl Passenger {
    /// Creates a passenger from its email and names.
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// A seat, addressed by section name and seat number (1-based).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeatRef {
    pub section: String,
    pub number: u32,
}

impl SeatRef {
    /// Creates a reference to seat `number` in `section`.
    pub fn new(section: impl Into<String>, number: u32) -> Self {
        Self {
            section: section.into(),
            number,
        }
    }
}

impl fmt::Display for SeatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.section, self.number)
    }
}

/// A passenger's active ticket, also returned to callers as the receipt.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reservation {
    pub passenger: Passenger,
    pub origin: String,
    pub destination: String,
    pub price: f64,
    pub seat: SeatRef,
}

/// One row of a per-section passenger listing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassengerSeat {
    pub passenger: Passenger,
    pub seat: SeatRef,
}
