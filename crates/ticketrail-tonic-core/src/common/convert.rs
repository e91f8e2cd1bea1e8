//! Conversions between protobuf messages and `ticketrail` domain types.
//!
//! Outbound conversions are infallible `From` impls. Inbound requests carry
//! optional nested messages, so they are unpacked with `into_parts`, which
//! rejects an absent `user` or `new_seat` before the ledger is called. Field
//! contents (empty strings, seat number 0) are left for the ledger to
//! validate.

use crate::{
    Error, Result,
    proto::{
        ModifyUserSeatRequest, PurchaseTicketRequest, Seat, TicketReceipt, User, UserTicket,
        UsersBySectionResponse,
    },
};
use ticketrail::{Passenger, PassengerSeat, Reservation, SeatRef};

impl From<Passenger> for User {
    fn from(passenger: Passenger) -> Self {
        Self {
            email: passenger.email,
            first_name: passenger.first_name,
            last_name: passenger.last_name,
        }
    }
}

impl From<User> for Passenger {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

impl From<SeatRef> for Seat {
    fn from(seat: SeatRef) -> Self {
        Self {
            section: seat.section,
            seat_number: seat.number,
        }
    }
}

impl From<Seat> for SeatRef {
    fn from(seat: Seat) -> Self {
        Self {
            section: seat.section,
            number: seat.seat_number,
        }
    }
}

impl From<Reservation> for TicketReceipt {
    fn from(reservation: Reservation) -> Self {
        Self {
            user: Some(reservation.passenger.into()),
            from: reservation.origin,
            to: reservation.destination,
            price: reservation.price,
            seat: Some(reservation.seat.into()),
        }
    }
}

impl TryFrom<TicketReceipt> for Reservation {
    type Error = Error;

    fn try_from(receipt: TicketReceipt) -> Result<Self> {
        Ok(Self {
            passenger: required(receipt.user, "user")?.into(),
            origin: receipt.from,
            destination: receipt.to,
            price: receipt.price,
            seat: required(receipt.seat, "seat")?.into(),
        })
    }
}

impl From<PassengerSeat> for UserTicket {
    fn from(row: PassengerSeat) -> Self {
        Self {
            user: Some(row.passenger.into()),
            seat: Some(row.seat.into()),
        }
    }
}

impl FromIterator<PassengerSeat> for UsersBySectionResponse {
    fn from_iter<I: IntoIterator<Item = PassengerSeat>>(iter: I) -> Self {
        Self {
            users: iter.into_iter().map(UserTicket::from).collect(),
        }
    }
}

impl PurchaseTicketRequest {
    /// Splits the request into passenger, origin and destination.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRequest`] if `user` is absent.
    pub fn into_parts(self) -> Result<(Passenger, String, String)> {
        let passenger = required(self.user, "user")?.into();
        Ok((passenger, self.from, self.to))
    }
}

impl ModifyUserSeatRequest {
    /// Splits the request into the passenger email and the requested seat.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRequest`] if `new_seat` is absent.
    pub fn into_parts(self) -> Result<(String, SeatRef)> {
        let seat = required(self.new_seat, "new_seat")?.into();
        Ok((self.email, seat))
    }
}

fn required<T>(field: Option<T>, name: &str) -> Result<T> {
    field.ok_or_else(|| Error::missing(name))
}
