use crate::{
    allocator::SeatAllocator,
    config::{ConfigError, LedgerConfig, RouteTable},
    error::{Error, Result},
    types::{Passenger, PassengerSeat, Reservation, SeatRef},
};
use parking_lot::Mutex;
use std::collections::HashMap;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Confirmation returned by [`ReservationLedger::remove_user`].
pub const CANCELLATION_MESSAGE: &str = "Ticket cancelled successfully";

/// The book of active reservations, keyed by passenger email.
///
/// The ledger owns a [`SeatAllocator`] and is the only path through which
/// seats are assigned, moved or released, so the two never disagree about
/// which seats are occupied. Every operation runs under one ledger-wide lock;
/// mutating operations keep it held across the nested allocator call, which
/// makes each purchase, move or cancellation a single atomic step. The lock
/// order is always ledger, then allocator.
///
/// Inputs are validated before any state is touched and a failed call leaves
/// both the ledger and the allocator unchanged.
#[derive(Debug)]
pub struct ReservationLedger {
    allocator: SeatAllocator,
    routes: RouteTable,
    receipts: Mutex<HashMap<String, Reservation>>,
}

impl ReservationLedger {
    /// Builds an empty ledger over a fresh seat inventory.
    ///
    /// # Errors
    /// Fails if the section list or the route table is unusable.
    pub fn new(config: LedgerConfig) -> core::result::Result<Self, ConfigError> {
        config.validate()?;
        let allocator = SeatAllocator::new(&config.sections)?;
        Ok(Self {
            allocator,
            routes: config.routes,
            receipts: Mutex::new(HashMap::new()),
        })
    }

    /// Buys a ticket on a serviceable route and assigns a seat.
    ///
    /// A previous reservation under the same email is replaced without
    /// warning. Its seat is **not** released and stays assigned with no
    /// reservation pointing at it; callers that want the seat back must
    /// cancel first.
    ///
    /// # Errors
    /// - [`Error::InvalidArgument`] if the email, the origin or the
    ///   destination is empty, or the route has no price. Names may be empty.
    /// - [`Error::NoSeatsAvailable`] if the allocator's target section is
    ///   full.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, passenger), fields(email = %passenger.email))
    )]
    pub fn purchase_ticket(
        &self,
        passenger: Passenger,
        origin: &str,
        destination: &str,
    ) -> Result<Reservation> {
        let mut receipts = self.receipts.lock();

        if passenger.email.is_empty() || origin.is_empty() || destination.is_empty() {
            return Err(Error::invalid("missing required fields"));
        }

        let price = self.routes.price(origin, destination).ok_or_else(|| {
            Error::invalid(format!(
                "route {} is not serviced",
                RouteTable::route_key(origin, destination)
            ))
        })?;

        let seat = self.allocator.assign_seat()?;

        let reservation = Reservation {
            passenger,
            origin: origin.to_string(),
            destination: destination.to_string(),
            price,
            seat,
        };

        if let Some(_previous) = receipts.insert(
            reservation.passenger.email.clone(),
            reservation.clone(),
        ) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                previous_seat = %_previous.seat,
                "reservation replaced, previous seat left assigned"
            );
        }

        Ok(reservation)
    }

    /// Returns the active reservation for an email.
    ///
    /// # Errors
    /// - [`Error::InvalidArgument`] if the email is empty.
    /// - [`Error::NotFound`] if there is no reservation.
    pub fn get_receipt(&self, email: &str) -> Result<Reservation> {
        if email.is_empty() {
            return Err(Error::invalid("missing required fields"));
        }
        self.receipts
            .lock()
            .get(email)
            .cloned()
            .ok_or_else(|| not_found(email))
    }

    /// Lists every passenger seated in a section. Order is unspecified and an
    /// unknown section simply has no passengers.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the section is empty.
    pub fn get_users_by_section(&self, section: &str) -> Result<Vec<PassengerSeat>> {
        if section.is_empty() {
            return Err(Error::invalid("missing required fields"));
        }
        Ok(self
            .receipts
            .lock()
            .values()
            .filter(|reservation| reservation.seat.section == section)
            .map(|reservation| PassengerSeat {
                passenger: reservation.passenger.clone(),
                seat: reservation.seat.clone(),
            })
            .collect())
    }

    /// Moves a passenger to another seat and returns the updated reservation.
    ///
    /// # Errors
    /// - [`Error::InvalidArgument`] if the email or the new section is empty,
    ///   or the new seat number is 0.
    /// - [`Error::NotFound`] if there is no reservation.
    /// - Any allocator failure ([`Error::SectionNotFound`],
    ///   [`Error::SeatNotAssigned`], [`Error::SeatUnavailable`]) unchanged.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn modify_user_seat(&self, email: &str, new_seat: &SeatRef) -> Result<Reservation> {
        let mut receipts = self.receipts.lock();

        if email.is_empty() || new_seat.section.is_empty() || new_seat.number == 0 {
            return Err(Error::invalid("missing required fields"));
        }

        let reservation = receipts.get_mut(email).ok_or_else(|| not_found(email))?;

        self.allocator.modify_seat(
            reservation.seat.number,
            &reservation.seat.section,
            new_seat.number,
            &new_seat.section,
        )?;
        reservation.seat = new_seat.clone();

        Ok(reservation.clone())
    }

    /// Cancels a ticket, freeing its seat.
    ///
    /// # Errors
    /// - [`Error::InvalidArgument`] if the email is empty.
    /// - [`Error::NotFound`] if there is no reservation.
    /// - Any allocator failure releasing the seat. The reservation is kept in
    ///   that case.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn remove_user(&self, email: &str) -> Result<&'static str> {
        let mut receipts = self.receipts.lock();

        if email.is_empty() {
            return Err(Error::invalid("missing required fields"));
        }

        let seat = &receipts.get(email).ok_or_else(|| not_found(email))?.seat;
        self.allocator.release_seat(seat.number, &seat.section)?;
        receipts.remove(email);

        Ok(CANCELLATION_MESSAGE)
    }

    /// Number of active reservations.
    pub fn len(&self) -> usize {
        self.receipts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.lock().is_empty()
    }

    /// The underlying seat inventory, for read-only inspection.
    pub fn allocator(&self) -> &SeatAllocator {
        &self.allocator
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Every active reservation, in no particular order.
    pub fn reservations(&self) -> Vec<Reservation> {
        self.receipts.lock().values().cloned().collect()
    }
}

fn not_found(email: &str) -> Error {
    Error::NotFound {
        email: email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, SectionConfig, SeatState};

    fn ledger(sections: &[(&str, u32)]) -> ReservationLedger {
        ReservationLedger::new(LedgerConfig {
            sections: sections
                .iter()
                .map(|(name, capacity)| SectionConfig::new(*name, *capacity))
                .collect(),
            routes: RouteTable::new().with_route("London", "France", 20.00),
        })
        .unwrap()
    }

    fn passenger(email: &str) -> Passenger {
        Passenger::new(email, "Nandha", "Kumar")
    }

    #[test]
    fn purchase_prices_from_route_table() {
        let ledger = ReservationLedger::new(LedgerConfig {
            sections: vec![SectionConfig::new("A", 2)],
            routes: RouteTable::new()
                .with_route("London", "France", 20.00)
                .with_route("London", "Paris", 42.5),
        })
        .unwrap();

        let receipt = ledger
            .purchase_ticket(passenger("x@y.com"), "London", "Paris")
            .unwrap();
        assert_eq!(receipt.price, 42.5);
        assert_eq!(ledger.routes().len(), 2);
        assert_eq!(ledger.routes().price("London", "France"), Some(20.00));
        assert_eq!(receipt.origin, "London");
        assert_eq!(receipt.destination, "Paris");
        assert_eq!(ledger.get_receipt("x@y.com").unwrap(), receipt);
    }

    #[test]
    fn purchase_validates_before_touching_seats() {
        let ledger = ledger(&[("A", 1), ("B", 1)]);
        let cases = [
            (Passenger::new("", "Nandha", "Kumar"), "London", "France"),
            (passenger("x@y.com"), "", "France"),
            (passenger("x@y.com"), "London", ""),
            (passenger("x@y.com"), "Chennai", "Coimbatore"),
            (passenger("x@y.com"), "France", "London"),
        ];
        for (passenger, origin, destination) in cases {
            let err = ledger
                .purchase_ticket(passenger, origin, destination)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
        assert!(ledger.is_empty());
        assert!(ledger.allocator().assigned_seats().is_empty());
        assert_eq!(ledger.allocator().next_section(), "A");
    }

    #[test]
    fn purchase_accepts_email_only_passenger() {
        let ledger = ReservationLedger::new(LedgerConfig::default()).unwrap();
        let receipt = ledger
            .purchase_ticket(Passenger::new("x@y.com", "", ""), "London", "France")
            .unwrap();
        assert_eq!(receipt.seat, SeatRef::new("A", 1));
        assert!(receipt.passenger.first_name.is_empty());
        assert!(receipt.passenger.last_name.is_empty());
        assert_eq!(ledger.get_receipt("x@y.com").unwrap(), receipt);
    }

    // Documented quirk: the third purchase fails although no section was
    // skipped, because the cursor is back on the full section `A`.
    #[test]
    fn single_seat_sections_scenario() {
        let ledger = ledger(&[("A", 1), ("B", 1)]);

        let first = ledger
            .purchase_ticket(passenger("x@y.com"), "London", "France")
            .unwrap();
        assert_eq!(first.seat, SeatRef::new("A", 1));
        assert_eq!(first.price, 20.00);

        let second = ledger
            .purchase_ticket(passenger("z@y.com"), "London", "France")
            .unwrap();
        assert_eq!(second.seat, SeatRef::new("B", 1));

        let err = ledger
            .purchase_ticket(passenger("w@y.com"), "London", "France")
            .unwrap_err();
        assert_eq!(err, Error::NoSeatsAvailable { section: "A".into() });
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn repurchase_overwrites_and_leaks_the_old_seat() {
        let ledger = ledger(&[("A", 5), ("B", 5)]);
        let first = ledger
            .purchase_ticket(passenger("x@y.com"), "London", "France")
            .unwrap();
        let second = ledger
            .purchase_ticket(Passenger::new("x@y.com", "Other", "Name"), "London", "France")
            .unwrap();

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get_receipt("x@y.com").unwrap(), second);
        assert_ne!(first.seat, second.seat);
        // Nobody holds the first seat any more, but it is still taken.
        assert_eq!(
            ledger.allocator().seat_state(&first.seat),
            Some(SeatState::Assigned)
        );
        assert_eq!(ledger.allocator().assigned_seats().len(), 2);
    }

    #[test]
    fn get_receipt_errors() {
        let ledger = ledger(&[("A", 1)]);
        assert_eq!(
            ledger.get_receipt("").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            ledger.get_receipt("nobody@y.com").unwrap_err(),
            Error::NotFound {
                email: "nobody@y.com".into()
            }
        );
    }

    #[test]
    fn lists_users_per_section() {
        let ledger = ledger(&[("A", 5), ("B", 5)]);
        for email in ["a@y.com", "b@y.com", "c@y.com"] {
            ledger
                .purchase_ticket(passenger(email), "London", "France")
                .unwrap();
        }

        let mut in_a: Vec<_> = ledger
            .get_users_by_section("A")
            .unwrap()
            .into_iter()
            .map(|row| (row.passenger.email, row.seat))
            .collect();
        in_a.sort_by(|x, y| x.0.cmp(&y.0));
        assert_eq!(
            in_a,
            vec![
                ("a@y.com".to_string(), SeatRef::new("A", 1)),
                ("c@y.com".to_string(), SeatRef::new("A", 2)),
            ]
        );
        assert_eq!(ledger.get_users_by_section("B").unwrap().len(), 1);
        assert!(ledger.get_users_by_section("Z").unwrap().is_empty());
        assert_eq!(
            ledger.get_users_by_section("").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn modify_updates_reservation_and_inventory() {
        let ledger = ledger(&[("A", 5), ("B", 5)]);
        let receipt = ledger
            .purchase_ticket(passenger("x@y.com"), "London", "France")
            .unwrap();

        let updated = ledger
            .modify_user_seat("x@y.com", &SeatRef::new("B", 4))
            .unwrap();
        assert_eq!(updated.seat, SeatRef::new("B", 4));
        assert_eq!(updated.price, receipt.price);
        assert_eq!(ledger.get_receipt("x@y.com").unwrap(), updated);
        assert_eq!(
            ledger.allocator().seat_state(&receipt.seat),
            Some(SeatState::Available)
        );
        assert_eq!(ledger.allocator().assigned_seats(), vec![SeatRef::new("B", 4)]);
    }

    #[test]
    fn modify_failures_leave_reservation_alone() {
        let ledger = ledger(&[("A", 5), ("B", 5)]);
        let mine = ledger
            .purchase_ticket(passenger("x@y.com"), "London", "France")
            .unwrap();
        let theirs = ledger
            .purchase_ticket(passenger("z@y.com"), "London", "France")
            .unwrap();

        let cases = [
            ("", SeatRef::new("B", 2), ErrorKind::InvalidArgument),
            ("x@y.com", SeatRef::new("", 2), ErrorKind::InvalidArgument),
            ("x@y.com", SeatRef::new("B", 0), ErrorKind::InvalidArgument),
            ("nobody@y.com", SeatRef::new("B", 2), ErrorKind::NotFound),
            ("x@y.com", SeatRef::new("Z", 2), ErrorKind::SectionNotFound),
            ("x@y.com", theirs.seat.clone(), ErrorKind::SeatUnavailable),
            ("x@y.com", SeatRef::new("B", 6), ErrorKind::SeatUnavailable),
        ];
        for (email, seat, kind) in cases {
            let err = ledger.modify_user_seat(email, &seat).unwrap_err();
            assert_eq!(err.kind(), kind, "{email} -> {seat}");
        }

        assert_eq!(ledger.get_receipt("x@y.com").unwrap(), mine);
        assert_eq!(ledger.allocator().assigned_seats(), vec![mine.seat, theirs.seat]);
    }

    #[test]
    fn remove_frees_the_seat() {
        let ledger = ledger(&[("A", 1)]);
        let receipt = ledger
            .purchase_ticket(passenger("x@y.com"), "London", "France")
            .unwrap();

        assert_eq!(ledger.remove_user("x@y.com").unwrap(), CANCELLATION_MESSAGE);
        assert!(ledger.is_empty());
        assert_eq!(
            ledger.allocator().seat_state(&receipt.seat),
            Some(SeatState::Available)
        );

        // The freed seat goes to the next buyer.
        let next = ledger
            .purchase_ticket(passenger("z@y.com"), "London", "France")
            .unwrap();
        assert_eq!(next.seat, receipt.seat);
    }

    #[test]
    fn remove_unknown_user_is_not_found() {
        let ledger = ledger(&[("A", 1)]);
        assert_eq!(
            ledger.remove_user("nobody@y.com").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ledger.remove_user("").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }
}
