//! gRPC service implementation for train ticket booking.
//!
//! This module defines [`TicketHandler`], the concrete implementation of the
//! [`TicketService`] gRPC service defined in the protobuf specification. Each
//! RPC maps onto exactly one [`ReservationLedger`] operation.
//!
//! ## Responsibilities
//!
//! - Unpack protobuf requests into domain values, rejecting absent nested
//!   messages.
//! - Run the ledger operation. Ledger calls are short, lock-guarded and never
//!   await, so they run inline on the request task.
//! - Convert receipts into protobuf responses and failures into
//!   [`Status`] codes.
//! - Emit logs and booking metrics.

use crate::server::telemetry::{
    adjust_seats_assigned, increment_errors, increment_requests, increment_seats_modified,
    increment_tickets_cancelled, increment_tickets_purchased, record_request_duration,
};
use std::sync::Arc;
use std::time::Instant;
use ticketrail_tonic_core::{
    Error,
    proto::{
        GetReceiptRequest, GetUsersBySectionRequest, ModifyUserSeatRequest,
        PurchaseTicketRequest, RemoveUserRequest, RemoveUserResponse, TicketReceipt,
        UsersBySectionResponse, ticket_service_server::TicketService,
    },
    ticketrail::{ConfigError, LedgerConfig, ReservationLedger},
};
use tonic::{Request, Response, Status};

const PURCHASE_TICKET: &str = "PurchaseTicket";
const GET_RECEIPT: &str = "GetReceipt";
const GET_USERS_BY_SECTION: &str = "GetUsersBySection";
const MODIFY_USER_SEAT: &str = "ModifyUserSeat";
const REMOVE_USER: &str = "RemoveUser";

/// gRPC front end over a single, shared [`ReservationLedger`].
///
/// Cloning is cheap: clones share the same ledger, so every connection sees
/// one authoritative seat inventory.
#[derive(Clone)]
pub struct TicketHandler {
    ledger: Arc<ReservationLedger>,
}

impl TicketHandler {
    /// Creates a handler over a fresh ledger built from `config`.
    pub fn new(config: LedgerConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_ledger(Arc::new(ReservationLedger::new(config)?)))
    }

    /// Creates a handler over an existing ledger.
    pub fn with_ledger(ledger: Arc<ReservationLedger>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &ReservationLedger {
        &self.ledger
    }
}

/// Finishes a request: records duration and failures, then converts the
/// outcome into a gRPC response.
fn respond<T>(
    method: &'static str,
    start: Instant,
    result: Result<T, Error>,
) -> Result<Response<T>, Status> {
    record_request_duration(method, start.elapsed().as_secs_f64() * 1000.0);
    match result {
        Ok(message) => Ok(Response::new(message)),
        Err(err) => {
            let code = err.code();
            increment_errors(method, code);
            tracing::warn!(method, ?code, "{err}");
            Err(err.into())
        }
    }
}

#[tonic::async_trait]
impl TicketService for TicketHandler {
    #[tracing::instrument(skip_all, fields(method = PURCHASE_TICKET))]
    async fn purchase_ticket(
        &self,
        req: Request<PurchaseTicketRequest>,
    ) -> Result<Response<TicketReceipt>, Status> {
        let start = Instant::now();
        increment_requests(PURCHASE_TICKET);

        let result = req
            .into_inner()
            .into_parts()
            .and_then(|(passenger, from, to)| {
                Ok(self.ledger.purchase_ticket(passenger, &from, &to)?)
            })
            .inspect(|receipt| {
                increment_tickets_purchased();
                adjust_seats_assigned(1);
                tracing::info!(
                    email = %receipt.passenger.email,
                    seat = %receipt.seat,
                    price = receipt.price,
                    "ticket purchased"
                );
            })
            .map(TicketReceipt::from);

        respond(PURCHASE_TICKET, start, result)
    }

    #[tracing::instrument(skip_all, fields(method = GET_RECEIPT))]
    async fn get_receipt(
        &self,
        req: Request<GetReceiptRequest>,
    ) -> Result<Response<TicketReceipt>, Status> {
        let start = Instant::now();
        increment_requests(GET_RECEIPT);

        let result = self
            .ledger
            .get_receipt(&req.get_ref().email)
            .map(TicketReceipt::from)
            .map_err(Error::from);

        respond(GET_RECEIPT, start, result)
    }

    #[tracing::instrument(skip_all, fields(method = GET_USERS_BY_SECTION))]
    async fn get_users_by_section(
        &self,
        req: Request<GetUsersBySectionRequest>,
    ) -> Result<Response<UsersBySectionResponse>, Status> {
        let start = Instant::now();
        increment_requests(GET_USERS_BY_SECTION);

        let result = self
            .ledger
            .get_users_by_section(&req.get_ref().section)
            .map(UsersBySectionResponse::from_iter)
            .map_err(Error::from);

        respond(GET_USERS_BY_SECTION, start, result)
    }

    #[tracing::instrument(skip_all, fields(method = MODIFY_USER_SEAT))]
    async fn modify_user_seat(
        &self,
        req: Request<ModifyUserSeatRequest>,
    ) -> Result<Response<TicketReceipt>, Status> {
        let start = Instant::now();
        increment_requests(MODIFY_USER_SEAT);

        let result = req
            .into_inner()
            .into_parts()
            .and_then(|(email, seat)| Ok(self.ledger.modify_user_seat(&email, &seat)?))
            .inspect(|receipt| {
                increment_seats_modified();
                tracing::info!(
                    email = %receipt.passenger.email,
                    seat = %receipt.seat,
                    "seat modified"
                );
            })
            .map(TicketReceipt::from);

        respond(MODIFY_USER_SEAT, start, result)
    }

    #[tracing::instrument(skip_all, fields(method = REMOVE_USER))]
    async fn remove_user(
        &self,
        req: Request<RemoveUserRequest>,
    ) -> Result<Response<RemoveUserResponse>, Status> {
        let start = Instant::now();
        increment_requests(REMOVE_USER);

        let email = &req.get_ref().email;
        let result = self
            .ledger
            .remove_user(email)
            .map(|message| {
                increment_tickets_cancelled();
                adjust_seats_assigned(-1);
                tracing::info!(email = %email, "ticket cancelled");
                RemoveUserResponse {
                    message: message.to_string(),
                }
            })
            .map_err(Error::from);

        respond(REMOVE_USER, start, result)
    }
}
