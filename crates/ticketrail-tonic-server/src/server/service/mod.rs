//! gRPC service implementation.
//!
//! Handlers decode protobuf requests, run one ledger operation, and encode
//! the result or map the failure onto a `tonic::Status`.
//!
//! ## Structure
//!
//! - [`config`] - CLI/environment configuration and its validation.
//! - [`handler`] - gRPC service entry point (`TicketHandler`).

pub mod config;
pub mod handler;
