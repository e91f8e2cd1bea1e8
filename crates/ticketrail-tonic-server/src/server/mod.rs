//! Server-side components of the `ticketrail` gRPC ticketing service.
//!
//! ## Submodules
//!
//! - [`service`] - The `TicketService` gRPC implementation and its
//!   CLI/environment configuration.
//! - [`telemetry`] - Structured logging and optional OpenTelemetry export.
//!
//! These components are wired together in the server's `main.rs`.

pub mod service;
pub mod telemetry;
