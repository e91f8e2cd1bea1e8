//! Shared transport types used by both the server and clients.
//!
//! - [`error`] - Transport error type and its mapping onto `tonic::Status`.
//! - [`convert`] - Conversions between protobuf messages and domain types.

pub mod convert;
pub mod error;

pub use error::{Error, Result};
