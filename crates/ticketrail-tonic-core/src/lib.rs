#![doc = include_str!("../README.md")]

mod common;
pub use common::*;
// Public re-export so downstream crates can access `ticketrail` via
// `ticketrail_tonic_core::ticketrail`
pub use ticketrail;

/// Message types and `TicketService` bindings generated from
/// `proto/ticketrail.proto`.
pub mod proto {
    tonic::include_proto!("ticketrail");

    /// Encoded descriptor set, registered with the gRPC reflection service.
    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("ticketrail_descriptor");
}
