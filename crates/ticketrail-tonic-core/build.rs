/// Builds the gRPC client and server code for `proto/ticketrail.proto`.
///
/// Besides the message types and the `TicketService` client/server bindings,
/// a serialized file descriptor set is written next to them so the server can
/// expose gRPC reflection:
///
/// ```rust
/// pub mod proto {
///     tonic::include_proto!("ticketrail");
///     pub const FILE_DESCRIPTOR_SET: &[u8] =
///         tonic::include_file_descriptor_set!("ticketrail_descriptor");
/// }
/// ```
///
/// # Panics
///
/// Panics if code generation fails.
use std::env;
use std::path::PathBuf;
fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let descriptor_path = out_dir.join("ticketrail_descriptor.bin");

    println!("cargo:rerun-if-changed=proto/ticketrail.proto");

    let mut config = tonic_prost_build::Config::new();
    config.file_descriptor_set_path(&descriptor_path);

    tonic_prost_build::configure()
        .compile_with_config(config, &["proto/ticketrail.proto"], &["proto"])
        .unwrap();
}
