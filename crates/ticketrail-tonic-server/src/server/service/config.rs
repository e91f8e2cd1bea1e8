use crate::server::telemetry::LogFormat;
use anyhow::Context;
use clap::Parser;
use ticketrail_tonic_core::ticketrail::{LedgerConfig, RouteTable, parse_sections};

/// Runtime configuration for the `ticketrail-tonic-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a `.env`
/// file is loaded first). The defaults reproduce the reference deployment: two
/// 50-seat sections and a single London to France route.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ticketrail-tonic-server",
    version,
    about = "A gRPC service for booking train tickets"
)]
pub struct CliArgs {
    /// Seat sections as comma separated `name:capacity` pairs.
    ///
    /// The order given here is the round-robin order in which sections are
    /// filled.
    ///
    /// Environment variable: `SECTIONS`
    #[arg(long, env = "SECTIONS", default_value_t = String::from("A:50,B:50"))]
    pub sections: String,

    /// Serviceable routes and their fixed prices as comma separated
    /// `origin-destination=price` entries.
    ///
    /// Environment variable: `ROUTES`
    #[arg(long, env = "ROUTES", default_value_t = String::from("London-France=20.00"))]
    pub routes: String,

    /// Address to listen on (TCP or Unix socket path; use --uds for Unix socket).
    ///
    /// Example: "0.0.0.0:50051" or "/tmp/ticketrail.sock"
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:50051"))]
    pub server_addr: String,

    /// Listen on a Unix socket instead of TCP. If set, `SERVER_ADDR` must be a file path.
    #[arg(short, long, default_value_t = false)]
    pub uds: bool,

    /// Console log layout. Verbosity is controlled by `RUST_LOG`.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub ledger: LedgerConfig,
    pub server_addr: String,
    pub uds: bool,
    pub log_format: LogFormat,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let sections = parse_sections(&args.sections).context("invalid SECTIONS")?;
        let routes: RouteTable = args.routes.parse().context("invalid ROUTES")?;

        let ledger = LedgerConfig { sections, routes };
        ledger.validate().context("invalid booking configuration")?;

        Ok(Self {
            ledger,
            server_addr: args.server_addr,
            uds: args.uds,
            log_format: args.log_format,
        })
    }
}
