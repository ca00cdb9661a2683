//! CLI configuration to parse CLI arguments.
//!
use clap::Parser;

/// Default SSDP port.
pub const DEFAULT_PORT: u16 = 1900;

/// Default search target.
pub const DEFAULT_SEARCH_TARGET: &str = "ssdp:all";

/// Default number of seconds between discovery rounds.
pub const DEFAULT_INTERVAL: u64 = 3;

#[derive(Parser, Debug, Clone)]
pub struct CliArgs {
    /// UDP port to listen on and send discovery requests to.
    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The `ST` value of the discovery requests.
    #[clap(short, long, default_value = DEFAULT_SEARCH_TARGET)]
    pub search_target: String,

    /// Seconds between discovery rounds.
    #[clap(long, default_value_t = DEFAULT_INTERVAL)]
    pub interval: u64,
}
