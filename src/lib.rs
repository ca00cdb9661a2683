//! Transport layer of a simple SSDP-style service-discovery protocol over
//! IPv4 UDP multicast.
//!
//! The crate enumerates local network interfaces, maintains a
//! multicast-joined listening socket, constructs discovery requests, and
//! fans them out as unicast-sourced multicast datagrams on every usable
//! interface. Everything hangs off a caller-owned [`DiscoveryContext`];
//! received payloads are delivered as raw bytes to a registered
//! [`DataSink`], and parsing them is the caller's concern.

pub mod config;
pub use config::CliArgs;

mod context;
pub use context::DiscoveryContext;

mod discovery;
pub use discovery::{build_msearch, MESSAGE_MAX_LEN};

mod errors;
pub use errors::ScoutError;

#[cfg(feature = "example")]
pub mod example;

mod interface;
pub use interface::{NetworkInterface, INTERFACE_LIST_SIZE, INTERFACE_NAME_LEN};

mod receive;
pub use receive::{DataSink, PollOutcome, PACKET_SIZE};

pub mod socket;
pub use socket::MULTICAST_ADDRESS;

mod transmit;
pub use transmit::send_via_interface;


/// Re-export the [`logger`] module.
pub use logger;
