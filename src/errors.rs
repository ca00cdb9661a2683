//! Error types.
//!

use thiserror::Error;

/// Every failure this crate reports to its caller.
///
/// Each variant corresponds to one failing stage, so a caller can tell a
/// socket that could not be created apart from one that could not be bound
/// or configured. Nothing in this crate retries on any of these; the caller
/// decides whether to abort or keep operating with a degraded interface set.
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Failed to create socket: {0}")]
    Socket(#[source] std::io::Error),
    #[error("Failed to bind socket: {0}")]
    Bind(#[source] std::io::Error),
    #[error("Failed to configure socket: {0}")]
    Config(#[source] std::io::Error),
    #[error("Failed to send datagram: {0}")]
    Send(#[source] std::io::Error),
    #[error("Failed to receive datagram: {0}")]
    Receive(#[source] std::io::Error),
    #[error("Failed to enumerate network interfaces: {0}")]
    Query(#[from] local_ip_address::Error),
}
