//! Per-interface transmission of discovery payloads.

use std::net::SocketAddr;

use socket2::SockAddr;

use crate::{
    logger,
    socket::{create_interface_sender, describe_socket_addr, MULTICAST_ADDRESS},
    NetworkInterface, ScoutError,
};

/// Send one payload to the multicast group, sourced from a specific
/// interface.
///
/// A fresh short-lived socket is created for the send, independent from the
/// shared listening socket: binding it to the interface's own address is
/// what selects the egress adapter, which the wildcard-bound listener cannot
/// do per send. The socket is closed on every exit path.
///
/// Failures are independent per interface; a caller fanning a payload out
/// across several interfaces must not let one failure abort the rest.
pub fn send_via_interface(
    interface: &NetworkInterface,
    payload: &[u8],
    port: u16,
) -> Result<usize, ScoutError> {
    if payload.is_empty() {
        return Err(ScoutError::InvalidArgument(
            "Payload must not be empty".to_owned(),
        ));
    }

    if interface.name().is_empty() {
        return Err(ScoutError::InvalidArgument(
            "Interface name must not be empty".to_owned(),
        ));
    }

    let socket = create_interface_sender(interface.address())?;

    let destination = SocketAddr::new(MULTICAST_ADDRESS.into(), port);
    let sent = socket
        .send_to(payload, &SockAddr::from(destination))
        .map_err(ScoutError::Send)?;

    logger::debug!(
        "Sent {sent} bytes from {name} ({address}) to {destination}.",
        name = interface.name(),
        address = interface.address(),
        destination = describe_socket_addr(&destination),
    );
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn empty_payload_is_rejected() {
        let interface = NetworkInterface::new("eth0", Ipv4Addr::new(192, 168, 1, 2));

        let result = send_via_interface(&interface, b"", 1900);
        assert!(matches!(result, Err(ScoutError::InvalidArgument(_))));
    }

    #[test]
    fn empty_interface_name_is_rejected() {
        let interface = NetworkInterface::new("", Ipv4Addr::new(192, 168, 1, 2));

        let result = send_via_interface(&interface, b"payload", 1900);
        assert!(matches!(result, Err(ScoutError::InvalidArgument(_))));
    }
}
