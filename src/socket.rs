//! Unified interface for the creation of sockets.

use std::net::{Ipv4Addr, SocketAddr};

use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::ScoutError;

/// The multicast group every discovery request is sent to and every listener
/// joins.
pub const MULTICAST_ADDRESS: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);

/// A helper function to describe a [`SockAddr`].
///
/// This is distinct from [`describe_socket_addr`] which is the [`std::net`]
/// equivalent.
pub fn describe_sock_addr(sock_addr: &SockAddr) -> String {
    sock_addr
        .as_socket()
        .map(|sock_addr| describe_socket_addr(&sock_addr))
        .unwrap_or_else(|| "(Unknown source)".to_owned())
}

/// A helper function to describe a [`SocketAddr`].
///
/// This is distinct from [`describe_sock_addr`] which is the [`socket2`]
/// equivalent.
pub fn describe_socket_addr(socket_addr: &SocketAddr) -> String {
    format!(
        "{ip}:{port}",
        ip = socket_addr.ip(),
        port = socket_addr.port()
    )
}

/// Create a generic UDP socket suitable for receiving multicast traffic.
///
/// The resultant socket will be:
/// - non-blocking,
/// - allow the reuse of the address, and
/// - bound to the given address.
pub fn create_udp(addr: &SocketAddr) -> Result<Socket, ScoutError> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(ScoutError::Socket)?;

    socket.set_nonblocking(true).map_err(ScoutError::Socket)?;
    socket.set_reuse_address(true).map_err(ScoutError::Socket)?;
    socket
        .bind(&SockAddr::from(*addr))
        .map_err(ScoutError::Bind)?;

    Ok(socket)
}

/// Join the socket to a multicast group on the wildcard local interface.
pub fn join_multicast(socket: &Socket, group: &Ipv4Addr) -> Result<(), ScoutError> {
    if !group.is_multicast() {
        return Err(ScoutError::InvalidArgument(format!(
            "Address {group} is not a multicast address"
        )));
    }

    socket
        .join_multicast_v4(group, &Ipv4Addr::UNSPECIFIED)
        .map_err(ScoutError::Config)
}

/// Create a short-lived UDP socket for sending multicast traffic out of one
/// specific interface.
///
/// Binding to the interface's own address (with an ephemeral port) controls
/// which adapter the multicast packet egresses from; multicast loopback is
/// disabled so the sender does not receive its own transmission back.
pub fn create_interface_sender(addr: Ipv4Addr) -> Result<Socket, ScoutError> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(ScoutError::Socket)?;

    socket
        .bind(&SockAddr::from(SocketAddr::new(addr.into(), 0)))
        .map_err(ScoutError::Bind)?;
    socket
        .set_multicast_loop_v4(false)
        .map_err(ScoutError::Config)?;

    Ok(socket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multicast_address_is_multicast() {
        assert!(MULTICAST_ADDRESS.is_multicast());
    }

    #[test]
    fn join_rejects_unicast_group() {
        let socket = create_udp(&SocketAddr::from(([0, 0, 0, 0], 0)))
            .expect("Failed to create socket.");

        let result = join_multicast(&socket, &Ipv4Addr::new(192, 168, 1, 1));
        assert!(matches!(result, Err(ScoutError::InvalidArgument(_))));
    }

    #[test]
    fn describe_addresses() {
        let addr = SocketAddr::from(([127, 0, 0, 1], 1900));
        assert_eq!(describe_socket_addr(&addr), "127.0.0.1:1900");
        assert_eq!(describe_sock_addr(&SockAddr::from(addr)), "127.0.0.1:1900");
    }
}
