//! The caller-owned discovery context.

use std::net::{Ipv4Addr, SocketAddr};

use socket2::Socket;

use crate::{
    logger,
    socket::{create_udp, join_multicast, MULTICAST_ADDRESS},
    DataSink, NetworkInterface, ScoutError, INTERFACE_LIST_SIZE,
};

/// All state of one discovery transport instance.
///
/// The context owns the single long-lived listening socket, the interface
/// table and the optional receive sink. It is designed for a single-threaded
/// event-driven host: the caller waits on readiness externally (e.g. by
/// multiplexing on [`Self::listener`]'s descriptor), then calls
/// [`Self::poll_once`], and triggers [`Self::send_msearch`] rounds at its
/// own cadence. Nothing in here blocks indefinitely or spawns tasks.
pub struct DiscoveryContext {
    /// The listening socket, once opened. At most one is live per context.
    pub(crate) listener: Option<Socket>,

    /// UDP port used for the listening socket and as the destination port
    /// for sends.
    pub(crate) port: u16,

    /// What a discovery request is searching for; sent as the `ST` header.
    pub(crate) search_target: String,

    /// The bounded interface table, rewritten in full on each refresh.
    pub(crate) interfaces: Vec<NetworkInterface>,

    /// Optional capability invoked with every successfully received payload.
    pub(crate) data_sink: Option<Box<dyn DataSink>>,
}

impl DiscoveryContext {
    /// Create a new context for the given port and search target.
    ///
    /// The port is fixed for the lifetime of the context; the listening
    /// socket is not opened until [`Self::open_listener`] is called.
    pub fn new(port: u16, search_target: impl Into<String>) -> Self {
        Self {
            listener: None,
            port,
            search_target: search_target.into(),
            interfaces: Vec::with_capacity(INTERFACE_LIST_SIZE),
            data_sink: None,
        }
    }

    /// Sets the sink that will receive every incoming payload.
    pub fn with_data_sink(mut self, sink: impl DataSink + 'static) -> Self {
        self.data_sink = Some(Box::new(sink));
        self
    }

    /// Register or replace the receive sink.
    pub fn set_data_sink(&mut self, sink: impl DataSink + 'static) {
        self.data_sink = Some(Box::new(sink));
    }

    /// Remove the receive sink; subsequent payloads are discarded with a
    /// warning.
    pub fn clear_data_sink(&mut self) {
        self.data_sink = None;
    }

    /// The UDP port this context listens on and sends to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The current search target.
    pub fn search_target(&self) -> &str {
        &self.search_target
    }

    /// Change the search target used by subsequent discovery requests.
    pub fn set_search_target(&mut self, search_target: impl Into<String>) {
        self.search_target = search_target.into();
    }

    /// The interface table as of the last refresh.
    pub fn interfaces(&self) -> &[NetworkInterface] {
        &self.interfaces
    }

    /// The listening socket, if one is currently open.
    ///
    /// Exposed so the caller can hand the raw descriptor to an external
    /// readiness mechanism and call [`Self::poll_once`] when it fires.
    pub fn listener(&self) -> Option<&Socket> {
        self.listener.as_ref()
    }

    /// (Re)create the shared listening socket.
    ///
    /// Any previously owned socket is closed first, so this is idempotent
    /// and safe to call repeatedly to reset the transport. The new socket is
    /// non-blocking, reuses its address, is bound to the wildcard address on
    /// the context's port, and is joined to [`MULTICAST_ADDRESS`] on the
    /// wildcard interface.
    ///
    /// If any step fails the partially configured socket is closed and the
    /// context is left without a listener; a half-configured socket is never
    /// kept live.
    pub fn open_listener(&mut self) -> Result<(), ScoutError> {
        if let Some(previous) = self.listener.take() {
            logger::debug!(
                "Closing previous listening socket before reopening on port {}.",
                self.port
            );
            drop(previous);
        }

        let addr = SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), self.port);
        let socket = create_udp(&addr)?;
        join_multicast(&socket, &MULTICAST_ADDRESS)?;

        logger::info!(
            "Listening for multicast group {MULTICAST_ADDRESS} on port {}.",
            self.port
        );
        self.listener = Some(socket);
        Ok(())
    }

    /// Close the listening socket, if one is open.
    pub fn close_listener(&mut self) {
        if self.listener.take().is_some() {
            logger::debug!("Closed listening socket on port {}.", self.port);
        }
    }
}

impl std::fmt::Debug for DiscoveryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryContext")
            .field("listener", &self.listener)
            .field("port", &self.port)
            .field("search_target", &self.search_target)
            .field("interfaces", &self.interfaces)
            .field("data_sink", &self.data_sink.as_ref().map(|_| "<sink>"))
            .finish()
    }
}

/// Do not run these tests in CI.
#[cfg(all(test, not(feature = "ci_tests")))]
mod tests {
    use super::*;
    use crate::_tests::LISTENER_TEST_PORT;
    use serial_test::serial;

    #[test]
    #[serial]
    fn open_listener_is_idempotent() {
        let mut context = DiscoveryContext::new(LISTENER_TEST_PORT, "ssdp:all");
        assert!(context.listener().is_none());

        context.open_listener().expect("Failed to open listener.");
        assert!(context.listener().is_some());

        // Reopening must close the previous socket and produce a fresh,
        // correctly joined one.
        context.open_listener().expect("Failed to reopen listener.");
        assert!(context.listener().is_some());

        // The reopened socket still receives: send a unicast datagram
        // straight at the listening port.
        let sender = std::net::UdpSocket::bind("127.0.0.1:0").expect("Failed to bind sender.");
        sender
            .send_to(b"ping", ("127.0.0.1", LISTENER_TEST_PORT))
            .expect("Failed to send datagram.");

        let outcome = crate::_tests::poll_until_data(&context);
        assert_eq!(outcome, crate::PollOutcome::Received(4));

        context.close_listener();
        assert!(context.listener().is_none());
    }
}
