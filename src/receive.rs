//! Non-blocking receive path of the listening socket.

use std::io;

use crate::{logger, socket::describe_sock_addr, DiscoveryContext, ScoutError};

/// The maximum size of a received payload, in bytes.
///
/// Any datagram larger than this is truncated by the OS on receipt.
pub const PACKET_SIZE: usize = 2048;

/// Result of a single [`DiscoveryContext::poll_once`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// No datagram was pending; not an error.
    NoData,
    /// One datagram of this many bytes was received.
    ///
    /// Receipt and delivery are distinct: the payload was handed to the
    /// registered sink if one was set, and discarded with a warning
    /// otherwise.
    Received(usize),
}

/// A receive delivery sink.
///
/// Invoked synchronously from inside [`DiscoveryContext::poll_once`] with
/// the raw payload bytes; structured interpretation of the payload is
/// entirely the implementor's concern, no protocol parsing happens before
/// the call. Implementations must not block, or they stall the caller's
/// poll cycle.
pub trait DataSink {
    /// Handle one received payload.
    fn on_data(&self, context: &DiscoveryContext, data: &[u8]);
}

impl<F> DataSink for F
where
    F: Fn(&DiscoveryContext, &[u8]),
{
    fn on_data(&self, context: &DiscoveryContext, data: &[u8]) {
        self(context, data)
    }
}

impl DiscoveryContext {
    /// Perform a single non-blocking receive attempt on the listening
    /// socket.
    ///
    /// Returns [`PollOutcome::NoData`] when nothing is pending; callers
    /// are expected to invoke this only when an external readiness
    /// mechanism reports the socket readable, or to tolerate the no-op.
    /// On success the registered [`DataSink`] is invoked with the exact
    /// received bytes; without a sink the payload is discarded with a
    /// warning.
    pub fn poll_once(&self) -> Result<PollOutcome, ScoutError> {
        let listener = self.listener.as_ref().ok_or_else(|| {
            ScoutError::InvalidArgument("The listening socket has not been opened".to_owned())
        })?;

        let mut buffer = [core::mem::MaybeUninit::<u8>::uninit(); PACKET_SIZE];
        let (size, sender) = match listener.recv_from(&mut buffer) {
            Ok(received) => received,
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                return Ok(PollOutcome::NoData);
            }
            Err(err) => return Err(ScoutError::Receive(err)),
        };

        // Only take the initialized part of the buffer.
        let data = (0..size)
            .map(|i| unsafe { buffer[i].assume_init() })
            .collect::<Vec<_>>();

        logger::debug!(
            "Received {size} bytes from {sender}.",
            sender = describe_sock_addr(&sender)
        );

        match self.data_sink.as_ref() {
            Some(sink) => sink.on_data(self, &data),
            None => {
                logger::warn!("No data sink has been registered; discarding {size} bytes.");
            }
        }

        Ok(PollOutcome::Received(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::_tests::test_context;

    #[test]
    fn poll_without_listener_is_invalid() {
        let context = test_context();

        let result = context.poll_once();
        assert!(matches!(result, Err(ScoutError::InvalidArgument(_))));
    }
}

/// Do not run these tests in CI.
#[cfg(all(test, not(feature = "ci_tests")))]
mod socket_tests {
    use super::*;
    use crate::_tests::{poll_until_data, RECEIVE_TEST_PORT};
    use serial_test::serial;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn send_unicast(payload: &[u8], port: u16) {
        let sender = std::net::UdpSocket::bind("127.0.0.1:0").expect("Failed to bind sender.");
        sender
            .send_to(payload, ("127.0.0.1", port))
            .expect("Failed to send datagram.");
    }

    #[test]
    #[serial]
    fn poll_with_nothing_pending_is_no_data() {
        let mut context = DiscoveryContext::new(RECEIVE_TEST_PORT, "ssdp:all");
        context.open_listener().expect("Failed to open listener.");

        let outcome = context.poll_once().expect("Poll should not fail.");
        assert_eq!(outcome, PollOutcome::NoData);
    }

    #[test]
    #[serial]
    fn payload_round_trips_byte_exact() {
        let received = Rc::new(RefCell::new(Vec::<Vec<u8>>::new()));
        let captured = Rc::clone(&received);

        let mut context = DiscoveryContext::new(RECEIVE_TEST_PORT, "ssdp:all")
            .with_data_sink(move |_: &DiscoveryContext, data: &[u8]| {
                captured.borrow_mut().push(data.to_vec());
            });
        context.open_listener().expect("Failed to open listener.");

        let payload = b"HTTP/1.1 200 OK\r\nST:urn:test:service:1\r\n\r\n";
        send_unicast(payload, RECEIVE_TEST_PORT);

        let outcome = poll_until_data(&context);
        assert_eq!(outcome, PollOutcome::Received(payload.len()));

        // The sink was invoked exactly once, with the sent bytes verbatim.
        let received = received.borrow();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0], payload);
    }

    #[test]
    #[serial]
    fn payload_without_sink_is_discarded() {
        let mut context = DiscoveryContext::new(RECEIVE_TEST_PORT, "ssdp:all");
        context.open_listener().expect("Failed to open listener.");

        send_unicast(b"discard me", RECEIVE_TEST_PORT);

        // Still a successful receipt, only the delivery is skipped.
        let outcome = poll_until_data(&context);
        assert_eq!(outcome, PollOutcome::Received(10));

        let outcome = context.poll_once().expect("Poll should not fail.");
        assert_eq!(outcome, PollOutcome::NoData);
    }
}
