//! Construction and fan-out of discovery requests.

use crate::{
    logger, send_via_interface, socket::MULTICAST_ADDRESS, DiscoveryContext, NetworkInterface,
    ScoutError, INTERFACE_LIST_SIZE,
};

/// Maximum length of a rendered discovery request, in bytes.
pub const MESSAGE_MAX_LEN: usize = 1024;

/// Render the discovery request for a search target and port.
///
/// The output is the fixed `M-SEARCH` text, CRLF-terminated and ending in a
/// blank line. The rendered length is bounded by [`MESSAGE_MAX_LEN`]; a
/// search target that would push the message past that bound is a caller
/// error, not a truncation.
pub fn build_msearch(search_target: &str, port: u16) -> Result<String, ScoutError> {
    let msearch = format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST:{MULTICAST_ADDRESS}:{port}\r\n\
         MAN:\"ssdp:discover\"\r\n\
         ST:{search_target}\r\n\
         MX:1\r\n\
         \r\n"
    );

    if msearch.len() > MESSAGE_MAX_LEN {
        return Err(ScoutError::InvalidArgument(format!(
            "Search target of {} bytes pushes the discovery request past {MESSAGE_MAX_LEN} bytes",
            search_target.len()
        )));
    }

    Ok(msearch)
}

/// Deliver one payload to each interface in stored order.
///
/// Iteration stops at the first entry with an empty name (the end-of-list
/// sentinel) or at [`INTERFACE_LIST_SIZE`], whichever comes first. A failed
/// send is logged and skipped; it never prevents the remaining interfaces
/// from being attempted. Returns the number of successful sends.
fn fan_out<F>(interfaces: &[NetworkInterface], payload: &[u8], port: u16, mut send: F) -> usize
where
    F: FnMut(&NetworkInterface, &[u8], u16) -> Result<usize, ScoutError>,
{
    let mut delivered = 0;

    for interface in interfaces.iter().take(INTERFACE_LIST_SIZE) {
        if interface.name().is_empty() {
            break;
        }

        match send(interface, payload, port) {
            Ok(_) => delivered += 1,
            Err(err) => {
                logger::warn!(
                    "Failed to send via {name} ({address}), skipping: {err}",
                    name = interface.name(),
                    address = interface.address(),
                );
            }
        }
    }

    delivered
}

impl DiscoveryContext {
    /// Perform one discovery round.
    ///
    /// The interface table is refreshed first, since interfaces may appear
    /// or disappear between rounds, and a failed refresh short-circuits the
    /// round. The request payload is then built from the context's search
    /// target and port and sent once per known interface, sequentially, in
    /// enumeration order. Per-interface send failures are logged and
    /// skipped; the round as a whole does not fail because of them.
    pub fn send_msearch(&mut self) -> Result<(), ScoutError> {
        self.refresh_interfaces()?;

        let msearch = build_msearch(&self.search_target, self.port)?;

        let delivered = fan_out(
            &self.interfaces,
            msearch.as_bytes(),
            self.port,
            send_via_interface,
        );

        logger::debug!(
            "Discovery request for {target} sent via {delivered} of {known} interface(s).",
            target = self.search_target,
            known = self.interfaces.len(),
        );
        Ok(())
    }
}
