//! Enumeration of local IPv4 network interfaces.
//!
//! The interface table is a bounded list owned by the
//! [`DiscoveryContext`]: it is rewritten in full on every refresh, never
//! merged, so a caller always observes one coherent enumeration result.

use std::net::{IpAddr, Ipv4Addr};

use crate::{logger, DiscoveryContext, ScoutError};

/// Maximum number of interfaces stored per refresh.
///
/// Machines with more interfaces than this still work: the excess entries
/// are logged and dropped, silently limiting discovery rather than failing
/// it.
pub const INTERFACE_LIST_SIZE: usize = 16;

/// Maximum length of a stored interface name, in characters.
pub const INTERFACE_NAME_LEN: usize = 16;

/// One enumerated network adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkInterface {
    name: String,
    address: Ipv4Addr,
}

impl NetworkInterface {
    /// Create a new interface entry, truncating the name to
    /// [`INTERFACE_NAME_LEN`] characters.
    pub fn new(name: &str, address: Ipv4Addr) -> Self {
        Self {
            name: name.chars().take(INTERFACE_NAME_LEN).collect(),
            address,
        }
    }

    /// The short textual identifier of the adapter.
    ///
    /// An empty name acts as the end-of-list sentinel during fan-out.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The IPv4 address of the adapter.
    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// The address as its four byte components.
    pub fn octets(&self) -> [u8; 4] {
        self.address.octets()
    }
}

impl DiscoveryContext {
    /// Query the OS for the current set of network interfaces and overwrite
    /// the context's interface table with the IPv4-capable ones.
    ///
    /// The table is always cleared in full before enumeration is attempted,
    /// so previous entries never persist across a failed refresh. Entries
    /// beyond [`INTERFACE_LIST_SIZE`] are logged as warnings and dropped.
    pub fn refresh_interfaces(&mut self) -> Result<(), ScoutError> {
        self.interfaces.clear();

        let netifas = local_ip_address::list_afinet_netifas()?;

        let mut total = 0_usize;
        for (name, address) in netifas {
            let IpAddr::V4(address) = address else {
                // Only IPv4 entries populate the table.
                continue;
            };

            total += 1;
            if self.interfaces.len() >= INTERFACE_LIST_SIZE {
                logger::warn!(
                    "The number of network interfaces exceeds the table size {INTERFACE_LIST_SIZE}; dropping {name} ({address})."
                );
                continue;
            }

            self.interfaces.push(NetworkInterface::new(&name, address));
        }

        logger::debug!(
            "Enumerated {total} IPv4 interface(s), stored {stored}.",
            stored = self.interfaces.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::_tests::test_context;

    #[test]
    fn name_is_truncated() {
        let interface = NetworkInterface::new(
            "an-interface-name-way-past-the-bound",
            Ipv4Addr::new(10, 0, 0, 1),
        );
        assert_eq!(interface.name().chars().count(), INTERFACE_NAME_LEN);
        assert_eq!(interface.name(), "an-interface-nam");
    }

    #[test]
    fn octets_match_address() {
        let interface = NetworkInterface::new("eth0", Ipv4Addr::new(192, 168, 7, 13));
        assert_eq!(interface.octets(), [192, 168, 7, 13]);
        assert_eq!(interface.address(), Ipv4Addr::new(192, 168, 7, 13));
    }

    #[test]
    fn refresh_populates_valid_entries() {
        let mut context = test_context();

        context
            .refresh_interfaces()
            .expect("Failed to enumerate interfaces.");

        assert!(context.interfaces().len() <= INTERFACE_LIST_SIZE);
        for interface in context.interfaces() {
            assert!(!interface.name().is_empty());
            assert!(interface.name().chars().count() <= INTERFACE_NAME_LEN);
        }
    }

    #[test]
    fn refresh_overwrites_previous_entries() {
        let mut context = test_context();

        context
            .refresh_interfaces()
            .expect("Failed to enumerate interfaces.");
        let first = context.interfaces().to_vec();

        context
            .refresh_interfaces()
            .expect("Failed to enumerate interfaces.");

        // Two back-to-back refreshes of a stable host enumerate the same
        // set; nothing is appended or merged.
        assert_eq!(context.interfaces(), &first[..]);
    }
}
