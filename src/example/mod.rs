//! Structs and data classes that are only useful in the discover example.
//!
//!
use serde::{Deserialize, Serialize};

/// One received payload, summarised for machine-readable output.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DiscoveryEvent {
    /// Number of bytes received.
    pub length: usize,

    /// The first line of the payload, lossily decoded.
    pub preview: String,
}

impl DiscoveryEvent {
    /// Summarise a raw payload.
    pub fn from_payload(data: &[u8]) -> Self {
        let text = String::from_utf8_lossy(data);

        Self {
            length: data.len(),
            preview: text.lines().next().unwrap_or_default().to_owned(),
        }
    }
}
