//! Frame and telegram types.
//!
//! A [`Telegram`] is the fundamental unit handed to consumers: a master frame
//! plus, where the F-code calls for one, the paired slave response.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::fcode::FCodeDescriptor;
use super::timing::sample_timestamp;

/// The 16-bit payload of a master frame (IEC 61375-3-1 3.4.1.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterFrame {
    /// 4-bit function code.
    pub fcode: u8,
    /// 12-bit address; for process data this is the port number.
    pub address: u16,
}

impl MasterFrame {
    /// Splits the two payload bytes into F-code (high nibble of byte 0) and
    /// the low 12 address bits.
    pub fn from_payload(payload: [u8; 2]) -> Self {
        Self {
            fcode: payload[0] >> 4,
            address: (u16::from(payload[0] & 0x0f) << 8) | u16::from(payload[1]),
        }
    }

    /// Packs the frame back into its two payload bytes.
    pub fn to_payload(self) -> [u8; 2] {
        [(self.fcode << 4) | (self.address >> 8) as u8, self.address as u8]
    }

    /// The F-code table row governing this frame.
    pub fn descriptor(&self) -> &'static FCodeDescriptor {
        FCodeDescriptor::for_code(self.fcode)
    }
}

impl std::fmt::Display for MasterFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "master fcode={:x} address={:03x}", self.fcode, self.address)
    }
}

/// The payload of a slave frame: 2, 4, 8, 16 or 32 bytes depending on the
/// master's F-code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaveFrame {
    data: Vec<u8>,
}

impl SlaveFrame {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl AsRef<[u8]> for SlaveFrame {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// A completed bus transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telegram {
    /// Sample index at which the telegram completed.
    pub n: u64,
    pub master: MasterFrame,
    /// Present iff the master's F-code expects a slave and one was observed
    /// within the inter-frame idle bound.
    pub slave: Option<SlaveFrame>,
}

impl Telegram {
    /// Capture-relative time of completion.
    pub fn timestamp(&self) -> Duration {
        sample_timestamp(self.n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn master_payload_split() {
        let master = MasterFrame::from_payload([0x51, 0x23]);
        assert_eq!(master.fcode, 5);
        assert_eq!(master.address, 0x123);
    }

    proptest! {
        #[test]
        fn master_payload_round_trips(fcode in 0u8..16, address in 0u16..0x1000) {
            let master = MasterFrame { fcode, address };
            let reparsed = MasterFrame::from_payload(master.to_payload());
            prop_assert_eq!(reparsed, master);
        }

        #[test]
        fn parsed_fields_stay_in_range(payload in proptest::array::uniform2(any::<u8>())) {
            let master = MasterFrame::from_payload(payload);
            prop_assert!(master.fcode < 16);
            prop_assert!(master.address < 0x1000);
        }
    }
}
