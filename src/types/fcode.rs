//! The F-code descriptor table (IEC 61375-3-1 3.5.2).
//!
//! The 4-bit F-code in a master frame selects the address semantics of the
//! request and the size (and existence) of the expected slave response. The
//! table is process-wide constant data; [`FCodeDescriptor::for_code`] indexes
//! it by the low four bits of the code.

use serde::{Deserialize, Serialize};

/// How the 12-bit address field of a master frame is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressType {
    None,
    Logical,
    Device,
    AllDevices,
    DeviceGroup,
}

/// Category of the master request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MasterRequest {
    ProcessData,
    Reserved,
    MastershipTransfer,
    GeneralEvent,
    MessageData,
    GroupEvent,
    SingleEvent,
    DeviceStatus,
}

impl std::fmt::Display for MasterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MasterRequest::ProcessData => "PROCESS_DATA",
            MasterRequest::Reserved => "RESERVED",
            MasterRequest::MastershipTransfer => "MASTERSHIP_TRANSFER",
            MasterRequest::GeneralEvent => "GENERAL_EVENT",
            MasterRequest::MessageData => "MESSAGE_DATA",
            MasterRequest::GroupEvent => "GROUP_EVENT",
            MasterRequest::SingleEvent => "SINGLE_EVENT",
            MasterRequest::DeviceStatus => "DEVICE_STATUS",
        };
        f.write_str(name)
    }
}

/// Which device sources the slave frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlaveFrameSource {
    None,
    Single,
    ProposedMaster,
    DeviceGroup,
    SubscribedSource,
}

/// What the slave frame carries in response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlaveResponse {
    None,
    ProcessData,
    MastershipTransfer,
    EventIdentifier,
    MessageData,
    DeviceStatus,
}

/// Which devices consume the slave frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlaveFrameDestination {
    None,
    SubscribedSinks,
    Master,
    SelectedDevices,
    MasterOrMonitor,
}

/// One row of the F-code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FCodeDescriptor {
    pub fcode: u8,
    pub address_type: AddressType,
    pub master_request: MasterRequest,
    pub slave_source: SlaveFrameSource,
    /// Expected slave frame size in bits; 0 for reserved codes with no slave.
    pub slave_size_bits: u16,
    pub slave_response: SlaveResponse,
    pub slave_destination: SlaveFrameDestination,
}

impl FCodeDescriptor {
    /// Looks up the descriptor for a 4-bit F-code. Higher bits are ignored.
    pub fn for_code(fcode: u8) -> &'static FCodeDescriptor {
        &FCODES[(fcode & 0x0f) as usize]
    }

    /// Whether a slave frame follows a master frame with this F-code.
    pub fn expects_slave(&self) -> bool {
        self.slave_size_bits != 0
    }

    /// Expected slave payload length in bytes.
    pub fn slave_frame_len(&self) -> usize {
        (self.slave_size_bits / 8) as usize
    }
}

impl std::fmt::Display for FCodeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[fcode {:02x}] {}", self.fcode, self.master_request)
    }
}

macro_rules! fcode {
    ($n:expr, $at:ident, $mr:ident, $src:ident, $bits:expr, $resp:ident, $dst:ident) => {
        FCodeDescriptor {
            fcode: $n,
            address_type: AddressType::$at,
            master_request: MasterRequest::$mr,
            slave_source: SlaveFrameSource::$src,
            slave_size_bits: $bits,
            slave_response: SlaveResponse::$resp,
            slave_destination: SlaveFrameDestination::$dst,
        }
    };
}

/// The full F-code table, indexed by code.
pub static FCODES: [FCodeDescriptor; 16] = [
    fcode!(0, Logical, ProcessData, SubscribedSource, 16, ProcessData, SubscribedSinks),
    fcode!(1, Logical, ProcessData, SubscribedSource, 32, ProcessData, SubscribedSinks),
    fcode!(2, Logical, ProcessData, SubscribedSource, 64, ProcessData, SubscribedSinks),
    fcode!(3, Logical, ProcessData, SubscribedSource, 128, ProcessData, SubscribedSinks),
    fcode!(4, Logical, ProcessData, SubscribedSource, 256, ProcessData, SubscribedSinks),
    fcode!(5, None, Reserved, None, 0, None, None),
    fcode!(6, None, Reserved, None, 0, None, None),
    fcode!(7, None, Reserved, None, 0, None, None),
    fcode!(8, Device, MastershipTransfer, ProposedMaster, 16, MastershipTransfer, Master),
    fcode!(9, AllDevices, GeneralEvent, DeviceGroup, 16, EventIdentifier, Master),
    fcode!(10, Device, Reserved, None, 0, None, None),
    fcode!(11, Device, Reserved, None, 0, None, None),
    fcode!(12, Device, MessageData, Single, 256, MessageData, SelectedDevices),
    fcode!(13, DeviceGroup, GroupEvent, DeviceGroup, 16, EventIdentifier, Master),
    fcode!(14, Device, SingleEvent, Single, 16, EventIdentifier, Master),
    fcode!(15, Device, DeviceStatus, Single, 16, DeviceStatus, Master),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_keyed_by_code() {
        for (i, descriptor) in FCODES.iter().enumerate() {
            assert_eq!(descriptor.fcode as usize, i);
            assert_eq!(FCodeDescriptor::for_code(i as u8), descriptor);
        }
    }

    #[test]
    fn reserved_codes_expect_no_slave() {
        for code in [5u8, 6, 7, 10, 11] {
            let descriptor = FCodeDescriptor::for_code(code);
            assert!(!descriptor.expects_slave());
            assert_eq!(descriptor.slave_frame_len(), 0);
            assert_eq!(descriptor.master_request, MasterRequest::Reserved);
        }
    }

    #[test]
    fn process_data_sizes_double_per_code() {
        for code in 0u8..=4 {
            let descriptor = FCodeDescriptor::for_code(code);
            assert_eq!(descriptor.master_request, MasterRequest::ProcessData);
            assert_eq!(descriptor.slave_size_bits, 16 << code);
        }
    }

    #[test]
    fn slave_lengths_are_whole_bytes() {
        for descriptor in &FCODES {
            assert_eq!(descriptor.slave_size_bits % 8, 0);
            assert_eq!(descriptor.slave_frame_len() * 8, descriptor.slave_size_bits as usize);
        }
    }

    #[test]
    fn high_bits_are_masked() {
        assert_eq!(FCodeDescriptor::for_code(0x35), FCodeDescriptor::for_code(5));
    }
}
