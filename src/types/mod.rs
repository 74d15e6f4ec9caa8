//! Core types for MVB bus decoding.
//!
//! The data model maps directly onto the wire format of IEC 61375-3-1:
//! - [`Symbol`] is one decoded Manchester II cell, including the non-data
//!   violations used in delimiters
//! - [`FCodeDescriptor`] is one row of the constant F-code table that sizes
//!   the expected slave response
//! - [`MasterFrame`], [`SlaveFrame`] and [`Telegram`] are the decoded frames
//! - [`Event`] is the sum type carried by the outbound event channel
//!
//! Timing constants ([`BT_SAMPLES`] and friends) fix the bus at 1.5 Mbit/s
//! sampled at 12 MHz, 8 samples per bit.

mod event;
mod fcode;
mod frame;
mod symbol;
mod timing;

pub use event::{ErrorEvent, Event};
pub use fcode::{
    AddressType, FCodeDescriptor, FCODES, MasterRequest, SlaveFrameDestination, SlaveFrameSource,
    SlaveResponse,
};
pub use frame::{MasterFrame, SlaveFrame, Telegram};
pub use symbol::{LineLevel, Symbol};
pub use timing::{
    sample_timestamp, BIT_RATE, BT2_SAMPLES, BT34_SAMPLES, BT4_SAMPLES, BT_SAMPLES,
    FRAME_GAP_SAMPLES, SAMPLE_RATE,
};
