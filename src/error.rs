//! Error types for bus decoding.
//!
//! Every decode failure is a [`DecodeError`]. The frame decoder returns them
//! through [`Result`]; the telegram assembler converts the recoverable ones
//! into [`Event::Error`](crate::types::Event) items and re-synchronises on the
//! next inter-frame idle period. Errors are never retried internally.
//!
//! [`DecodeError::is_end_of_input`] separates the terminal conditions (input
//! exhausted, read failure) from signal faults the decoder can recover from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Symbol;

/// Result type alias for decode operations.
pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

/// Main error type for bus decoding.
///
/// `Clone` so the same condition can be surfaced repeatedly by a failed
/// reader and carried inside owned error events.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DecodeError {
    /// No second edge within the start-bit window.
    #[error("invalid start of frame")]
    InvalidStartOfFrame,

    /// First delimiter symbol matched neither the master nor the slave
    /// literal.
    #[error("invalid start delimiter: {symbol}")]
    InvalidStartDelimiter { symbol: Symbol },

    /// A later delimiter symbol broke the literal that the first symbol
    /// selected.
    #[error("expected symbol {expected}, got {got}")]
    UnexpectedSymbol { expected: Symbol, got: Symbol },

    /// A non-data violation where a data bit was required.
    #[error("expected data bit, got {symbol}")]
    ExpectedBitGotNonData { symbol: Symbol },

    /// Check sequence failed over the upper 7 bits (or the whole byte in
    /// strict mode).
    #[error("CRC mismatch: expected {expected:#04x}, got {got:#04x}")]
    CrcMismatch { expected: u8, got: u8 },

    /// The terminating NL symbol was not observed.
    #[error("missing end delimiter")]
    MissingEndDelimiter,

    /// A slave frame arrived with no pending master expecting one.
    #[error("unexpected slave frame")]
    UnexpectedSlaveFrame,

    /// A master expecting a slave response was superseded or the input ended
    /// before the slave arrived.
    #[error("missing slave response for fcode {fcode:x} address {address:#05x}")]
    MissingSlaveResponse { fcode: u8, address: u16 },

    /// Upstream byte source exhausted.
    #[error("input stream ended")]
    InputEof,

    /// Upstream read failure.
    #[error("input read failed: {message}")]
    Read { message: String },

    /// A configuration value could not be parsed.
    #[error("invalid signal level {input:?}: expected one hex byte")]
    InvalidSignalLevel { input: String },
}

impl DecodeError {
    /// Helper constructor wrapping an I/O failure from the byte source.
    pub fn read_failed(source: std::io::Error) -> Self {
        DecodeError::Read { message: source.to_string() }
    }

    /// Whether this error means the input is gone for good. The decode loop
    /// terminates on these; everything else is a signal fault that only costs
    /// a re-synchronisation.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, DecodeError::InputEof | DecodeError::Read { .. })
    }
}
