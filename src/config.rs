//! Decoder configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Result};

/// Tuning knobs for one decoder pipeline.
///
/// The defaults match the common capture setup: HIGH sampled as 0xFF, LOW as
/// 0xFE, lenient CRC parity comparison, tracing disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Byte value representing a HIGH line sample. Any other value reads as
    /// LOW.
    pub signal_high: u8,

    /// Byte value representing a LOW line sample. Kept for symmetry with the
    /// capture tooling; the level mapping only compares against
    /// `signal_high`, but idle waits search for this byte directly.
    pub signal_low: u8,

    /// Compare all 8 CRC bits instead of the upper 7. Observed captures
    /// contain both parity-bit polarities, so the lenient comparison is the
    /// default.
    pub strict_crc: bool,

    /// Capacity of the annotation ring attached to error events. 0 disables
    /// tracing; sample pushes then cost nothing on the hot path.
    pub trace_depth: usize,

    /// Bound of the outbound event channel. A slow consumer blocks the
    /// decoder and, once the sample buffers fill, the reader.
    pub event_capacity: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            signal_high: 0xff,
            signal_low: 0xfe,
            strict_crc: false,
            trace_depth: 0,
            event_capacity: 256,
        }
    }
}

impl DecoderConfig {
    pub fn with_levels(mut self, high: u8, low: u8) -> Self {
        self.signal_high = high;
        self.signal_low = low;
        self
    }

    pub fn with_strict_crc(mut self, strict: bool) -> Self {
        self.strict_crc = strict;
        self
    }

    pub fn with_trace_depth(mut self, depth: usize) -> Self {
        self.trace_depth = depth;
        self
    }
}

/// Parses a signal level given as one hex byte, with or without a `0x`
/// prefix, as accepted by the capture tooling's `--high`/`--low` flags.
pub fn signal_level_from_hex(input: &str) -> Result<u8> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    if digits.len() != 2 {
        return Err(DecodeError::InvalidSignalLevel { input: input.to_string() });
    }
    u8::from_str_radix(digits, 16)
        .map_err(|_| DecodeError::InvalidSignalLevel { input: input.to_string() })
}
