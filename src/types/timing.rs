//! Bus timing constants and sample-index timestamps.

use std::time::Duration;

/// Input sample rate in samples per second (8 samples per bit at 1.5 Mbit/s).
pub const SAMPLE_RATE: u64 = 12_000_000;

/// MVB signalling speed in bits per second (IEC 61375-3-1 3.2.3.1).
pub const BIT_RATE: u64 = 1_500_000;

/// Samples per bit time.
pub const BT_SAMPLES: usize = (SAMPLE_RATE / BIT_RATE) as usize;

/// Samples per half bit time.
pub const BT2_SAMPLES: usize = BT_SAMPLES / 2;

/// Samples per quarter bit time.
pub const BT4_SAMPLES: usize = BT_SAMPLES / 4;

/// Samples per three quarters of a bit time.
pub const BT34_SAMPLES: usize = 3 * BT_SAMPLES / 4;

/// Minimum inter-frame gap of constant line level, in samples (2 bit times).
pub const FRAME_GAP_SAMPLES: usize = 2 * BT_SAMPLES;

/// Converts a sample index into elapsed time since the start of the capture.
pub fn sample_timestamp(n: u64) -> Duration {
    Duration::from_secs_f64(n as f64 / SAMPLE_RATE as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_samples_per_bit() {
        assert_eq!(BT_SAMPLES, 8);
        assert_eq!(BT2_SAMPLES, 4);
        assert_eq!(BT4_SAMPLES, 2);
        assert_eq!(BT34_SAMPLES, 6);
        assert_eq!(FRAME_GAP_SAMPLES, 16);
    }

    #[test]
    fn timestamp_scales_with_sample_rate() {
        assert_eq!(sample_timestamp(0), Duration::ZERO);
        assert_eq!(sample_timestamp(SAMPLE_RATE), Duration::from_secs(1));
        assert_eq!(sample_timestamp(SAMPLE_RATE / 2), Duration::from_millis(500));
    }
}
