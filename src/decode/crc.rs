//! IEC 61375-3-1 check sequence (3.4.1.3).
//!
//! CRC-8 with polynomial 0xE5 in its shifted form, processed MSB-first over
//! the protected chunk. The low bit of the register is then replaced by the
//! parity of the remaining seven, and the whole byte is complemented.
//!
//! Observed captures contain both polarities of the parity bit, so
//! verification compares only the upper 7 bits by default; strict mode
//! compares the whole byte.

use crate::error::{DecodeError, Result};

const POLY: u8 = 0xe5;

/// Computes the check sequence over one protected chunk.
pub fn checksum(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 { (crc << 1) ^ (POLY << 1) } else { crc << 1 };
        }
    }
    crc &= 0xfe;
    crc |= (crc.count_ones() % 2) as u8;
    !crc
}

/// Validates a received check sequence against the chunk it protects.
pub fn verify(data: &[u8], received: u8, strict: bool) -> Result<()> {
    let expected = checksum(data);
    let ok = if strict { expected == received } else { expected >> 1 == received >> 1 };
    if ok {
        Ok(())
    } else {
        Err(DecodeError::CrcMismatch { expected, got: received })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_its_own_checksum() {
        let chunk = [0x01, 0x23];
        verify(&chunk, checksum(&chunk), false).unwrap();
        verify(&chunk, checksum(&chunk), true).unwrap();
    }

    #[test]
    fn parity_bit_is_tolerated_only_in_lenient_mode() {
        let chunk = [0xaa, 0x55];
        let flipped = checksum(&chunk) ^ 0x01;
        verify(&chunk, flipped, false).unwrap();
        assert!(matches!(
            verify(&chunk, flipped, true),
            Err(DecodeError::CrcMismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn round_trips_for_any_chunk(chunk in proptest::collection::vec(any::<u8>(), 1..=8)) {
            verify(&chunk, checksum(&chunk), true).unwrap();
        }

        #[test]
        fn detects_any_upper_bit_corruption(
            chunk in proptest::collection::vec(any::<u8>(), 1..=8),
            bit in 1u8..8,
        ) {
            let corrupted = checksum(&chunk) ^ (1 << bit);
            prop_assert!(verify(&chunk, corrupted, false).is_err());
        }

        #[test]
        fn detects_single_bit_payload_corruption(
            chunk in proptest::collection::vec(any::<u8>(), 1..=8),
            index in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let crc = checksum(&chunk);
            let mut corrupted = chunk.clone();
            let i = index.index(corrupted.len());
            corrupted[i] ^= 1 << bit;
            prop_assert!(verify(&corrupted, crc, false).is_err());
        }
    }
}
