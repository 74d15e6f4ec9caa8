//! Manchester II symbol recognition.
//!
//! Entry invariant for [`Decoder::read_symbol`]: the sampling position is one
//! quarter bit (BT/4) into the current cell and the line level is the cell's
//! first-half level. Watching for an edge across the middle half of the cell
//! tolerates up to a quarter bit of phase jitter on either side of the
//! nominal mid-cell transition while consuming a deterministic number of
//! samples, so the invariant holds again for the next cell.

use crate::error::{DecodeError, Result};
use crate::types::{LineLevel, Symbol, BT2_SAMPLES, BT34_SAMPLES};

use super::Decoder;

impl Decoder {
    /// Reads one Manchester symbol from the phase-aligned line.
    pub(crate) async fn read_symbol(&mut self) -> Result<Symbol> {
        let entry = self.line.v();
        let level = self.line.wait_elapsed_or_edge(BT2_SAMPLES, entry).await?;
        if level != entry {
            // Mid-cell transition: a data bit, classified by its direction.
            // We are just past the edge, near BT/2; skipping 3·BT/4 puts the
            // sampler at BT/4 of the next cell.
            let symbol = if level == LineLevel::High { Symbol::Bit0 } else { Symbol::Bit1 };
            self.line.annotate(symbol.name());
            self.line.wait_elapsed(BT34_SAMPLES).await?;
            Ok(symbol)
        } else {
            // No transition within the window: a non-data violation. We are
            // at 3·BT/4; half a bit more reaches BT/4 of the next cell.
            let symbol = if level == LineLevel::High { Symbol::Nh } else { Symbol::Nl };
            self.line.annotate(symbol.name());
            self.line.wait_elapsed(BT2_SAMPLES).await?;
            Ok(symbol)
        }
    }

    /// Reads a symbol and requires it to be a data bit.
    pub(crate) async fn read_bit(&mut self) -> Result<u8> {
        match self.read_symbol().await? {
            Symbol::Bit0 => Ok(0),
            Symbol::Bit1 => Ok(1),
            symbol => Err(DecodeError::ExpectedBitGotNonData { symbol }),
        }
    }

    /// Reads one data byte, MSB first.
    pub(crate) async fn read_data_byte(&mut self) -> Result<u8> {
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | self.read_bit().await?;
        }
        Ok(byte)
    }

    /// Fills `buf` with consecutive data bytes.
    pub(crate) async fn read_data_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        for slot in buf {
            *slot = self.read_data_byte().await?;
        }
        Ok(())
    }
}
