//! Frame recognition: start sequence, delimiters and frame bodies.

use crate::error::{DecodeError, Result};
use crate::types::{
    FCodeDescriptor, LineLevel, MasterFrame, SlaveFrame, Symbol, BT34_SAMPLES, BT4_SAMPLES,
};

use super::{crc, Decoder};

/// Bytes protected by one check sequence in a slave frame (3.5.2.2).
const CRC_CHUNK_LEN: usize = 8;

/// Start delimiters (3.3.1.5). The first symbol disambiguates master from
/// slave; the rest must match exactly.
const MASTER_DELIMITER: [Symbol; 8] = [
    Symbol::Nh,
    Symbol::Nl,
    Symbol::Bit0,
    Symbol::Nh,
    Symbol::Nl,
    Symbol::Bit0,
    Symbol::Bit0,
    Symbol::Bit0,
];
const SLAVE_DELIMITER: [Symbol; 8] = [
    Symbol::Bit1,
    Symbol::Bit1,
    Symbol::Bit1,
    Symbol::Nl,
    Symbol::Nh,
    Symbol::Bit1,
    Symbol::Nl,
    Symbol::Nh,
];

/// One decoded frame, before pairing into a telegram.
#[derive(Debug)]
pub(crate) enum Frame {
    Master(MasterFrame),
    Slave(SlaveFrame),
}

impl Decoder {
    /// Detects the start sequence: a rising then a falling edge, then the
    /// first half of the initial delimiter cell. Leaves the sampler at BT/4
    /// into that cell, as `read_symbol` expects.
    async fn wait_start_of_frame(&mut self) -> Result<()> {
        self.line.wait_until(LineLevel::High).await?;
        self.line.wait_until(LineLevel::Low).await?;
        self.line.annotate("S");
        let level = self.line.wait_elapsed_or_edge(BT34_SAMPLES, LineLevel::Low).await?;
        if level != LineLevel::High {
            return Err(DecodeError::InvalidStartOfFrame);
        }
        self.line.wait_elapsed(BT4_SAMPLES).await?;
        Ok(())
    }

    /// Reads the 8-symbol start delimiter; `true` for a master frame.
    async fn read_start_delimiter(&mut self) -> Result<bool> {
        let first = self.read_symbol().await?;
        let (is_master, delimiter) = if first == MASTER_DELIMITER[0] {
            (true, &MASTER_DELIMITER)
        } else if first == SLAVE_DELIMITER[0] {
            (false, &SLAVE_DELIMITER)
        } else {
            return Err(DecodeError::InvalidStartDelimiter { symbol: first });
        };
        for &expected in &delimiter[1..] {
            let got = self.read_symbol().await?;
            if got != expected {
                return Err(DecodeError::UnexpectedSymbol { expected, got });
            }
        }
        Ok(is_master)
    }

    /// Reads the end delimiter: a single NL cell (3.3.1.6).
    async fn read_end_delimiter(&mut self) -> Result<()> {
        match self.read_symbol().await? {
            Symbol::Nl => Ok(()),
            _ => Err(DecodeError::MissingEndDelimiter),
        }
    }

    /// Reads one complete frame. `expected` is the descriptor of the pending
    /// master when a slave response is awaited; without it a slave frame
    /// cannot be sized and is rejected outright.
    pub(crate) async fn read_frame(
        &mut self,
        expected: Option<&'static FCodeDescriptor>,
    ) -> Result<Frame> {
        self.wait_start_of_frame().await?;
        if self.read_start_delimiter().await? {
            self.read_master_frame().await.map(Frame::Master)
        } else {
            match expected {
                Some(descriptor) => self.read_slave_frame(descriptor).await.map(Frame::Slave),
                None => Err(DecodeError::UnexpectedSlaveFrame),
            }
        }
    }

    /// Master frame body: 2 payload bytes + 1 check sequence (3.4.1.1).
    async fn read_master_frame(&mut self) -> Result<MasterFrame> {
        let mut payload = [0u8; 2];
        self.read_data_bytes(&mut payload).await?;
        let received = self.read_data_byte().await?;
        crc::verify(&payload, received, self.strict_crc)?;
        self.read_end_delimiter().await?;
        Ok(MasterFrame::from_payload(payload))
    }

    /// Slave frame body: the payload the master's F-code calls for, read in
    /// chunks of up to 8 bytes, each followed by its check sequence.
    async fn read_slave_frame(&mut self, descriptor: &FCodeDescriptor) -> Result<SlaveFrame> {
        let mut data = vec![0u8; descriptor.slave_frame_len()];
        for chunk in data.chunks_mut(CRC_CHUNK_LEN) {
            self.read_data_bytes(chunk).await?;
            let received = self.read_data_byte().await?;
            crc::verify(chunk, received, self.strict_crc)?;
        }
        self.read_end_delimiter().await?;
        Ok(SlaveFrame::new(data))
    }
}
