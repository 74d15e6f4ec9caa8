//! Double-buffered sample reader.
//!
//! Sustaining 12 MB/s from a pipe rules out per-byte calls into blocking I/O.
//! A dedicated filler task owns the byte source and blocks reading into large
//! fixed-size blocks; the decoder side drains one block at a time. Blocks
//! circulate over a pair of bounded channels (filled blocks one way, spent
//! blocks back), so exactly one side owns any block at any instant and read
//! throughput is limited by the pipe, not by call overhead.
//!
//! ## Failure model
//!
//! EOF and read errors are surfaced once and are sticky: every later call
//! fails with the same condition. EOF is the pipeline's only termination
//! signal.

use std::io::Read;
use std::mem;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::error::{DecodeError, Result};
use crate::types::SAMPLE_RATE;

/// Size of one circulating block: half a second of samples.
const BLOCK_SIZE: usize = (SAMPLE_RATE / 2) as usize;

/// Number of blocks in flight between the filler and the reader.
const POOL_BLOCKS: usize = 2;

/// A filled block: `data` is always `BLOCK_SIZE` long, `len` is how much of
/// it the last read produced.
#[derive(Default)]
struct Block {
    data: Vec<u8>,
    len: usize,
}

impl Block {
    fn new() -> Self {
        Self { data: vec![0; BLOCK_SIZE], len: 0 }
    }
}

/// Sequential sample feed with bulk-discard operations and a monotonic
/// sample counter.
pub struct SampleReader {
    blocks: mpsc::Receiver<std::io::Result<Block>>,
    returns: mpsc::Sender<Block>,
    current: Block,
    pos: usize,
    n: u64,
    fault: Option<DecodeError>,
}

impl SampleReader {
    /// Spawns the filler task over a blocking byte source and returns the
    /// consuming side. Must be called within a Tokio runtime.
    pub fn spawn<R>(source: R) -> Self
    where
        R: Read + Send + 'static,
    {
        let (block_tx, block_rx) = mpsc::channel(POOL_BLOCKS);
        let (return_tx, return_rx) = mpsc::channel(POOL_BLOCKS);

        tokio::task::spawn_blocking(move || fill_loop(source, block_tx, return_rx));

        Self {
            blocks: block_rx,
            returns: return_tx,
            current: Block::default(),
            pos: 0,
            n: 0,
            fault: None,
        }
    }

    /// Cumulative count of bytes consumed.
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Returns the next byte, suspending while both blocks are empty and the
    /// filler has not produced yet.
    pub async fn read_byte(&mut self) -> Result<u8> {
        if self.pos == self.current.len {
            self.refill().await?;
        }
        let byte = self.current.data[self.pos];
        self.pos += 1;
        self.n += 1;
        Ok(byte)
    }

    /// Advances the stream by exactly `count` bytes.
    pub async fn discard(&mut self, count: usize) -> Result<()> {
        let mut remaining = count;
        while remaining > 0 {
            if self.pos == self.current.len {
                self.refill().await?;
            }
            let step = remaining.min(self.current.len - self.pos);
            self.pos += step;
            self.n += step as u64;
            remaining -= step;
        }
        Ok(())
    }

    /// Advances until (but not past) the next occurrence of `byte`. Fails
    /// with the stream's end condition if it ends first.
    pub async fn discard_until(&mut self, byte: u8) -> Result<()> {
        loop {
            if self.pos == self.current.len {
                self.refill().await?;
            }
            let window = &self.current.data[self.pos..self.current.len];
            match window.iter().position(|&b| b == byte) {
                Some(offset) => {
                    self.pos += offset;
                    self.n += offset as u64;
                    return Ok(());
                }
                None => {
                    let skipped = window.len();
                    self.pos = self.current.len;
                    self.n += skipped as u64;
                }
            }
        }
    }

    /// Hands the spent block back to the filler and waits for the next one.
    async fn refill(&mut self) -> Result<()> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        // The initial placeholder block never visited the filler's pool and
        // has no backing storage to return.
        if !self.current.data.is_empty() {
            let _ = self.returns.try_send(mem::take(&mut self.current));
        }

        match self.blocks.recv().await {
            Some(Ok(block)) => {
                self.current = block;
                self.pos = 0;
                Ok(())
            }
            Some(Err(source)) => {
                let fault = DecodeError::read_failed(source);
                self.fault = Some(fault.clone());
                Err(fault)
            }
            None => {
                self.fault = Some(DecodeError::InputEof);
                Err(DecodeError::InputEof)
            }
        }
    }
}

/// Filler loop: runs on the blocking pool, owns the byte source and the
/// block pool's empty side.
fn fill_loop<R: Read>(
    mut source: R,
    blocks: mpsc::Sender<std::io::Result<Block>>,
    mut returns: mpsc::Receiver<Block>,
) {
    let mut pool: Vec<Block> = (0..POOL_BLOCKS).map(|_| Block::new()).collect();
    let mut filled = 0u64;

    loop {
        let mut block = match pool.pop() {
            Some(block) => block,
            None => match returns.blocking_recv() {
                Some(block) => block,
                // Reader dropped: nothing left to fill for.
                None => return,
            },
        };

        loop {
            match source.read(&mut block.data) {
                Ok(0) => {
                    debug!(blocks = filled, "input source reached EOF");
                    // Dropping `blocks` closes the stream; the reader maps
                    // the closure to InputEof.
                    return;
                }
                Ok(count) => {
                    block.len = count;
                    filled += 1;
                    trace!(bytes = count, "block filled");
                    if blocks.blocking_send(Ok(block)).is_err() {
                        return;
                    }
                    break;
                }
                Err(error) if error.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(error) => {
                    debug!(%error, "input source read failed");
                    let _ = blocks.blocking_send(Err(error));
                    return;
                }
            }
        }
    }
}
