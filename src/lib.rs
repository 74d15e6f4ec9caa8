//! Decoder for the Multifunction Vehicle Bus (IEC 61375-3-1).
//!
//! `mvbtap` turns a real-time line capture of the 1.5 Mbit/s MVB train bus
//! into a stream of telegrams and structured error events. The input is one
//! byte per sample at 12 MHz (8 samples per bit, Manchester II line code),
//! typically piped in on standard input by the capture hardware.
//!
//! # Architecture
//!
//! Data flows strictly forward through three cooperating tasks:
//!
//! 1. An I/O **filler** blocks on the byte source and fills large sample
//!    blocks ([`input::SampleReader`]).
//! 2. The **decoder** task recognises Manchester symbols on the
//!    edge-synchronised line, validates frames and their IEC 61375 check
//!    sequences, and pairs master frames with the slave responses their
//!    F-codes call for ([`decode::Decoder`]).
//! 3. **Consumers** receive [`Event`]s from a bounded channel; backpressure
//!    from a slow consumer propagates all the way to the filler.
//!
//! Every event carries the sample index `n` at which it completed, which
//! doubles as a 1/12 µs timestamp.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use mvbtap::{DecoderConfig, Event, MvbTap};
//!
//! #[tokio::main]
//! async fn main() {
//!     let channels = MvbTap::connect_stdin(DecoderConfig::default());
//!     let mut events = channels.into_stream();
//!
//!     while let Some(event) = events.next().await {
//!         match event {
//!             Event::Telegram(telegram) => println!("{:?}", telegram),
//!             Event::Error(fault) => eprintln!("{} at n={}", fault.error, fault.n),
//!         }
//!     }
//! }
//! ```

pub mod config;
pub mod decode;
pub mod driver;
mod error;
pub mod input;
pub mod trace;
pub mod types;

#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;

pub use config::{signal_level_from_hex, DecoderConfig};
pub use decode::Decoder;
pub use driver::{DecoderChannels, Driver};
pub use error::{DecodeError, Result};
pub use input::{LineStream, SampleReader};
pub use trace::{TraceRing, TraceSample};
pub use types::*;

use std::fs::File;
use std::path::Path;

/// Unified entry point for decoding pipelines.
///
/// Wraps [`Driver::spawn`] for the two common byte sources: the live capture
/// feed on standard input and a recorded capture file (which is
/// byte-identical to the live feed).
pub struct MvbTap;

impl MvbTap {
    /// Decodes the live capture feed from standard input.
    ///
    /// Must be called within a Tokio runtime. The returned channels close
    /// when the feed reaches EOF.
    pub fn connect_stdin(config: DecoderConfig) -> DecoderChannels {
        Driver::spawn(std::io::stdin(), config)
    }

    /// Decodes a recorded capture file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P, config: DecoderConfig) -> Result<DecoderChannels> {
        let file = File::open(path).map_err(DecodeError::read_failed)?;
        Ok(Driver::spawn(file, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_rejects_missing_files() {
        let result = MvbTap::open("/nonexistent/capture.bin", DecoderConfig::default());
        assert!(matches!(result, Err(DecodeError::Read { .. })));
    }

    #[tokio::test]
    async fn open_decodes_a_recorded_capture() {
        use crate::test_utils::SignalBuilder;
        use std::io::Write;

        let bytes = SignalBuilder::new().idle(64).master_frame(15, 0x001).idle(64).finish();
        let path = std::env::temp_dir().join("mvbtap-open-test.bin");
        File::create(&path).unwrap().write_all(&bytes).unwrap();

        let mut channels = MvbTap::open(&path, DecoderConfig::default()).unwrap();
        let mut events = Vec::new();
        while let Some(event) = channels.events.recv().await {
            events.push(event);
        }
        std::fs::remove_file(&path).ok();

        // F-code 15 expects a 16-bit slave that never arrives.
        assert_eq!(events.len(), 1);
        assert!(events[0].is_error());
    }
}
