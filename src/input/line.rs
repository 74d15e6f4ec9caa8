//! Line-level view of the sample stream.
//!
//! Maps each sample byte to a logical [`LineLevel`] and builds the coarse
//! waiting primitives the symbol decoder is written against: elapsed-sample
//! waits, edge-bounded waits, idle detection and level searches. Elapsed
//! waits ride on the reader's bulk discards, so skipping inside a bit cell
//! costs no per-byte work.

use crate::config::DecoderConfig;
use crate::error::Result;
use crate::trace::{TraceRing, TraceSample};
use crate::types::LineLevel;

use super::SampleReader;

/// The sample stream seen as a logical line.
pub struct LineStream {
    reader: SampleReader,
    signal_high: u8,
    signal_low: u8,
    level: LineLevel,
    trace: Option<TraceRing>,
}

impl LineStream {
    pub fn new(reader: SampleReader, config: &DecoderConfig) -> Self {
        Self {
            reader,
            signal_high: config.signal_high,
            signal_low: config.signal_low,
            level: LineLevel::Low,
            trace: (config.trace_depth > 0).then(|| TraceRing::new(config.trace_depth)),
        }
    }

    /// Level of the most recently consumed sample.
    pub fn v(&self) -> LineLevel {
        self.level
    }

    /// Sample index: count of bytes consumed so far.
    pub fn n(&self) -> u64 {
        self.reader.n()
    }

    /// Advances exactly one sample and returns the new level. A byte equal
    /// to the configured HIGH value reads as HIGH; anything else reads LOW.
    pub async fn next_sample(&mut self) -> Result<LineLevel> {
        let byte = self.reader.read_byte().await?;
        self.level = if byte == self.signal_high { LineLevel::High } else { LineLevel::Low };
        if let Some(ring) = &mut self.trace {
            ring.push(self.level);
        }
        Ok(self.level)
    }

    /// Skips `samples - 1` samples and returns the level of the last one.
    pub async fn wait_elapsed(&mut self, samples: usize) -> Result<LineLevel> {
        self.reader.discard(samples - 1).await?;
        self.next_sample().await
    }

    /// Consumes up to `samples` samples, stopping early at the first one
    /// whose level differs from `reference`. Returns the current level.
    pub async fn wait_elapsed_or_edge(
        &mut self,
        samples: usize,
        reference: LineLevel,
    ) -> Result<LineLevel> {
        if self.level != reference {
            return Ok(self.level);
        }
        for _ in 0..samples {
            if self.next_sample().await? != reference {
                break;
            }
        }
        Ok(self.level)
    }

    /// Waits until the line has held one level for `samples` consecutive
    /// samples. Any edge restarts the count.
    pub async fn wait_idle(&mut self, samples: usize) -> Result<LineLevel> {
        loop {
            let held = self.level;
            if self.wait_elapsed_or_edge(samples, held).await? == held {
                return Ok(self.level);
            }
        }
    }

    /// Skips to the next sample of exactly the requested level and returns
    /// it. The search runs over raw bytes, so garbage values (neither HIGH
    /// nor LOW) are skipped as well.
    pub async fn wait_until(&mut self, level: LineLevel) -> Result<LineLevel> {
        let byte = match level {
            LineLevel::High => self.signal_high,
            LineLevel::Low => self.signal_low,
        };
        self.reader.discard_until(byte).await?;
        self.next_sample().await
    }

    /// Attaches a note to the most recent traced sample. No-op when tracing
    /// is disabled.
    pub fn annotate(&mut self, note: &str) {
        if let Some(ring) = &mut self.trace {
            ring.annotate(note);
        }
    }

    /// Copies the annotation ring, if tracing is enabled.
    pub fn trace_snapshot(&self) -> Option<Vec<TraceSample>> {
        self.trace.as_ref().map(TraceRing::snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HI: u8 = 0xff;
    const LO: u8 = 0xfe;

    fn stream(samples: Vec<u8>) -> LineStream {
        stream_with(samples, DecoderConfig::default())
    }

    fn stream_with(samples: Vec<u8>, config: DecoderConfig) -> LineStream {
        LineStream::new(SampleReader::spawn(Cursor::new(samples)), &config)
    }

    #[tokio::test]
    async fn maps_bytes_to_levels() {
        let mut line = stream(vec![HI, LO, 0x42]);
        assert_eq!(line.next_sample().await.unwrap(), LineLevel::High);
        assert_eq!(line.next_sample().await.unwrap(), LineLevel::Low);
        // Anything that is not the HIGH byte reads as LOW.
        assert_eq!(line.next_sample().await.unwrap(), LineLevel::Low);
        assert_eq!(line.n(), 3);
    }

    #[tokio::test]
    async fn wait_elapsed_consumes_exactly() {
        let mut line = stream(vec![LO, LO, LO, HI, LO]);
        assert_eq!(line.wait_elapsed(4).await.unwrap(), LineLevel::High);
        assert_eq!(line.n(), 4);
    }

    #[tokio::test]
    async fn wait_elapsed_or_edge_stops_at_the_edge() {
        let mut line = stream(vec![LO, LO, HI, LO, LO]);
        line.next_sample().await.unwrap();
        let level = line.wait_elapsed_or_edge(4, LineLevel::Low).await.unwrap();
        assert_eq!(level, LineLevel::High);
        assert_eq!(line.n(), 3);
    }

    #[tokio::test]
    async fn wait_elapsed_or_edge_returns_immediately_off_reference() {
        let mut line = stream(vec![HI, LO]);
        line.next_sample().await.unwrap();
        let level = line.wait_elapsed_or_edge(4, LineLevel::Low).await.unwrap();
        assert_eq!(level, LineLevel::High);
        assert_eq!(line.n(), 1);
    }

    #[tokio::test]
    async fn wait_elapsed_or_edge_runs_the_full_window_without_edge() {
        let mut line = stream(vec![LO; 10]);
        line.next_sample().await.unwrap();
        let level = line.wait_elapsed_or_edge(4, LineLevel::Low).await.unwrap();
        assert_eq!(level, LineLevel::Low);
        assert_eq!(line.n(), 5);
    }

    #[tokio::test]
    async fn wait_idle_restarts_on_edges() {
        // Two short LOW runs broken by HIGH, then a clean run of 4.
        let mut samples = vec![LO, LO, HI, LO, HI];
        samples.extend([LO; 6]);
        let mut line = stream(samples);
        assert_eq!(line.wait_idle(4).await.unwrap(), LineLevel::Low);
        // 6 samples of churn, then 4 consecutive LOW.
        assert_eq!(line.n(), 10);
    }

    #[tokio::test]
    async fn wait_until_skips_garbage() {
        let mut line = stream(vec![0x00, 0x17, 0xa5, HI, LO]);
        assert_eq!(line.wait_until(LineLevel::High).await.unwrap(), LineLevel::High);
        assert_eq!(line.n(), 4);
    }

    #[tokio::test]
    async fn custom_levels_apply() {
        let config = DecoderConfig::default().with_levels(0x01, 0x00);
        let mut line = stream_with(vec![0x00, 0x01], config);
        assert_eq!(line.next_sample().await.unwrap(), LineLevel::Low);
        assert_eq!(line.next_sample().await.unwrap(), LineLevel::High);
    }

    #[tokio::test]
    async fn tracing_records_observed_samples() {
        let config = DecoderConfig::default().with_trace_depth(8);
        let mut line = stream_with(vec![HI, LO, HI], config);
        line.next_sample().await.unwrap();
        line.annotate("S");
        line.next_sample().await.unwrap();
        line.next_sample().await.unwrap();

        let snapshot = line.trace_snapshot().unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].annotation.as_deref(), Some("S"));
        assert_eq!(crate::trace::render(&snapshot), "[+[S].+]");
    }

    #[tokio::test]
    async fn tracing_disabled_yields_no_snapshot() {
        let mut line = stream(vec![HI]);
        line.next_sample().await.unwrap();
        assert!(line.trace_snapshot().is_none());
    }
}
