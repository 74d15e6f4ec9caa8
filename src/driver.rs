//! Driver spawns and manages the decoding tasks.

use std::io::Read;

use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::DecoderConfig;
use crate::decode::Decoder;
use crate::input::SampleReader;
use crate::types::Event;

/// Result of spawning the decoder tasks.
pub struct DecoderChannels {
    /// Receiver for decoded events. Closes when the input ends.
    pub events: mpsc::Receiver<Event>,
    /// Cancellation token for early shutdown; EOF on the byte source is the
    /// normal termination signal.
    pub cancel: CancellationToken,
}

impl DecoderChannels {
    /// Adapts the event receiver into a `Stream` for combinator-style
    /// consumers.
    pub fn into_stream(self) -> impl Stream<Item = Event> {
        ReceiverStream::new(self.events)
    }
}

/// Driver spawns and manages the decoding tasks.
///
/// Two tasks are started: the blocking I/O filler (inside
/// [`SampleReader::spawn`]) and the decoder task running the telegram
/// assembly loop. Backpressure from a slow event consumer blocks the decoder
/// and, once the sample blocks fill up, the filler.
pub struct Driver;

impl Driver {
    /// Spawns the pipeline over a blocking byte source. Must be called
    /// within a Tokio runtime.
    pub fn spawn<R>(source: R, config: DecoderConfig) -> DecoderChannels
    where
        R: Read + Send + 'static,
    {
        let (event_tx, event_rx) = mpsc::channel(config.event_capacity);
        let cancel = CancellationToken::new();
        let cancel_decoder = cancel.clone();

        let decoder = Decoder::new(SampleReader::spawn(source), &config);

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel_decoder.cancelled() => {
                    info!("decoder cancelled");
                }
                _ = decoder.run(event_tx) => {}
            }
        });

        DecoderChannels { events: event_rx, cancel }
    }
}
