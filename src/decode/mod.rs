//! The decode pipeline: symbol recognition, frame decoding and telegram
//! assembly.
//!
//! [`Decoder`] owns the line stream and runs the main loop: wait for the
//! inter-frame gap, read one frame, pair master frames with their expected
//! slave responses per the F-code table, and emit [`Event`]s on the outbound
//! channel. Decode failures become error events and re-synchronisation
//! restarts at idle detection; end of input ends the loop and closes the
//! channel.

pub mod crc;
mod framing;
mod symbols;


use std::mem;

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::input::{LineStream, SampleReader};
use crate::types::{ErrorEvent, Event, MasterFrame, Telegram, FRAME_GAP_SAMPLES};

use self::framing::Frame;

/// Assembly state: at most one master frame is pending at a time.
enum State {
    Idle,
    AwaitSlave(MasterFrame),
}

/// The decoding side of the pipeline. Owns all decoder state; runs on a
/// single task.
pub struct Decoder {
    line: LineStream,
    strict_crc: bool,
}

impl Decoder {
    pub fn new(reader: SampleReader, config: &DecoderConfig) -> Self {
        Self { line: LineStream::new(reader, config), strict_crc: config.strict_crc }
    }

    /// Current sample position.
    pub fn n(&self) -> u64 {
        self.line.n()
    }

    /// Runs the telegram assembly loop until the input ends or the event
    /// receiver is dropped. Dropping the sender on return closes the event
    /// channel, which is how consumers observe shutdown.
    pub async fn run(mut self, events: mpsc::Sender<Event>) {
        let mut state = State::Idle;
        let mut telegrams = 0u64;
        let mut faults = 0u64;
        debug!(strict_crc = self.strict_crc, "decoder loop started");

        loop {
            if let Err(error) = self.line.wait_idle(FRAME_GAP_SAMPLES).await {
                self.finish(state, error, telegrams, faults, &events).await;
                return;
            }

            let expected = match &state {
                State::AwaitSlave(master) => Some(master.descriptor()),
                State::Idle => None,
            };

            match self.read_frame(expected).await {
                Ok(Frame::Master(master)) => {
                    if let State::AwaitSlave(pending) = mem::replace(&mut state, State::Idle) {
                        // The expected slave never arrived; the new master
                        // supersedes the pending one.
                        faults += 1;
                        if !self.emit(&events, self.missing_slave(&pending)).await {
                            return;
                        }
                    }
                    if master.descriptor().expects_slave() {
                        state = State::AwaitSlave(master);
                    } else {
                        telegrams += 1;
                        trace!(n = self.n(), %master, "telegram without slave");
                        let telegram = Telegram { n: self.n(), master, slave: None };
                        if !self.emit(&events, Event::Telegram(telegram)).await {
                            return;
                        }
                    }
                }
                Ok(Frame::Slave(slave)) => {
                    match mem::replace(&mut state, State::Idle) {
                        State::AwaitSlave(master) => {
                            telegrams += 1;
                            trace!(n = self.n(), %master, slave_len = slave.len(), "telegram");
                            let telegram =
                                Telegram { n: self.n(), master, slave: Some(slave) };
                            if !self.emit(&events, Event::Telegram(telegram)).await {
                                return;
                            }
                        }
                        // read_frame rejects slave frames with no pending
                        // master, so this arm is defensive.
                        State::Idle => {
                            faults += 1;
                            let event = self.fault(DecodeError::UnexpectedSlaveFrame);
                            if !self.emit(&events, event).await {
                                return;
                            }
                        }
                    }
                }
                Err(error) if error.is_end_of_input() => {
                    self.finish(state, error, telegrams, faults, &events).await;
                    return;
                }
                Err(error) => {
                    faults += 1;
                    debug!(n = self.n(), %error, "frame decode failed");
                    // The pending master is kept: a late slave may still
                    // pair with it after re-synchronisation.
                    if !self.emit(&events, self.fault(error)).await {
                        return;
                    }
                }
            }
        }
    }

    /// Flushes a pending master and logs the shutdown reason.
    async fn finish(
        &self,
        state: State,
        error: DecodeError,
        telegrams: u64,
        faults: u64,
        events: &mpsc::Sender<Event>,
    ) {
        if let State::AwaitSlave(pending) = state {
            let _ = events.send(self.missing_slave(&pending)).await;
        }
        match error {
            DecodeError::InputEof => {
                info!(telegrams, faults, n = self.n(), "input stream ended")
            }
            error => info!(telegrams, faults, n = self.n(), %error, "input stream failed"),
        }
    }

    fn fault(&self, error: DecodeError) -> Event {
        Event::Error(ErrorEvent { n: self.n(), error, trace: self.line.trace_snapshot() })
    }

    fn missing_slave(&self, master: &MasterFrame) -> Event {
        self.fault(DecodeError::MissingSlaveResponse {
            fcode: master.fcode,
            address: master.address,
        })
    }

    async fn emit(&self, events: &mpsc::Sender<Event>, event: Event) -> bool {
        if events.send(event).await.is_err() {
            debug!("event receiver dropped, shutting down");
            return false;
        }
        true
    }
}
