//! The event stream handed to consumers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::trace::TraceSample;

use super::frame::Telegram;
use super::timing::sample_timestamp;

/// A decode failure surfaced to consumers.
///
/// Produced once per failure; the decoder never retries, it re-synchronises on
/// the next inter-frame idle period instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Sample index at which the failure was detected.
    pub n: u64,
    pub error: DecodeError,
    /// Snapshot of the annotation ring at the time of failure, when tracing
    /// is enabled.
    pub trace: Option<Vec<TraceSample>>,
}

/// One item of the decoder's output stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Telegram(Telegram),
    Error(ErrorEvent),
}

impl Event {
    /// Sample index the event is stamped with. Non-decreasing across the
    /// stream produced by one decoder.
    pub fn n(&self) -> u64 {
        match self {
            Event::Telegram(telegram) => telegram.n,
            Event::Error(event) => event.n,
        }
    }

    /// Capture-relative time of the event.
    pub fn timestamp(&self) -> Duration {
        sample_timestamp(self.n())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Event::Error(_))
    }

    /// The telegram, if this is a telegram event.
    pub fn as_telegram(&self) -> Option<&Telegram> {
        match self {
            Event::Telegram(telegram) => Some(telegram),
            Event::Error(_) => None,
        }
    }
}
