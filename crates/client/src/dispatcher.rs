// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Decodes raw stream frames into events.
//!
//! Failures stop here. A frame that cannot be decoded is logged and
//! counted, and the connection never hears about it.

use parley_core::{DecodeError, Event};
use tracing::{debug, warn};

/// Running totals of decode outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub decoded: u64,
    pub malformed: u64,
    pub unknown: u64,
}

impl DispatchStats {
    /// Frames that were discarded.
    pub fn discarded(&self) -> u64 {
        self.malformed + self.unknown
    }
}

/// Turns frames into [`Event`]s.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    stats: DispatchStats,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one frame.
    ///
    /// Failures are logged and counted before being returned.
    pub fn handle(&mut self, raw: &str) -> Result<Event, DecodeError> {
        match Event::decode(raw) {
            Ok(event) => {
                self.stats.decoded += 1;
                debug!(
                    "decoded {} for question {}",
                    event.kind(),
                    event.question_id()
                );
                Ok(event)
            }
            Err(e) => {
                match &e {
                    DecodeError::Malformed(_) => self.stats.malformed += 1,
                    DecodeError::UnknownType(_) => self.stats.unknown += 1,
                }
                warn!("discarding frame: {}", e);
                Err(e)
            }
        }
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
