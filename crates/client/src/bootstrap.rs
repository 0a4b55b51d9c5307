// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot/stream race handling.
//!
//! The stream is opened before the snapshot is requested. Until the
//! snapshot lands, every decoded event is held back in arrival order.
//! Completion seeds the store from the snapshot, replays the held events
//! on top, and switches to direct application. Because every store
//! mutation is idempotent, overlap between the two sources is harmless.

use parley_core::protocol::QuestionRecord;
use parley_core::{Event, Merge, Question, StateStore};
use tracing::{debug, info, warn};

#[derive(Debug)]
enum Phase {
    Buffering(Vec<Event>),
    Live,
}

/// What [`Bootstrapper::route`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// Held until the snapshot arrives.
    Buffered,
    /// Applied and changed the store.
    Applied,
    /// Applied but the store already reflected it.
    Ignored,
}

/// Outcome of finishing the bootstrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Questions inserted from the snapshot.
    pub seeded: usize,
    /// Buffered events replayed.
    pub replayed: usize,
    /// Replayed events that changed the store.
    pub applied: usize,
}

/// Routes events to the store, buffering until the snapshot is merged.
#[derive(Debug)]
pub struct Bootstrapper {
    phase: Phase,
}

impl Default for Bootstrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Bootstrapper {
    pub fn new() -> Self {
        Bootstrapper {
            phase: Phase::Buffering(Vec::new()),
        }
    }

    /// True once events go straight to the store.
    pub fn is_live(&self) -> bool {
        matches!(self.phase, Phase::Live)
    }

    /// Number of events waiting for the snapshot.
    pub fn buffered(&self) -> usize {
        match &self.phase {
            Phase::Buffering(events) => events.len(),
            Phase::Live => 0,
        }
    }

    pub fn route(&mut self, event: Event, store: &mut StateStore) -> Routed {
        match &mut self.phase {
            Phase::Buffering(events) => {
                debug!("buffering {} until snapshot arrives", event.kind());
                events.push(event);
                Routed::Buffered
            }
            Phase::Live => {
                if store.apply(event) {
                    Routed::Applied
                } else {
                    Routed::Ignored
                }
            }
        }
    }

    /// Seed the store from the snapshot, then replay the buffer in order.
    pub fn complete(&mut self, snapshot: Vec<Question>, store: &mut StateStore) -> BootstrapReport {
        let seeded = store.merge_snapshot(snapshot);
        let mut report = self.replay(store);
        report.seeded = seeded;
        info!(
            "bootstrap complete: {} from snapshot, {} buffered events replayed",
            report.seeded, report.replayed
        );
        report
    }

    /// Go live without a snapshot.
    ///
    /// Used when the snapshot fetch fails. The buffered events are still
    /// replayed so nothing the stream delivered is lost.
    pub fn abandon(&mut self, store: &mut StateStore) -> BootstrapReport {
        let report = self.replay(store);
        debug!("bootstrap abandoned, {} buffered events replayed", report.replayed);
        report
    }

    fn replay(&mut self, store: &mut StateStore) -> BootstrapReport {
        let events = match std::mem::replace(&mut self.phase, Phase::Live) {
            Phase::Buffering(events) => events,
            Phase::Live => Vec::new(),
        };
        let replayed = events.len();
        let applied = store.apply_all(events);
        BootstrapReport {
            seeded: 0,
            replayed,
            applied,
        }
    }
}

/// Converts snapshot records, skipping any that fail validation.
pub fn valid_questions(records: Vec<QuestionRecord>) -> Vec<Question> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id;
            match record.into_question() {
                Ok(question) => Some(question),
                Err(e) => {
                    warn!("skipping invalid snapshot record {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
