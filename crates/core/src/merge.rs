// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Merge change events into store state.
//!
//! Every event maps onto exactly one named store operation, so replaying
//! an event (duplicate delivery, snapshot overlap, a call result racing its
//! own broadcast) never changes state twice. Question identity is the only
//! thing deduplicated.

use crate::event::Event;
use crate::store::StateStore;

/// Trait for applying change events idempotently.
pub trait Merge {
    /// Applies an event.
    ///
    /// Returns true if state changed, false if the event was a no-op
    /// (duplicate create, unknown question, unchanged status).
    fn apply(&mut self, event: Event) -> bool;

    /// Applies multiple events in order.
    ///
    /// Returns the number of events that changed state.
    fn apply_all<I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = Event>,
        Self: Sized,
    {
        let mut applied = 0;
        for event in events {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }
}

impl Merge for StateStore {
    fn apply(&mut self, event: Event) -> bool {
        match event {
            Event::QuestionCreated(question) => self.apply_question_created(question),
            Event::AnswerAdded {
                question_id,
                answer,
            } => self.apply_answer_added(question_id, answer),
            Event::QuestionStatusChanged {
                question_id,
                status,
            } => self.apply_status_changed(question_id, status),
        }
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
