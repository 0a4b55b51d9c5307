// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Display ordering for questions.
//!
//! Escalated questions come first. Within a tier, newer questions come
//! first. Equal timestamps keep their relative input order, so callers
//! that pass questions in insertion order get a deterministic view.

use std::cmp::Ordering;

use crate::question::{Question, Status};

/// Returns the display tier of a status. Lower tiers are shown first.
pub fn tier(status: Status) -> u8 {
    match status {
        Status::Escalated => 0,
        Status::Pending | Status::Answered => 1,
    }
}

/// Total order over questions for display.
pub fn compare(a: &Question, b: &Question) -> Ordering {
    tier(a.status())
        .cmp(&tier(b.status()))
        .then_with(|| b.created_at().cmp(&a.created_at()))
}

/// Sorts questions for display. The sort is stable.
pub fn sort(questions: &mut [Question]) {
    questions.sort_by(compare);
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod tests;
