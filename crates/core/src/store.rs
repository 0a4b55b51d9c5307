// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory question store.
//!
//! The store holds every known question in insertion order and exposes three
//! idempotent mutations. It never persists anything: a session builds one
//! from the snapshot and drops it on exit.
//!
//! Merge rules:
//! - Question created: first write wins (later copies are ignored, including
//!   snapshot records for questions the stream already delivered)
//! - Answer added: appended if the question exists, otherwise ignored
//! - Status changed: set if the question exists, otherwise ignored

use std::collections::HashMap;

use crate::ordering;
use crate::question::{Answer, Question, QuestionId, Status};

/// Canonical in-memory collection of questions.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    /// Questions in insertion order. Never shrinks.
    questions: Vec<Question>,
    /// Position of each question in `questions`.
    index: HashMap<QuestionId, usize>,
}

/// Number of questions per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub escalated: usize,
    pub answered: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.escalated + self.answered
    }
}

impl StateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a question unless one with the same id is already present.
    ///
    /// Returns true if the question was inserted.
    pub fn apply_question_created(&mut self, question: Question) -> bool {
        let id = question.id();
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id, self.questions.len());
        self.questions.push(question);
        true
    }

    /// Appends an answer to an existing question.
    ///
    /// Answers are not deduplicated by content. Returns false if the
    /// question is unknown.
    pub fn apply_answer_added(&mut self, question_id: QuestionId, answer: Answer) -> bool {
        match self.get_mut(question_id) {
            Some(question) => {
                question.push_answer(answer);
                true
            }
            None => false,
        }
    }

    /// Sets the status of an existing question.
    ///
    /// Returns true if the status changed. Never creates a question.
    pub fn apply_status_changed(&mut self, question_id: QuestionId, status: Status) -> bool {
        self.get_mut(question_id)
            .is_some_and(|question| question.set_status(status))
    }

    /// Seeds the store from a bulk listing through the create path.
    ///
    /// Returns the number of questions inserted.
    pub fn merge_snapshot(&mut self, questions: impl IntoIterator<Item = Question>) -> usize {
        let mut inserted = 0;
        for question in questions {
            if self.apply_question_created(question) {
                inserted += 1;
            }
        }
        inserted
    }

    /// Returns all questions in display order.
    pub fn snapshot(&self) -> Vec<Question> {
        let mut view = self.questions.clone();
        ordering::sort(&mut view);
        view
    }

    pub fn get(&self, question_id: QuestionId) -> Option<&Question> {
        self.index
            .get(&question_id)
            .and_then(|&i| self.questions.get(i))
    }

    fn get_mut(&mut self, question_id: QuestionId) -> Option<&mut Question> {
        let i = *self.index.get(&question_id)?;
        self.questions.get_mut(i)
    }

    pub fn contains(&self, question_id: QuestionId) -> bool {
        self.index.contains_key(&question_id)
    }

    /// Iterates questions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Counts questions by status.
    pub fn counts(&self) -> StatusCounts {
        self.questions
            .iter()
            .fold(StatusCounts::default(), |mut counts, q| {
                match q.status() {
                    Status::Pending => counts.pending += 1,
                    Status::Escalated => counts.escalated += 1,
                    Status::Answered => counts.answered += 1,
                }
                counts
            })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
