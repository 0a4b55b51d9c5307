// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core question types for the parley forum.
//!
//! This module contains the fundamental data types: QuestionId, Status,
//! Answer, and Question.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Maximum length of a submitted question, in characters.
pub const MAX_QUESTION_LEN: usize = 500;

/// Server-assigned question identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(QuestionId)
            .map_err(|_| Error::InvalidInput(format!("invalid question id: '{}'", s)))
    }
}

impl From<u64> for QuestionId {
    fn from(id: u64) -> Self {
        QuestionId(id)
    }
}

/// Moderation status of a question.
///
/// Answered is terminal in practice, but nothing here forbids a later
/// transition out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    /// Waiting for a responder. Initial state for new questions.
    Pending,
    /// Flagged for attention; shown ahead of everything else.
    Escalated,
    /// A responder has resolved the question.
    Answered,
}

impl Status {
    /// Returns the string representation used on the wire and in display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Escalated => "Escalated",
            Status::Answered => "Answered",
        }
    }

    /// Returns true if no further status changes are expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Answered)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "escalated" => Ok(Status::Escalated),
            "answered" => Ok(Status::Answered),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

// Servers are inconsistent about casing, so accept any.
impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A single answer to a question. Content is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Answer(String);

impl Answer {
    /// Creates an answer, rejecting blank content.
    pub fn new(content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(Error::InvalidInput("answer cannot be blank".to_string()));
        }
        Ok(Answer(content))
    }

    /// Returns the answer text.
    pub fn content(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Answer {
    type Error = Error;

    fn try_from(content: String) -> Result<Self> {
        Answer::new(content)
    }
}

impl From<Answer> for String {
    fn from(answer: Answer) -> Self {
        answer.0
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A question together with the answers it owns.
///
/// `created_at` never changes after construction and `answers` only grows;
/// the store is the only code allowed to progress a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    created_at: DateTime<Utc>,
    status: Status,
    answers: Vec<Answer>,
}

impl Question {
    /// Creates a pending question with no answers.
    pub fn new(id: QuestionId, text: impl Into<String>, created_at: DateTime<Utc>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "question {} has blank text",
                id
            )));
        }
        Ok(Question {
            id,
            text,
            created_at,
            status: Status::Pending,
            answers: Vec::new(),
        })
    }

    /// Sets the initial status.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Sets the initial answers.
    pub fn with_answers(mut self, answers: Vec<Answer>) -> Self {
        self.answers = answers;
        self
    }

    pub fn id(&self) -> QuestionId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub(crate) fn push_answer(&mut self, answer: Answer) {
        self.answers.push(answer);
    }

    /// Returns true if the status actually changed.
    pub(crate) fn set_status(&mut self, status: Status) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        true
    }
}

/// Validates question text before it is submitted.
///
/// Returns the trimmed text.
pub fn validate_question_text(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(
            "question cannot be blank\n  hint: enter a question before submitting".to_string(),
        ));
    }
    let len = trimmed.chars().count();
    if len > MAX_QUESTION_LEN {
        return Err(Error::InvalidInput(format!(
            "question is too long ({} characters)\n  hint: questions are limited to {} characters",
            len, MAX_QUESTION_LEN
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
#[path = "question_tests.rs"]
mod tests;
