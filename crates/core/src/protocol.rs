// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire formats shared by the HTTP API and the live stream.
//!
//! The stream is one-way:
//! - Server pushes change notifications tagged by `type`
//! - Clients publish through separate request/response calls

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::question::{Answer, Question, QuestionId, Status};

/// A question as the server serializes it, in listings and call results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionRecord {
    /// Server-assigned identity. Older servers call this `question_id`.
    #[serde(alias = "question_id")]
    pub id: QuestionId,

    /// The question text.
    pub message: String,

    /// Creation time. Naive timestamps are read as UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,

    #[serde(default = "default_status")]
    pub status: Status,

    /// Legacy escalation flag carried alongside `status`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub escalated: bool,

    /// Answer texts in arrival order.
    #[serde(default)]
    pub answers: Vec<String>,
}

fn default_status() -> Status {
    Status::Pending
}

impl QuestionRecord {
    /// Builds the wire record for a question.
    pub fn from_question(question: &Question) -> Self {
        QuestionRecord {
            id: question.id(),
            message: question.text().to_string(),
            timestamp: question.created_at(),
            status: question.status(),
            escalated: false,
            answers: question
                .answers()
                .iter()
                .map(|a| a.content().to_string())
                .collect(),
        }
    }

    /// Returns the status after folding in the legacy escalation flag.
    pub fn effective_status(&self) -> Status {
        if self.escalated && self.status == Status::Pending {
            Status::Escalated
        } else {
            self.status
        }
    }

    /// Validates the record and converts it into a [`Question`].
    pub fn into_question(self) -> Result<Question> {
        let status = self.effective_status();
        let answers = self
            .answers
            .into_iter()
            .map(Answer::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Question::new(self.id, self.message, self.timestamp)?
            .with_status(status)
            .with_answers(answers))
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = Error;

    fn try_from(record: QuestionRecord) -> Result<Self> {
        record.into_question()
    }
}

/// Messages pushed from server to client over the live stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A question was submitted.
    NewQuestion(QuestionRecord),

    /// A responder answered a question.
    NewAnswer {
        /// The question being answered.
        #[serde(alias = "question_id")]
        id: QuestionId,
        /// The answer text.
        content: String,
    },

    /// A question's status changed.
    QuestionUpdated {
        /// The question being updated.
        #[serde(alias = "question_id")]
        id: QuestionId,
        /// The new status.
        status: Status,
    },
}

impl ServerMessage {
    /// Every `type` discriminant the stream may carry.
    pub const KNOWN_TYPES: [&'static str; 3] = ["new_question", "new_answer", "question_updated"];

    /// Creates a NewQuestion message.
    pub fn new_question(record: QuestionRecord) -> Self {
        ServerMessage::NewQuestion(record)
    }

    /// Creates a NewAnswer message.
    pub fn new_answer(id: QuestionId, content: impl Into<String>) -> Self {
        ServerMessage::NewAnswer {
            id,
            content: content.into(),
        }
    }

    /// Creates a QuestionUpdated message.
    pub fn question_updated(id: QuestionId, status: Status) -> Self {
        ServerMessage::QuestionUpdated { id, status }
    }

    /// Returns the `type` discriminant of this message.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::NewQuestion(_) => "new_question",
            ServerMessage::NewAnswer { .. } => "new_answer",
            ServerMessage::QuestionUpdated { .. } => "question_updated",
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Parses an RFC 3339 timestamp, or a naive ISO 8601 one assumed to be UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: '{}'", s)))
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
