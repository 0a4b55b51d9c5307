// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed change events decoded from stream frames.
//!
//! Decoding is a pure `raw -> Event` step. A frame either becomes one of
//! three events or is rejected with a [`DecodeError`]; nothing else touches
//! state here.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::protocol::ServerMessage;
use crate::question::{Answer, Question, QuestionId, Status};

/// A change to the question collection.
///
/// Events carry no ordering guarantee and may be delivered more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    QuestionCreated(Question),
    AnswerAdded {
        question_id: QuestionId,
        answer: Answer,
    },
    QuestionStatusChanged {
        question_id: QuestionId,
        status: Status,
    },
}

/// Why a frame could not be turned into an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Not parseable, missing its `type`, or carrying an invalid payload.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// Well-formed, but the `type` is not one we know.
    #[error("unknown message type: '{0}'")]
    UnknownType(String),
}

impl Event {
    /// Decodes a raw stream frame.
    pub fn decode(raw: &str) -> std::result::Result<Event, DecodeError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| DecodeError::Malformed(e.to_string()))?;

        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::Malformed("missing string field `type`".to_string()))?;

        if !ServerMessage::KNOWN_TYPES.contains(&kind) {
            return Err(DecodeError::UnknownType(kind.to_string()));
        }

        let msg: ServerMessage = serde_json::from_value(value)
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;

        Event::try_from(msg).map_err(|e| DecodeError::Malformed(e.to_string()))
    }

    /// Returns the question this event concerns.
    pub fn question_id(&self) -> QuestionId {
        match self {
            Event::QuestionCreated(q) => q.id(),
            Event::AnswerAdded { question_id, .. } => *question_id,
            Event::QuestionStatusChanged { question_id, .. } => *question_id,
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::QuestionCreated(_) => "question_created",
            Event::AnswerAdded { .. } => "answer_added",
            Event::QuestionStatusChanged { .. } => "status_changed",
        }
    }
}

impl TryFrom<ServerMessage> for Event {
    type Error = Error;

    fn try_from(msg: ServerMessage) -> Result<Self> {
        match msg {
            ServerMessage::NewQuestion(record) => Ok(Event::QuestionCreated(record.into_question()?)),
            ServerMessage::NewAnswer { id, content } => Ok(Event::AnswerAdded {
                question_id: id,
                answer: Answer::new(content)?,
            }),
            ServerMessage::QuestionUpdated { id, status } => Ok(Event::QuestionStatusChanged {
                question_id: id,
                status,
            }),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
