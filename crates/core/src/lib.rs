// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! parley-core: Shared library for the parley Q&A client
//!
//! This crate provides the data model, wire protocol, event decoding,
//! display ordering and the in-memory state store used by the `parley`
//! sync engine. It has no I/O and no async runtime.

pub mod error;
pub mod event;
pub mod merge;
pub mod ordering;
pub mod protocol;
pub mod question;
pub mod store;

pub use error::{Error, Result};
pub use event::{DecodeError, Event};
pub use merge::Merge;
pub use protocol::{QuestionRecord, ServerMessage};
pub use question::{validate_question_text, Answer, Question, QuestionId, Status, MAX_QUESTION_LEN};
pub use store::{StateStore, StatusCounts};
