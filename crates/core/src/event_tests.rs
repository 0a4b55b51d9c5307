// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn decode_new_question() {
    let raw = r#"{"type":"new_question","id":5,"message":"Is it down?","timestamp":"2025-01-01T00:00:00Z","status":"Pending","answers":[]}"#;
    let event = Event::decode(raw).unwrap();
    match event {
        Event::QuestionCreated(q) => {
            assert_eq!(q.id(), QuestionId(5));
            assert_eq!(q.text(), "Is it down?");
            assert_eq!(q.status(), Status::Pending);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn decode_new_answer() {
    let event = Event::decode(r#"{"type":"new_answer","id":1,"content":"try restarting"}"#).unwrap();
    assert_eq!(
        event,
        Event::AnswerAdded {
            question_id: QuestionId(1),
            answer: Answer::new("try restarting").unwrap(),
        }
    );
    assert_eq!(event.kind(), "answer_added");
}

#[test]
fn decode_question_updated() {
    let event = Event::decode(r#"{"type":"question_updated","id":1,"status":"Escalated"}"#).unwrap();
    assert_eq!(
        event,
        Event::QuestionStatusChanged {
            question_id: QuestionId(1),
            status: Status::Escalated,
        }
    );
    assert_eq!(event.question_id(), QuestionId(1));
}

#[parameterized(
    not_json = { "not json at all" },
    truncated = { r#"{"type":"new_answer","id":1"# },
    no_type = { r#"{"id":1,"content":"x"}"# },
    numeric_type = { r#"{"type":3,"id":1}"# },
    scalar = { "42" },
    missing_field = { r#"{"type":"new_answer","id":1}"# },
    bad_status = { r#"{"type":"question_updated","id":1,"status":"Closed"}"# },
    blank_answer = { r#"{"type":"new_answer","id":1,"content":"   "}"# },
    blank_question = { r#"{"type":"new_question","id":2,"message":"","timestamp":"2025-01-01T00:00:00Z"}"# },
)]
fn decode_malformed(raw: &str) {
    assert!(matches!(Event::decode(raw), Err(DecodeError::Malformed(_))));
}

#[parameterized(
    heartbeat = { r#"{"type":"heartbeat"}"#, "heartbeat" },
    camel = { r#"{"type":"newQuestion","id":1}"#, "newQuestion" },
    empty = { r#"{"type":""}"#, "" },
)]
fn decode_unknown_type(raw: &str, expected: &str) {
    assert_eq!(
        Event::decode(raw),
        Err(DecodeError::UnknownType(expected.to_string()))
    );
}

#[test]
fn decode_error_display() {
    let err = DecodeError::UnknownType("heartbeat".to_string());
    assert!(err.to_string().contains("heartbeat"));
    let err = DecodeError::Malformed("eof".to_string());
    assert!(err.to_string().contains("malformed"));
}
