// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::ordering;
use crate::question::{Answer, Question, QuestionId, Status};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

fn created(id: u64, secs: i64) -> Event {
    Event::QuestionCreated(
        Question::new(
            QuestionId(id),
            format!("question {}", id),
            Utc.timestamp_opt(secs, 0).unwrap(),
        )
        .unwrap(),
    )
}

fn answered(id: u64, text: &str) -> Event {
    Event::AnswerAdded {
        question_id: QuestionId(id),
        answer: Answer::new(text).unwrap(),
    }
}

fn status(id: u64, status: Status) -> Event {
    Event::QuestionStatusChanged {
        question_id: QuestionId(id),
        status,
    }
}

#[test]
fn merge_routes_each_event() {
    let mut store = StateStore::new();

    assert!(store.apply(created(1, 100)));
    assert!(store.apply(answered(1, "try restarting")));
    assert!(store.apply(status(1, Status::Escalated)));

    let q = store.get(QuestionId(1)).unwrap();
    assert_eq!(q.status(), Status::Escalated);
    assert_eq!(q.answers()[0].content(), "try restarting");
}

#[test]
fn merge_duplicate_create_is_noop() {
    let mut store = StateStore::new();
    assert!(store.apply(created(1, 100)));
    assert!(!store.apply(created(1, 100)));
}

#[test]
fn merge_events_for_unknown_questions_are_noops() {
    let mut store = StateStore::new();
    assert!(!store.apply(answered(3, "orphan")));
    assert!(!store.apply(status(3, Status::Answered)));
    assert!(store.is_empty());
}

#[test]
fn apply_all_counts_effective_events() {
    let mut store = StateStore::new();
    let applied = store.apply_all(vec![
        created(1, 100),
        created(1, 100),
        answered(1, "x"),
        answered(2, "y"),
        status(1, Status::Pending),
        status(1, Status::Answered),
    ]);
    assert_eq!(applied, 3);
}

fn arb_status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Pending),
        Just(Status::Escalated),
        Just(Status::Answered),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        (0u64..8, 0i64..50).prop_map(|(id, secs)| created(id, secs)),
        (0u64..8, "[a-z]{1,6}").prop_map(|(id, text)| answered(id, &text)),
        (0u64..8, arb_status()).prop_map(|(id, s)| status(id, s)),
    ]
}

proptest! {
    #[test]
    fn snapshot_orders_escalated_first_then_newest(events in prop::collection::vec(arb_event(), 0..60)) {
        let mut store = StateStore::new();
        store.apply_all(events);

        let view = store.snapshot();
        for pair in view.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(ordering::tier(a.status()) <= ordering::tier(b.status()));
            if ordering::tier(a.status()) == ordering::tier(b.status()) {
                prop_assert!(a.created_at() >= b.created_at());
            }
        }
        prop_assert_eq!(view.len(), store.len());
    }

    #[test]
    fn replaying_all_events_is_idempotent_for_creates(events in prop::collection::vec(arb_event(), 0..40)) {
        let creates: Vec<Event> = events
            .into_iter()
            .filter(|e| matches!(e, Event::QuestionCreated(_)))
            .collect();

        let mut once = StateStore::new();
        once.apply_all(creates.clone());

        let mut twice = StateStore::new();
        twice.apply_all(creates.clone());
        twice.apply_all(creates);

        prop_assert_eq!(once.snapshot(), twice.snapshot());
    }

    #[test]
    fn answers_never_outlive_their_question(events in prop::collection::vec(arb_event(), 0..60)) {
        let mut store = StateStore::new();
        let mut expected_answers = 0usize;
        for event in events {
            let counts_answer = matches!(&event, Event::AnswerAdded { question_id, .. } if store.contains(*question_id));
            store.apply(event);
            if counts_answer {
                expected_answers += 1;
            }
        }

        let stored: usize = store.iter().map(|q| q.answers().len()).sum();
        prop_assert_eq!(stored, expected_answers);
    }
}
