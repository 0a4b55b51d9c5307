// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    invalid_input = { Error::InvalidInput("question cannot be blank".into()), "blank" },
    invalid_status = { Error::InvalidStatus("closed".into()), "closed" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn invalid_status_lists_valid_values() {
    let msg = Error::InvalidStatus("done".into()).to_string();
    assert!(msg.contains("pending"));
    assert!(msg.contains("escalated"));
    assert!(msg.contains("answered"));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
