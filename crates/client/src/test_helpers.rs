// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers: a scripted transport and a fake snapshot source.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use parley_core::protocol::QuestionRecord;
use parley_core::{QuestionId, ServerMessage, Status};
use tokio::sync::Notify;

use crate::api::{ApiError, SnapshotFuture, SnapshotSource};
use crate::connection::ConnectionConfig;
use crate::transport::{Frame, Transport, TransportError, TransportFuture, TransportResult};

/// Mock transport for testing without real sockets.
///
/// Clones share state, so a test keeps one handle while the manager owns
/// another. `recv` waits when no frames are queued, like an idle socket.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    frames_ready: Arc<Notify>,
    drained: Arc<Notify>,
}

#[derive(Default)]
struct MockState {
    connected: bool,
    /// Scripted connect outcomes. Empty means success.
    connect_results: VecDeque<TransportResult<()>>,
    /// Fail every connect once the script runs out.
    refuse_connections: bool,
    frames: VecDeque<TransportResult<Frame>>,
    connect_calls: u32,
    disconnect_calls: u32,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw text frame.
    pub fn push_text(&self, text: impl Into<String>) {
        self.push(Ok(Frame::Text(text.into())));
    }

    /// Queue a server message as a text frame.
    pub fn push_message(&self, msg: &ServerMessage) {
        self.push_text(msg.to_json().unwrap());
    }

    /// Queue a close from the peer.
    pub fn push_close(&self, code: Option<u16>) {
        self.push(Ok(Frame::Closed { code }));
    }

    /// Queue a receive error.
    pub fn push_error(&self, message: &str) {
        self.push(Err(TransportError::ReceiveFailed(message.to_string())));
    }

    fn push(&self, frame: TransportResult<Frame>) {
        self.state.lock().unwrap().frames.push_back(frame);
        self.frames_ready.notify_one();
    }

    /// Script the outcome of the next connect call.
    pub fn push_connect_failure(&self, message: &str) {
        self.state
            .lock()
            .unwrap()
            .connect_results
            .push_back(Err(TransportError::ConnectionFailed(message.to_string())));
    }

    /// Make every unscripted connect fail.
    pub fn refuse_connections(&self, refuse: bool) {
        self.state.lock().unwrap().refuse_connections = refuse;
    }

    pub fn connect_calls(&self) -> u32 {
        self.state.lock().unwrap().connect_calls
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    pub fn disconnect_calls(&self) -> u32 {
        self.state.lock().unwrap().disconnect_calls
    }

    /// Notified whenever `recv` finds the frame queue empty.
    pub fn drained_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.drained)
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, _url: &str) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.connect_calls += 1;
            let result = match state.connect_results.pop_front() {
                Some(result) => result,
                None if state.refuse_connections => {
                    Err(TransportError::ConnectionFailed("refused".to_string()))
                }
                None => Ok(()),
            };
            state.connected = result.is_ok();
            result
        })
    }

    fn disconnect(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.connected = false;
            state.disconnect_calls += 1;
            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Frame> {
        Box::pin(async move {
            loop {
                let next = self.state.lock().unwrap().frames.pop_front();
                match next {
                    Some(Ok(frame)) => {
                        if matches!(frame, Frame::Closed { .. }) {
                            self.state.lock().unwrap().connected = false;
                        }
                        return Ok(frame);
                    }
                    Some(Err(e)) => {
                        self.state.lock().unwrap().connected = false;
                        return Err(e);
                    }
                    None => {
                        self.drained.notify_one();
                        self.frames_ready.notified().await;
                    }
                }
            }
        })
    }
}

/// Snapshot source with a canned response.
pub struct FakeSnapshot {
    response: Mutex<Option<Result<Vec<QuestionRecord>, ApiError>>>,
    gate: Option<Arc<Notify>>,
    delay: Option<Duration>,
    calls: Mutex<u32>,
    stream: Option<MockTransport>,
    stream_connected: Mutex<Option<bool>>,
}

impl FakeSnapshot {
    pub fn ok(records: Vec<QuestionRecord>) -> Self {
        Self::respond(Ok(records))
    }

    pub fn failing(status: u16) -> Self {
        Self::respond(Err(ApiError::Status {
            status,
            detail: "unavailable".to_string(),
        }))
    }

    fn respond(response: Result<Vec<QuestionRecord>, ApiError>) -> Self {
        FakeSnapshot {
            response: Mutex::new(Some(response)),
            gate: None,
            delay: None,
            calls: Mutex::new(0),
            stream: None,
            stream_connected: Mutex::new(None),
        }
    }

    /// Resolve only after `gate` is notified.
    pub fn after(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Resolve only after sleeping.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Note whether `stream` is connected when the fetch starts.
    pub fn observing(mut self, stream: &MockTransport) -> Self {
        self.stream = Some(stream.clone());
        self
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }

    /// Stream state seen by the most recent fetch, if observing.
    pub fn stream_connected_at_fetch(&self) -> Option<bool> {
        *self.stream_connected.lock().unwrap()
    }
}

impl SnapshotSource for FakeSnapshot {
    fn fetch_snapshot(&self) -> SnapshotFuture<'_> {
        Box::pin(async move {
            *self.calls.lock().unwrap() += 1;
            if let Some(stream) = &self.stream {
                *self.stream_connected.lock().unwrap() = Some(stream.is_connected());
            }
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        })
    }
}

/// Build a question record.
pub fn record(id: u64, secs: i64, status: Status, answers: &[&str]) -> QuestionRecord {
    QuestionRecord {
        id: QuestionId(id),
        message: format!("question {}", id),
        timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
        status,
        escalated: false,
        answers: answers.iter().map(|a| a.to_string()).collect(),
    }
}

/// Connection config with no retry delay.
pub fn fast_config(max_attempts: u32) -> ConnectionConfig {
    ConnectionConfig {
        url: "ws://localhost:1/ws".to_string(),
        retry_delay: Duration::from_millis(1),
        max_attempts,
    }
}
