// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection lifecycle for the live stream.
//!
//! The manager owns one transport and drives it through
//! `Idle → Connecting → Open → Reconnecting → … → Closed`. It is pulled,
//! not pushed: each call to [`ConnectionManager::next_event`] advances the
//! state machine until it has something to report. The reconnect deadline
//! is set when the connection fails and survives dropped `next_event`
//! futures. Cancelling the token or closing clears it.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::transport::{Frame, Transport, TransportError, WebSocketTransport};

/// Why a connection reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// `close()` was called or the cancel token fired.
    Requested,
    /// Every reconnection attempt failed.
    BudgetExhausted,
}

/// Lifecycle state of the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not opened yet.
    Idle,
    /// A connection attempt is in progress.
    Connecting,
    /// Connected and receiving frames.
    Open,
    /// Waiting for the retry delay after a failure.
    Reconnecting,
    /// Terminal until `open()` is called again.
    Closed(CloseReason),
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Reconnecting => "reconnecting",
            ConnectionState::Closed(CloseReason::Requested) => "closed",
            ConnectionState::Closed(CloseReason::BudgetExhausted) => "offline",
        }
    }

    /// Returns true for either closed state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionState::Closed(_))
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observable connection status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    /// Consecutive failed attempts since the last successful open.
    pub attempt: u32,
    pub last_error: Option<String>,
}

impl ConnectionStatus {
    fn idle() -> Self {
        ConnectionStatus {
            state: ConnectionState::Idle,
            attempt: 0,
            last_error: None,
        }
    }

    /// True once the retry budget is spent. Stays true until `open()`.
    pub fn is_offline(&self) -> bool {
        self.state == ConnectionState::Closed(CloseReason::BudgetExhausted)
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Human-readable status for indicators.
    pub fn status_string(&self) -> String {
        match self.state {
            ConnectionState::Reconnecting | ConnectionState::Connecting if self.attempt > 0 => {
                format!("{} (attempt {})", self.state, self.attempt + 1)
            }
            ConnectionState::Closed(CloseReason::BudgetExhausted) => {
                format!("offline after {} attempts", self.attempt)
            }
            state => state.to_string(),
        }
    }
}

/// Notifications produced by the connection.
#[derive(Debug)]
pub enum ConnectionEvent {
    /// The transport connected.
    Open,
    /// A raw text frame arrived.
    Message(String),
    /// The peer closed an open connection.
    Closed { code: Option<u16> },
    /// A connection attempt failed or an open connection broke.
    TransportError(TransportError),
    /// The retry budget ran out. The connection is now terminal.
    Offline { attempts: u32 },
}

/// Configuration for the connection manager.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// URL to connect to.
    pub url: String,
    /// Fixed delay between reconnection attempts.
    pub retry_delay: Duration,
    /// Failed attempts allowed before going offline.
    pub max_attempts: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8000/ws".to_string(),
            retry_delay: Duration::from_millis(2000),
            max_attempts: 5,
        }
    }
}

/// Owns the lifecycle of one persistent connection.
pub struct ConnectionManager<T: Transport = WebSocketTransport> {
    config: ConnectionConfig,
    transport: T,
    status: watch::Sender<ConnectionStatus>,
    cancel_token: CancellationToken,
    /// Events decided but not yet handed out.
    pending: VecDeque<ConnectionEvent>,
    /// When the next reconnect attempt fires. Fixed at the time of the
    /// failure, so dropping a `next_event` future does not push it back.
    retry_at: Option<Instant>,
}

impl ConnectionManager<WebSocketTransport> {
    /// Create a manager backed by a WebSocket transport.
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_transport(config, WebSocketTransport::new())
    }
}

impl<T: Transport> ConnectionManager<T> {
    /// Create a manager with a custom transport (for testing).
    pub fn with_transport(config: ConnectionConfig, transport: T) -> Self {
        let (status, _) = watch::channel(ConnectionStatus::idle());
        Self {
            config,
            transport,
            status,
            cancel_token: CancellationToken::new(),
            pending: VecDeque::new(),
            retry_at: None,
        }
    }

    /// Current status.
    pub fn status(&self) -> ConnectionStatus {
        self.status.borrow().clone()
    }

    pub fn state(&self) -> ConnectionState {
        self.status.borrow().state
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    /// Token that closes this connection from another task.
    ///
    /// A fresh token is minted when `open()` follows a terminal close, so
    /// fetch the token after opening.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Start connecting.
    ///
    /// From a terminal state this re-enters Idle first and resets the
    /// attempt budget. Ignored while a connection is already live.
    pub fn open(&mut self) {
        match self.state() {
            ConnectionState::Idle => {}
            ConnectionState::Closed(_) => {
                self.cancel_token = CancellationToken::new();
                self.pending.clear();
                self.retry_at = None;
                self.status.send_replace(ConnectionStatus::idle());
            }
            state => {
                debug!("open() ignored, connection is {}", state);
                return;
            }
        }
        info!("connecting to {}", self.config.url);
        self.set_state(ConnectionState::Connecting);
    }

    /// Tear the connection down.
    ///
    /// Cancels any pending retry and drops undelivered events. After this
    /// returns `next_event` yields `None` until `open()` is called.
    pub async fn close(&mut self) {
        self.cancel_token.cancel();
        self.shutdown().await;
    }

    /// Advance the state machine until there is something to report.
    ///
    /// Returns `None` when the connection is idle or closed.
    pub async fn next_event(&mut self) -> Option<ConnectionEvent> {
        loop {
            if self.cancel_token.is_cancelled() {
                if !self.state().is_terminal() {
                    self.shutdown().await;
                }
                return None;
            }

            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }

            let token = self.cancel_token.clone();
            match self.state() {
                ConnectionState::Idle | ConnectionState::Closed(_) => return None,

                ConnectionState::Connecting => {
                    let result = tokio::select! {
                        _ = token.cancelled() => continue,
                        result = self.transport.connect(&self.config.url) => result,
                    };
                    return Some(match result {
                        Ok(()) => self.on_connected(),
                        Err(e) => self.on_failure(e),
                    });
                }

                ConnectionState::Open => {
                    let frame = tokio::select! {
                        _ = token.cancelled() => continue,
                        frame = self.transport.recv() => frame,
                    };
                    return Some(match frame {
                        Ok(Frame::Text(text)) => ConnectionEvent::Message(text),
                        Ok(Frame::Closed { code }) => {
                            warn!("connection closed by peer (code {:?})", code);
                            self.on_drop(None);
                            ConnectionEvent::Closed { code }
                        }
                        Err(e) => {
                            warn!("connection lost: {}", e);
                            self.on_drop(Some(e.to_string()));
                            ConnectionEvent::TransportError(e)
                        }
                    });
                }

                ConnectionState::Reconnecting => {
                    let deadline = self.retry_at.unwrap_or_else(Instant::now);
                    tokio::select! {
                        _ = token.cancelled() => continue,
                        _ = tokio::time::sleep_until(deadline) => {}
                    }
                    self.retry_at = None;
                    let attempt = self.status.borrow().attempt;
                    info!("reconnecting (attempt {})", attempt + 1);
                    self.set_state(ConnectionState::Connecting);
                }
            }
        }
    }

    fn on_connected(&mut self) -> ConnectionEvent {
        info!("connected to {}", self.config.url);
        self.status.send_modify(|s| {
            s.state = ConnectionState::Open;
            s.attempt = 0;
        });
        ConnectionEvent::Open
    }

    fn on_failure(&mut self, err: TransportError) -> ConnectionEvent {
        let message = err.to_string();
        self.status.send_modify(|s| {
            s.attempt = s.attempt.saturating_add(1);
            s.last_error = Some(message);
        });

        let attempts = self.status.borrow().attempt;
        if attempts >= self.config.max_attempts {
            self.go_offline(attempts);
        } else {
            warn!(
                "connection attempt {} of {} failed: {}",
                attempts, self.config.max_attempts, err
            );
            self.schedule_retry();
        }
        ConnectionEvent::TransportError(err)
    }

    /// Handle an unexpected loss of an open connection.
    fn on_drop(&mut self, error: Option<String>) {
        if error.is_some() {
            self.status.send_modify(|s| s.last_error = error);
        }
        let attempts = self.status.borrow().attempt;
        if attempts >= self.config.max_attempts {
            self.go_offline(attempts);
        } else {
            self.schedule_retry();
        }
    }

    fn schedule_retry(&mut self) {
        self.retry_at = Some(Instant::now() + self.config.retry_delay);
        self.set_state(ConnectionState::Reconnecting);
    }

    fn go_offline(&mut self, attempts: u32) {
        error!("giving up after {} failed connection attempts", attempts);
        self.set_state(ConnectionState::Closed(CloseReason::BudgetExhausted));
        self.pending.push_back(ConnectionEvent::Offline { attempts });
    }

    async fn shutdown(&mut self) {
        self.pending.clear();
        self.retry_at = None;
        if let Err(e) = self.transport.disconnect().await {
            debug!("disconnect failed: {}", e);
        }
        if self.state() != ConnectionState::Closed(CloseReason::Requested) {
            info!("connection closed");
            self.set_state(ConnectionState::Closed(CloseReason::Requested));
        }
    }

    fn set_state(&self, state: ConnectionState) {
        self.status.send_modify(|s| s.state = state);
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
