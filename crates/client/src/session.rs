// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! A sync session: one connection, one store, one bootstrap.
//!
//! The session owns every piece of mutable state and is driven from a
//! single task. Frames flow connection → dispatcher → bootstrapper → store,
//! and the ordered view is republished after each mutation. Closing the
//! session (directly or through [`Session::close_handle`]) stops delivery
//! to the store before anything else happens.

use std::sync::Arc;
use std::time::Duration;

use parley_core::protocol::QuestionRecord;
use parley_core::{Event, Question, StateStore};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::api::{ApiClient, SnapshotSource};
use crate::bootstrap::{valid_questions, BootstrapReport, Bootstrapper, Routed};
use crate::config::Config;
use crate::connection::{ConnectionEvent, ConnectionManager, ConnectionStatus};
use crate::dispatcher::{DispatchStats, EventDispatcher};
use crate::error::{BootstrapError, Error, Result};
use crate::transport::{Transport, WebSocketTransport};

/// Ordered, read-only view of the store.
pub type View = Arc<Vec<Question>>;

/// What a single [`Session::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionUpdate {
    /// The stream connected.
    Connected,
    /// An event changed the store. The view was republished.
    Changed,
    /// An event was applied but the store already reflected it.
    Unchanged,
    /// An event was held until the snapshot lands.
    Buffered,
    /// A frame could not be decoded and was dropped.
    Discarded,
    /// The stream dropped. Reconnection is in progress.
    Disconnected,
    /// The retry budget ran out.
    Offline { attempts: u32 },
}

pub struct Session<T: Transport = WebSocketTransport, S: SnapshotSource = ApiClient> {
    connection: ConnectionManager<T>,
    dispatcher: EventDispatcher,
    bootstrapper: Bootstrapper,
    store: StateStore,
    source: Arc<S>,
    view: watch::Sender<View>,
    snapshot_timeout: Option<Duration>,
    close_token: CancellationToken,
    disposed: bool,
}

impl Session<WebSocketTransport, ApiClient> {
    /// Builds a session from configuration.
    pub fn new(config: &Config) -> Self {
        let api = ApiClient::new(config.api_url.clone()).with_credential(config.credential());
        Session::with_parts(
            ConnectionManager::new(config.connection_config()),
            Arc::new(api),
            config.snapshot_timeout(),
        )
    }
}

impl<T: Transport, S: SnapshotSource> Session<T, S> {
    pub fn with_parts(
        connection: ConnectionManager<T>,
        source: Arc<S>,
        snapshot_timeout: Option<Duration>,
    ) -> Self {
        let (view, _) = watch::channel(Arc::new(Vec::new()));
        let close_token = connection.cancel_token();
        Session {
            connection,
            dispatcher: EventDispatcher::new(),
            bootstrapper: Bootstrapper::new(),
            store: StateStore::new(),
            source,
            view,
            snapshot_timeout,
            close_token,
            disposed: false,
        }
    }

    /// Opens the stream and seeds the store from the snapshot.
    ///
    /// The snapshot is requested only once the stream is open (or has
    /// given up), so nothing emitted after the server reads its snapshot
    /// can be missed. Stream events that arrive while the snapshot is in
    /// flight are held and replayed on top of it. On failure the held
    /// events are replayed anyway and the session goes live without a
    /// snapshot; the error is returned here and nowhere else.
    pub async fn bootstrap(&mut self) -> std::result::Result<BootstrapReport, BootstrapError> {
        if self.is_disposed() {
            return Err(BootstrapError::Cancelled);
        }
        self.connection.open();

        let token = self.close_token.clone();
        let mut stream_done = false;
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    self.close().await;
                    return Err(BootstrapError::Cancelled);
                }
                event = self.connection.next_event() => match event {
                    Some(ConnectionEvent::Open) => break,
                    Some(event) => {
                        self.on_connection_event(event);
                    }
                    None => {
                        stream_done = true;
                        break;
                    }
                },
            }
        }
        if stream_done {
            debug!("stream unavailable, requesting snapshot anyway");
        } else {
            debug!("stream subscribed, requesting snapshot");
        }

        let source = Arc::clone(&self.source);
        let limit = self.snapshot_timeout;
        let fetch = async move {
            let fetched = match limit {
                Some(limit) => match tokio::time::timeout(limit, source.fetch_snapshot()).await {
                    Ok(fetched) => fetched,
                    Err(_) => return Err(BootstrapError::Timeout(limit)),
                },
                None => source.fetch_snapshot().await,
            };
            fetched.map_err(BootstrapError::from)
        };
        tokio::pin!(fetch);

        let result = loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    self.close().await;
                    return Err(BootstrapError::Cancelled);
                }
                result = &mut fetch => break result,
                event = self.connection.next_event(), if !stream_done => match event {
                    Some(event) => {
                        self.on_connection_event(event);
                    }
                    None => stream_done = true,
                },
            }
        };

        match result {
            Ok(records) => {
                let snapshot = valid_questions(records);
                let report = self.bootstrapper.complete(snapshot, &mut self.store);
                self.publish();
                Ok(report)
            }
            Err(e) => {
                error!("bootstrap failed: {}", e);
                self.bootstrapper.abandon(&mut self.store);
                self.publish();
                Err(e)
            }
        }
    }

    /// Waits for the next connection event and applies it.
    ///
    /// Returns `None` once the session is closed or the connection is
    /// terminal. Call [`Session::bootstrap`] first; until then events are
    /// only buffered.
    pub async fn step(&mut self) -> Option<SessionUpdate> {
        if self.is_disposed() {
            if !self.connection.state().is_terminal() {
                self.connection.close().await;
            }
            return None;
        }
        let event = self.connection.next_event().await?;
        if self.is_disposed() {
            debug!("session closed, dropping in-flight event");
            return None;
        }
        Some(self.on_connection_event(event))
    }

    /// Drives the session until it is closed or goes offline.
    pub async fn run(&mut self) -> Result<()> {
        while self.step().await.is_some() {}
        let status = self.connection.status();
        if status.is_offline() {
            return Err(Error::ReconnectBudgetExhausted {
                attempts: status.attempt,
            });
        }
        Ok(())
    }

    fn on_connection_event(&mut self, event: ConnectionEvent) -> SessionUpdate {
        match event {
            ConnectionEvent::Open => SessionUpdate::Connected,
            ConnectionEvent::Message(raw) => match self.dispatcher.handle(&raw) {
                Ok(event) => self.route(event),
                Err(_) => SessionUpdate::Discarded,
            },
            ConnectionEvent::Closed { .. } | ConnectionEvent::TransportError(_) => {
                SessionUpdate::Disconnected
            }
            ConnectionEvent::Offline { attempts } => SessionUpdate::Offline { attempts },
        }
    }

    fn route(&mut self, event: Event) -> SessionUpdate {
        match self.bootstrapper.route(event, &mut self.store) {
            Routed::Buffered => SessionUpdate::Buffered,
            Routed::Applied => {
                self.publish();
                SessionUpdate::Changed
            }
            Routed::Ignored => SessionUpdate::Unchanged,
        }
    }

    /// Merges the result of a request/response call.
    ///
    /// The record goes through the create path, then its status through
    /// the status path. Both are idempotent, so a result racing its own
    /// broadcast is applied once. Answers on an existing question are left
    /// to the `new_answer` broadcast, since appends are not deduplicated.
    /// Returns true if the store changed.
    pub fn merge_record(&mut self, record: QuestionRecord) -> parley_core::Result<bool> {
        if self.is_disposed() {
            return Ok(false);
        }
        let status = record.effective_status();
        let question = record.into_question()?;
        let question_id = question.id();
        let created = self.route(Event::QuestionCreated(question)) == SessionUpdate::Changed;
        let updated = self.route(Event::QuestionStatusChanged {
            question_id,
            status,
        }) == SessionUpdate::Changed;
        Ok(created || updated)
    }

    /// Closes the connection and stops all delivery to the store.
    pub async fn close(&mut self) {
        self.disposed = true;
        self.connection.close().await;
    }

    /// Token that closes the session from another task.
    pub fn close_handle(&self) -> CancellationToken {
        self.close_token.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed || self.close_token.is_cancelled()
    }

    fn publish(&self) {
        self.view.send_replace(Arc::new(self.store.snapshot()));
    }

    /// Current ordered view.
    pub fn view(&self) -> View {
        Arc::clone(&self.view.borrow())
    }

    pub fn subscribe_view(&self) -> watch::Receiver<View> {
        self.view.subscribe()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection.status()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.connection.subscribe()
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn is_live(&self) -> bool {
        self.bootstrapper.is_live()
    }

    pub fn dispatch_stats(&self) -> DispatchStats {
        self.dispatcher.stats()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
