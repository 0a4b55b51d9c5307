// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests against an in-process WebSocket server.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use futures_util::{SinkExt, StreamExt};
use parley::api::SnapshotFuture;
use parley::{
    ConnectionConfig, ConnectionEvent, ConnectionManager, Frame, Session, SessionUpdate,
    SnapshotSource, Transport, TransportError, WebSocketTransport,
};
use parley_core::protocol::QuestionRecord;
use parley_core::{QuestionId, Status};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

/// Accepts one connection, sends `frames`, then waits for the client to leave.
async fn serve(frames: Vec<Message>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        for frame in frames {
            ws.send(frame).await.unwrap();
        }
        while let Some(Ok(_)) = ws.next().await {}
    });
    format!("ws://{}/ws", addr)
}

struct StaticSnapshot(Vec<QuestionRecord>);

impl SnapshotSource for StaticSnapshot {
    fn fetch_snapshot(&self) -> SnapshotFuture<'_> {
        let records = self.0.clone();
        Box::pin(async move { Ok(records) })
    }
}

#[tokio::test]
async fn test_transport_receives_frames_and_close_code() {
    let url = serve(vec![
        Message::Text(r#"{"type":"new_answer","id":1,"content":"hi"}"#.to_string().into()),
        Message::Binary(b"binary text".to_vec().into()),
        Message::Close(Some(CloseFrame {
            code: CloseCode::Away,
            reason: "going away".to_string().into(),
        })),
    ])
    .await;

    let mut transport = WebSocketTransport::new();
    transport.connect(&url).await.unwrap();

    assert_eq!(
        transport.recv().await.unwrap(),
        Frame::Text(r#"{"type":"new_answer","id":1,"content":"hi"}"#.to_string())
    );
    assert_eq!(
        transport.recv().await.unwrap(),
        Frame::Text("binary text".to_string())
    );
    assert_eq!(
        transport.recv().await.unwrap(),
        Frame::Closed { code: Some(1001) }
    );
    assert!(matches!(
        transport.recv().await,
        Err(TransportError::ConnectionClosed)
    ));
}

#[tokio::test]
async fn test_session_over_websocket() {
    let url = serve(vec![
        Message::Text(r#"{"type":"question_updated","id":1,"status":"Escalated"}"#.to_string().into()),
        Message::Text(r#"{"type":"new_answer","id":1,"content":"try restarting"}"#.to_string().into()),
    ])
    .await;

    let snapshot = StaticSnapshot(vec![QuestionRecord {
        id: QuestionId(1),
        message: "My app will not start".to_string(),
        timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        status: Status::Pending,
        escalated: false,
        answers: Vec::new(),
    }]);
    let config = ConnectionConfig {
        url,
        ..ConnectionConfig::default()
    };
    let mut session = Session::with_parts(
        ConnectionManager::new(config),
        Arc::new(snapshot),
        Some(Duration::from_secs(5)),
    );

    session.bootstrap().await.unwrap();
    let mut changes = 0;
    while changes < 2 {
        match tokio::time::timeout(Duration::from_secs(5), session.step())
            .await
            .expect("timed out waiting for stream")
        {
            Some(SessionUpdate::Changed) => changes += 1,
            Some(SessionUpdate::Connected) => {}
            other => panic!("unexpected update: {:?}", other),
        }
    }

    let view = session.view();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].status(), Status::Escalated);
    assert_eq!(view[0].answers().len(), 1);
    assert_eq!(view[0].answers()[0].content(), "try restarting");

    session.close().await;
    assert_eq!(session.step().await, None);
}

#[tokio::test]
async fn test_unreachable_server_goes_offline() {
    // Bind then drop to get a port nobody is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut manager = ConnectionManager::new(ConnectionConfig {
        url: format!("ws://{}/ws", addr),
        retry_delay: Duration::from_millis(5),
        max_attempts: 3,
    });
    manager.open();

    let mut failures = 0;
    let mut offline = false;
    while let Some(event) = manager.next_event().await {
        match event {
            ConnectionEvent::TransportError(_) => failures += 1,
            ConnectionEvent::Offline { attempts } => {
                assert_eq!(attempts, 3);
                offline = true;
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    assert_eq!(failures, 3);
    assert!(offline);
    assert!(manager.status().is_offline());
    assert_eq!(manager.status().status_string(), "offline after 3 attempts");
}
