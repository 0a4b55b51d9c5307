// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! parley - real-time Q&A sync client.
//!
//! This crate keeps an in-memory view of a question board consistent with a
//! server that pushes unordered, possibly duplicated change events over a
//! WebSocket, while a bulk snapshot is fetched over HTTP at startup.
//!
//! # Main Components
//!
//! - [`ConnectionManager`] - connection lifecycle, fixed-delay reconnection, cancellation
//! - [`EventDispatcher`] - frame decoding; bad frames are logged and dropped
//! - [`Bootstrapper`] - buffers stream events until the snapshot is merged
//! - [`Session`] - wires the above to a [`StateStore`](parley_core::StateStore)
//! - [`ApiClient`] - snapshot listing and request/response calls
//!
//! ```rust,ignore
//! use parley::{Config, Session};
//!
//! let config = Config::load(None)?;
//! let mut session = Session::new(&config);
//! session.bootstrap().await?;
//! session.run().await?;
//! ```

mod cli;
mod commands;
mod display;
mod env;

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod session;
pub mod transport;

#[cfg(test)]
mod test_helpers;

pub use api::{ApiClient, ApiError, Credential, SnapshotSource};
pub use bootstrap::{BootstrapReport, Bootstrapper, Routed};
pub use cli::{Cli, Command, GlobalArgs};
pub use config::{Config, ConfigError, Overrides};
pub use connection::{
    CloseReason, ConnectionConfig, ConnectionEvent, ConnectionManager, ConnectionState,
    ConnectionStatus,
};
pub use dispatcher::{DispatchStats, EventDispatcher};
pub use error::{BootstrapError, Error, Result};
pub use session::{Session, SessionUpdate, View};
pub use transport::{Frame, Transport, TransportError, WebSocketTransport};

/// Execute a CLI command.
pub async fn run(cli: Cli) -> Result<()> {
    let config = commands::load_config(&cli.global)?;
    match cli.command {
        Command::Watch { details } => commands::watch::run(&config, details).await,
        Command::List { counts } => commands::list::run(&config, counts).await,
        Command::Ask { text } => commands::ask::run(&config, &text).await,
        Command::Answer { id, content } => commands::moderate::answer(&config, id, &content).await,
        Command::Resolve { id } => commands::moderate::resolve(&config, id).await,
        Command::Escalate { id } => commands::moderate::escalate(&config, id).await,
    }
}
