// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// Why the initial snapshot could not seed the store.
///
/// Surfaced once per session. The live stream keeps running regardless.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("snapshot fetch failed: {0}")]
    Fetch(#[from] ApiError),

    #[error("snapshot fetch timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("session closed during bootstrap")]
    Cancelled,
}

/// All errors surfaced by the parley client.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Core(#[from] parley_core::Error),

    #[error("offline: gave up after {attempts} failed connection attempts\n  hint: check that the server is running and ws_url is correct")]
    ReconnectBudgetExhausted { attempts: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
