// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables read by the client are defined here
//! with typed accessor functions. Empty values count as unset.

/// Environment variable names.
pub mod vars {
    pub const PARLEY_API_URL: &str = "PARLEY_API_URL";
    pub const PARLEY_WS_URL: &str = "PARLEY_WS_URL";
    pub const PARLEY_TOKEN: &str = "PARLEY_TOKEN";
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Returns the value of `PARLEY_API_URL` if set.
pub fn api_url() -> Option<String> {
    non_empty(vars::PARLEY_API_URL)
}

/// Returns the value of `PARLEY_WS_URL` if set.
pub fn ws_url() -> Option<String> {
    non_empty(vars::PARLEY_WS_URL)
}

/// Returns the value of `PARLEY_TOKEN` if set.
pub fn token() -> Option<String> {
    non_empty(vars::PARLEY_TOKEN)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
