// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod ask;
pub mod list;
pub mod moderate;
pub mod watch;

use crate::api::ApiClient;
use crate::cli::GlobalArgs;
use crate::config::{Config, Overrides};
use crate::error::Result;

/// Resolve configuration from file, environment and flags, in that order.
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    load_config_with(global, Overrides::from_env())
}

pub(crate) fn load_config_with(global: &GlobalArgs, env: Overrides) -> Result<Config> {
    let mut config = Config::load(global.config.as_deref())?;
    config.apply_overrides(env.or(global.overrides()));
    config.validate()?;
    Ok(config)
}

/// HTTP client for the configured API, carrying the token if there is one.
pub fn api_client(config: &Config) -> ApiClient {
    ApiClient::new(config.api_url.clone()).with_credential(config.credential())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
