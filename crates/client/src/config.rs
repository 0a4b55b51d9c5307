// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is read from `<config dir>/parley/config.toml` and includes:
//! - `api_url`: base URL of the question API
//! - `ws_url`: stream URL (derived from `api_url` when absent)
//! - reconnection and snapshot timing
//!
//! A missing file means defaults. Environment variables override the file,
//! and command-line flags override both.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::Credential;
use crate::connection::ConnectionConfig;
use crate::env;

const CONFIG_DIR_NAME: &str = "parley";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {field} '{url}'\n  hint: {field} must start with {expected}")]
    InvalidUrl {
        field: &'static str,
        url: String,
        expected: &'static str,
    },
}

/// Client configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the question API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Stream URL. Derived from `api_url` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_url: Option<String>,
    /// Delay between reconnection attempts in milliseconds (default: 2000).
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// Failed attempts before going offline (default: 5).
    #[serde(default = "default_reconnect_max_attempts")]
    pub reconnect_max_attempts: u32,
    /// Max time to wait for the initial snapshot in seconds (default: 10). 0 = no limit.
    #[serde(default = "default_snapshot_timeout_secs")]
    pub snapshot_timeout_secs: u64,
    /// Bearer token for privileged calls. Usually supplied via `PARLEY_TOKEN`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    2000
}

fn default_reconnect_max_attempts() -> u32 {
    5
}

fn default_snapshot_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
            ws_url: None,
            reconnect_delay_ms: default_reconnect_delay_ms(),
            reconnect_max_attempts: default_reconnect_max_attempts(),
            snapshot_timeout_secs: default_snapshot_timeout_secs(),
            token: None,
        }
    }
}

/// Values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub ws_url: Option<String>,
    pub token: Option<String>,
}

impl Overrides {
    /// Reads `PARLEY_API_URL`, `PARLEY_WS_URL` and `PARLEY_TOKEN`.
    pub fn from_env() -> Self {
        Overrides {
            api_url: env::api_url(),
            ws_url: env::ws_url(),
            token: env::token(),
        }
    }

    /// Layer `other` on top of `self`.
    pub fn or(self, other: Overrides) -> Overrides {
        Overrides {
            api_url: other.api_url.or(self.api_url),
            ws_url: other.ws_url.or(self.ws_url),
            token: other.token.or(self.token),
        }
    }
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from `path`, or from the default location.
    ///
    /// A missing file yields defaults. An unreadable or invalid file is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Ok(Config::default()),
        };
        match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(api_url) = overrides.api_url {
            self.api_url = api_url;
        }
        if overrides.ws_url.is_some() {
            self.ws_url = overrides.ws_url;
        }
        if overrides.token.is_some() {
            self.token = overrides.token;
        }
    }

    /// Checks that both URLs use the expected schemes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl {
                field: "api_url",
                url: self.api_url.clone(),
                expected: "http:// or https://",
            });
        }
        let ws_url = self.ws_url();
        if !(ws_url.starts_with("ws://") || ws_url.starts_with("wss://")) {
            return Err(ConfigError::InvalidUrl {
                field: "ws_url",
                url: ws_url,
                expected: "ws:// or wss://",
            });
        }
        Ok(())
    }

    /// Stream URL, explicit or derived from `api_url`.
    ///
    /// `http://host` becomes `ws://host/ws` and `https://host` becomes
    /// `wss://host/ws`.
    pub fn ws_url(&self) -> String {
        if let Some(url) = &self.ws_url {
            return url.clone();
        }
        let base = self.api_url.trim_end_matches('/');
        let derived = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base.to_string()
        };
        format!("{}/ws", derived)
    }

    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            url: self.ws_url(),
            retry_delay: Duration::from_millis(self.reconnect_delay_ms),
            max_attempts: self.reconnect_max_attempts,
        }
    }

    /// `None` when the timeout is disabled.
    pub fn snapshot_timeout(&self) -> Option<Duration> {
        (self.snapshot_timeout_secs > 0).then(|| Duration::from_secs(self.snapshot_timeout_secs))
    }

    pub fn credential(&self) -> Option<Credential> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Credential::new)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
