// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the question API.
//!
//! Covers the snapshot listing used by bootstrap and the request/response
//! calls that create or progress questions. Every call returns the
//! server's record; callers merge it through the same idempotent path as
//! stream events.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use parley_core::protocol::QuestionRecord;
use parley_core::{validate_question_text, QuestionId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Error type for API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never got a response.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The input was rejected before sending.
    #[error(transparent)]
    Invalid(#[from] parley_core::Error),

    /// A privileged call was made without a credential.
    #[error("this action requires a responder token\n  hint: set PARLEY_TOKEN or pass --token")]
    MissingCredential,
}

impl ApiError {
    /// True when the server could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ApiError::Request(e) if e.is_connect() || e.is_timeout())
    }
}

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Opaque bearer token attached to privileged calls.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    fn bearer(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Boxed future returned by [`SnapshotSource::fetch_snapshot`].
pub type SnapshotFuture<'a> =
    Pin<Box<dyn Future<Output = ApiResult<Vec<QuestionRecord>>> + Send + 'a>>;

/// Anything that can produce the bootstrap listing.
pub trait SnapshotSource: Send + Sync {
    fn fetch_snapshot(&self) -> SnapshotFuture<'_>;
}

#[derive(Serialize)]
struct NewQuestion<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct NewAnswer<'a> {
    content: &'a str,
}

/// Client for the question endpoints.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credential: Option<Credential>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential: None,
        }
    }

    /// Attach a credential for privileged calls.
    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /questions`
    pub async fn list_questions(&self) -> ApiResult<Vec<QuestionRecord>> {
        let resp = self.http.get(self.url("/questions")).send().await?;
        decode(resp).await
    }

    /// `POST /questions`
    pub async fn submit_question(&self, text: &str) -> ApiResult<QuestionRecord> {
        let message = validate_question_text(text)?;
        let resp = self
            .http
            .post(self.url("/questions"))
            .json(&NewQuestion { message })
            .send()
            .await?;
        decode(resp).await
    }

    /// `POST /questions/{id}/answers`
    pub async fn add_answer(&self, id: QuestionId, content: &str) -> ApiResult<QuestionRecord> {
        let content = content.trim();
        if content.is_empty() {
            return Err(parley_core::Error::InvalidInput("answer cannot be blank".to_string()).into());
        }
        let path = format!("/questions/{}/answers", id);
        self.privileged_post(&path, Some(&NewAnswer { content })).await
    }

    /// `POST /questions/{id}/answer`
    pub async fn mark_answered(&self, id: QuestionId) -> ApiResult<QuestionRecord> {
        let path = format!("/questions/{}/answer", id);
        self.privileged_post::<()>(&path, None).await
    }

    /// `POST /questions/{id}/escalate`
    pub async fn escalate(&self, id: QuestionId) -> ApiResult<QuestionRecord> {
        let path = format!("/questions/{}/escalate", id);
        self.privileged_post::<()>(&path, None).await
    }

    async fn privileged_post<B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<QuestionRecord> {
        let credential = self.credential.as_ref().ok_or(ApiError::MissingCredential)?;
        let mut req = self
            .http
            .post(self.url(path))
            .bearer_auth(credential.bearer());
        if let Some(body) = body {
            req = req.json(body);
        }
        debug!("POST {}", path);
        let resp = req.send().await?;
        decode(resp).await
    }
}

impl SnapshotSource for ApiClient {
    fn fetch_snapshot(&self) -> SnapshotFuture<'_> {
        Box::pin(self.list_questions())
    }
}

/// Turn a response into `T`, or into [`ApiError::Status`] carrying the
/// server's `detail` message when there is one.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> ApiResult<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            detail: error_detail(&body, status.canonical_reason()),
        });
    }
    Ok(resp.json().await?)
}

pub(crate) fn error_detail(body: &str, reason: Option<&str>) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or_else(|| reason.unwrap_or("unknown error").to_string())
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
