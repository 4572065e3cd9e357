//! HTTP client for the backend chat service.
//!
//! Thin transport layer over the backend's REST contract. Every call is a
//! single request/response round-trip; there are no retries. Failures keep
//! the backend's human-readable `detail` text (when it sent one) so callers
//! can surface it inline.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::BackendConfig;
use crate::types::{Attachment, ChatReply, HistoryResponse, Message, SessionSummary};

/// Transport or service failure from a backend call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Service {
        status: StatusCode,
        detail: Option<String>,
    },
    /// The request never produced a usable response.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// Server-supplied human-readable detail, if the backend sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Service { detail, .. } => detail.as_deref(),
            ApiError::Http(_) => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    session_id: Option<&'a str>,
    attachments: &'a [Attachment],
}

#[derive(Serialize)]
struct SessionUpdate<'a> {
    title: &'a str,
}

/// Backend API client.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the configured backend.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .with_context(|| format!("invalid backend base URL: {base_url:?}"))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("build http client")?;

        Ok(Self { base_url, http })
    }

    /// Sends one user message, optionally continuing an existing session.
    ///
    /// A `None` session id asks the backend to create the session; the reply
    /// carries the id either way.
    pub async fn send_message(
        &self,
        message: &str,
        session_id: Option<&str>,
        attachments: &[Attachment],
    ) -> ApiResult<ChatReply> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            message,
            session_id,
            attachments,
        };
        tracing::debug!(session_id, attachments = attachments.len(), "send message");
        let response = self.http.post(&url).json(&request).send().await?;
        read_json(response).await
    }

    /// Lists sessions in the backend's order (newest first).
    pub async fn list_sessions(&self) -> ApiResult<Vec<SessionSummary>> {
        let url = format!("{}/api/sessions", self.base_url);
        let response = self.http.get(&url).send().await?;
        read_json(response).await
    }

    /// Fetches the full message history of one session.
    pub async fn session_history(&self, session_id: &str) -> ApiResult<Vec<Message>> {
        let url = format!("{}/api/history/{session_id}", self.base_url);
        let response = self.http.get(&url).send().await?;
        let history: HistoryResponse = read_json(response).await?;
        Ok(history.chats)
    }

    /// Renames a session; returns the updated record.
    pub async fn rename_session(
        &self,
        session_id: &str,
        title: &str,
    ) -> ApiResult<SessionSummary> {
        let url = format!("{}/api/sessions/{session_id}", self.base_url);
        let response = self
            .http
            .patch(&url)
            .json(&SessionUpdate { title })
            .send()
            .await?;
        read_json(response).await
    }

    /// Deletes a session.
    pub async fn delete_session(&self, session_id: &str) -> ApiResult<()> {
        let url = format!("{}/api/sessions/{session_id}", self.base_url);
        let response = self.http.delete(&url).send().await?;
        read_empty(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    Err(service_error(status, response).await)
}

async fn read_empty(response: reqwest::Response) -> ApiResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(service_error(status, response).await)
}

async fn service_error(status: StatusCode, response: reqwest::Response) -> ApiError {
    let detail = match response.text().await {
        Ok(body) => extract_detail(&body),
        Err(_) => None,
    };
    ApiError::Service { status, detail }
}

/// Error bodies carry `{"detail": "..."}` when the backend has something to say.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
