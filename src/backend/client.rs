//! HTTP client for the StudyMate backend.
//!
//! Six calls, one attempt each. No retries and no client-side timeout: a hung
//! backend hangs the call.

use std::fmt;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};

use super::types::{
    AskRequest, AskResponse, ChatRequest, ChatResponse, Credentials, ErrorBody, HistoryRecord,
    UploadFile,
};

const PDF_MIME: &str = "application/pdf";

/// Errors produced while talking to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Base URL unusable (cannot be parsed or cannot carry a path). Not retryable.
    Config(String),
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// Backend answered with something other than 200.
    /// `message` is the `{error}` field when present, else the trimmed body text.
    Api { status: u16, message: Option<String> },
    /// A 200 body that could not be decoded.
    Parse(String),
}

impl BackendError {
    /// HTTP status when the backend actually answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Config(msg) => write!(f, "config error: {msg}"),
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api {
                status,
                message: Some(message),
            } => write!(f, "API error (HTTP {status}): {message}"),
            BackendError::Api {
                status,
                message: None,
            } => write!(f, "API error (HTTP {status})"),
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// The backend contract the session controller consumes.
#[async_trait]
pub trait StudyBackend: Send + Sync {
    /// Base URL requests are sent to (for logs and the title bar).
    fn base_url(&self) -> &str;

    async fn login(&self, credentials: &Credentials) -> Result<(), BackendError>;

    async fn signup(&self, credentials: &Credentials) -> Result<(), BackendError>;

    async fn fetch_history(&self, username: &str) -> Result<Vec<HistoryRecord>, BackendError>;

    /// Sends every file plus the username in one multipart request.
    async fn upload(&self, username: &str, files: &[UploadFile]) -> Result<(), BackendError>;

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError>;

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError>;
}

/// reqwest-backed implementation of [`StudyBackend`].
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `GET /history/{username}` with the username percent-encoded as one segment.
    fn history_url(&self, username: &str) -> Result<reqwest::Url, BackendError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| BackendError::Config(format!("invalid base URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| {
                BackendError::Config(format!("base URL cannot carry a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .push("history")
            .push(username);
        Ok(url)
    }

    async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, BackendError> {
        info!("POST /{}", path);
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        debug!("POST /{} -> {}", path, response.status());
        Ok(response)
    }
}

/// Turns any non-200 response into `BackendError::Api`, keeping the backend's message.
async fn ensure_ok(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    warn!("Backend returned HTTP {}: {}", status.as_u16(), body.trim());
    Err(BackendError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Extracts `{error}` from a JSON error body, falling back to the raw text.
/// Only a JSON `{"error": ...}` body counts; proxy pages and plain text
/// leave the caller's fallback message in place.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body.trim())
        .ok()?
        .error
        .filter(|e| !e.trim().is_empty())
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, BackendError> {
    let text = response
        .text()
        .await
        .map_err(|e| BackendError::Network(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| BackendError::Parse(e.to_string()))
}

#[async_trait]
impl StudyBackend for HttpBackend {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn login(&self, credentials: &Credentials) -> Result<(), BackendError> {
        let response = self.post_json("login", credentials).await?;
        ensure_ok(response).await.map(|_| ())
    }

    async fn signup(&self, credentials: &Credentials) -> Result<(), BackendError> {
        let response = self.post_json("signup", credentials).await?;
        ensure_ok(response).await.map(|_| ())
    }

    async fn fetch_history(&self, username: &str) -> Result<Vec<HistoryRecord>, BackendError> {
        let url = self.history_url(username)?;
        info!("GET {}", url.path());
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let response = ensure_ok(response).await?;
        let records: Vec<HistoryRecord> = decode(response).await?;
        debug!("Fetched {} history records for {}", records.len(), username);
        Ok(records)
    }

    async fn upload(&self, username: &str, files: &[UploadFile]) -> Result<(), BackendError> {
        let mut form = Form::new().text("username", username.to_string());
        for file in files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(PDF_MIME)
                .map_err(|e| BackendError::Config(e.to_string()))?;
            form = form.part("files", part);
        }

        info!("POST /upload ({} files)", files.len());
        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        ensure_ok(response).await.map(|_| ())
    }

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError> {
        let response = self.post_json("ask", request).await?;
        let response = ensure_ok(response).await?;
        decode(response).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        let response = self.post_json("gemini_chat", request).await?;
        let response = ensure_ok(response).await?;
        decode(response).await
    }
}
