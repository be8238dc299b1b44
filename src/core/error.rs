//! # Error Taxonomy
//!
//! One error type per session operation. Every variant is recovered inside the
//! session controller: the caller gets a value to show, never a panic, and no
//! failure leaves partial state behind.
//!
//! ```text
//! BackendError (transport)  →  controller  →  AuthError / UploadError / AskError
//!                                          →  ChatError (folded into the reply text)
//! ```

use std::fmt;
use std::path::PathBuf;

use crate::backend::BackendError;

/// Default shown when the backend rejects credentials without saying why.
pub const DEFAULT_AUTH_FAILURE: &str = "Authentication failed.";

/// An operation was attempted in a state that does not allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Upload, ask, and chat all require a logged-in identity.
    NotAuthenticated,
    /// Question or prompt was blank after trimming.
    EmptyInput,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precondition::NotAuthenticated => write!(f, "Please log in first."),
            Precondition::EmptyInput => write!(f, "Please type something first."),
        }
    }
}

impl std::error::Error for Precondition {}

/// Login or signup failed.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Blank username or password; no request was sent.
    MissingCredentials,
    /// Backend said no. Carries the backend's message or [`DEFAULT_AUTH_FAILURE`].
    Rejected(String),
    Network(String),
}

impl AuthError {
    pub fn from_backend(err: BackendError) -> Self {
        match err {
            BackendError::Api { message, .. } => AuthError::Rejected(
                message.unwrap_or_else(|| DEFAULT_AUTH_FAILURE.to_string()),
            ),
            BackendError::Network(msg) => AuthError::Network(msg),
            BackendError::Config(msg) | BackendError::Parse(msg) => AuthError::Network(msg),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(f, "Please enter username and password."),
            AuthError::Rejected(msg) => write!(f, "{msg}"),
            AuthError::Network(msg) => write!(f, "{DEFAULT_AUTH_FAILURE} ({msg})"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Document upload failed. History is never affected.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadError {
    Precondition(Precondition),
    NoFiles,
    NotPdf(PathBuf),
    Read { path: PathBuf, message: String },
    /// Any non-200 from `/upload`.
    Rejected { status: u16 },
    Network(String),
}

impl UploadError {
    pub fn from_backend(err: BackendError) -> Self {
        match err {
            BackendError::Api { status, .. } => UploadError::Rejected { status },
            other => UploadError::Network(other.to_string()),
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Precondition(p) => write!(f, "{p}"),
            UploadError::NoFiles => write!(f, "No files selected."),
            UploadError::NotPdf(path) => write!(f, "Not a PDF file: {}", path.display()),
            UploadError::Read { path, message } => {
                write!(f, "Could not read {}: {message}", path.display())
            }
            UploadError::Rejected { .. } => write!(f, "Upload failed."),
            UploadError::Network(msg) => write!(f, "Upload error: {msg}"),
        }
    }
}

impl std::error::Error for UploadError {}

/// A document question produced no answer.
#[derive(Debug, Clone, PartialEq)]
pub enum AskError {
    Precondition(Precondition),
    /// 404 from `/ask`: nothing indexed for this user yet. An expected outcome.
    NoAnswer,
    /// Any other non-200 from `/ask`.
    Backend { status: u16 },
    Network(String),
    Parse(String),
}

impl AskError {
    pub fn from_backend(err: BackendError) -> Self {
        match err {
            BackendError::Api { status: 404, .. } => AskError::NoAnswer,
            BackendError::Api { status, .. } => AskError::Backend { status },
            BackendError::Parse(msg) => AskError::Parse(msg),
            BackendError::Network(msg) | BackendError::Config(msg) => AskError::Network(msg),
        }
    }

    /// True for the "upload documents first" outcome, which is a warning rather than a failure.
    pub fn is_no_answer(&self) -> bool {
        matches!(self, AskError::NoAnswer)
    }
}

impl fmt::Display for AskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AskError::Precondition(p) => write!(f, "{p}"),
            AskError::NoAnswer => write!(f, "No answer found. Upload PDFs first."),
            AskError::Backend { .. } => write!(f, "Backend error."),
            AskError::Network(msg) => write!(f, "Request failed: {msg}"),
            AskError::Parse(msg) => write!(f, "Request failed: {msg}"),
        }
    }
}

impl std::error::Error for AskError {}

/// A chat exchange failed. Never returned to callers; its `Display` becomes the reply text.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatError {
    Api { status: u16 },
    Network(String),
    Parse(String),
}

impl ChatError {
    pub fn from_backend(err: BackendError) -> Self {
        match err {
            BackendError::Api { status, .. } => ChatError::Api { status },
            BackendError::Parse(msg) => ChatError::Parse(msg),
            BackendError::Network(msg) | BackendError::Config(msg) => ChatError::Network(msg),
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Api { .. } => write!(f, "Error from chat backend."),
            ChatError::Network(msg) | ChatError::Parse(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ChatError {}
