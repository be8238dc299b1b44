//! Wire types for the StudyMate backend.
//!
//! Request bodies serialize exactly to the field names the backend expects.
//! Response bodies treat every field as optional; defaults are applied by the
//! controller, not here.

use serde::{Deserialize, Serialize};

/// Body of `POST /login` and `POST /signup`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Error body returned with 4xx responses (`{"error": "..."}`).
#[derive(Deserialize, Debug, Default)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// One persisted record from `GET /history/{username}`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub matched_paragraphs: Option<Vec<String>>,
}

/// Body of `POST /ask`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AskRequest {
    pub question: String,
    pub username: String,
}

/// 200 body of `POST /ask`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub matched_paragraphs: Option<Vec<String>>,
}

/// Body of `POST /gemini_chat`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub username: String,
}

/// 200 body of `POST /gemini_chat`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
}

/// A document to upload: original file name plus raw bytes, passed through opaquely.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}
