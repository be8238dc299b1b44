pub mod client;
pub mod types;

pub use client::{BackendError, HttpBackend, StudyBackend};
pub use types::{
    AskRequest, AskResponse, ChatRequest, ChatResponse, Credentials, HistoryRecord, UploadFile,
};
