//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::backend::{
    AskRequest, AskResponse, BackendError, ChatRequest, ChatResponse, Credentials, HistoryRecord,
    StudyBackend, UploadFile,
};
use crate::core::state::App;

/// An in-memory backend with scripted responses.
///
/// Login, signup, history, and upload return one fixed result each. Ask and
/// chat pop from a queue and fall back to a canned success once it is empty.
/// Every call is recorded as `"<call> <username> [detail]"`.
pub struct ScriptedBackend {
    login: Result<(), BackendError>,
    signup: Result<(), BackendError>,
    history: Result<Vec<HistoryRecord>, BackendError>,
    upload: Result<(), BackendError>,
    asks: Mutex<VecDeque<Result<AskResponse, BackendError>>>,
    chats: Mutex<VecDeque<Result<ChatResponse, BackendError>>>,
    calls: Mutex<Vec<String>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            login: Ok(()),
            signup: Ok(()),
            history: Ok(Vec::new()),
            upload: Ok(()),
            asks: Mutex::new(VecDeque::new()),
            chats: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_login(mut self, result: Result<(), BackendError>) -> Self {
        self.login = result;
        self
    }

    pub fn with_signup(mut self, result: Result<(), BackendError>) -> Self {
        self.signup = result;
        self
    }

    pub fn with_history(mut self, result: Result<Vec<HistoryRecord>, BackendError>) -> Self {
        self.history = result;
        self
    }

    pub fn with_upload(mut self, result: Result<(), BackendError>) -> Self {
        self.upload = result;
        self
    }

    pub fn with_ask(self, result: Result<AskResponse, BackendError>) -> Self {
        self.asks.lock().unwrap().push_back(result);
        self
    }

    pub fn with_chat(self, result: Result<ChatResponse, BackendError>) -> Self {
        self.chats.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StudyBackend for ScriptedBackend {
    fn base_url(&self) -> &str {
        "scripted://backend"
    }

    async fn login(&self, credentials: &Credentials) -> Result<(), BackendError> {
        self.record(format!("login {}", credentials.username));
        self.login.clone()
    }

    async fn signup(&self, credentials: &Credentials) -> Result<(), BackendError> {
        self.record(format!("signup {}", credentials.username));
        self.signup.clone()
    }

    async fn fetch_history(&self, username: &str) -> Result<Vec<HistoryRecord>, BackendError> {
        self.record(format!("history {username}"));
        self.history.clone()
    }

    async fn upload(&self, username: &str, files: &[UploadFile]) -> Result<(), BackendError> {
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        self.record(format!("upload {username} {}", names.join(",")));
        self.upload.clone()
    }

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError> {
        self.record(format!("ask {} {}", request.username, request.question));
        self.asks.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(AskResponse {
                answer: Some("scripted answer".to_string()),
                matched_paragraphs: Some(vec!["scripted paragraph".to_string()]),
            })
        })
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        self.record(format!("chat {} {}", request.username, request.message));
        self.chats.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(ChatResponse {
                response: Some("scripted reply".to_string()),
            })
        })
    }
}

/// Creates a test App over a default ScriptedBackend.
pub fn test_app() -> App {
    App::new(Arc::new(ScriptedBackend::new()))
}
