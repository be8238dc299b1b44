//! # Application State
//!
//! Core state for StudyMate. Domain logic only, no TUI-specific types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── controller: SessionController   // session + backend handle
//! ├── status_message: String          // status bar text
//! ├── is_loading: bool                // a request is in flight
//! ├── notice: Option<Notice>          // last outcome shown to the user
//! ├── panel: PanelMode                // document answers or chat log
//! ├── auth_mode: AuthMode             // login form submits login or signup
//! └── generation: u64                 // bumped on every login and logout
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::backend::StudyBackend;
use crate::core::controller::SessionController;
use crate::core::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// What the login form's submit does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn toggle(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Signup => "Signup",
        }
    }
}

/// Which log the main panel and the input box are working with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelMode {
    /// Questions go to `/ask`; the panel shows the selected turn.
    #[default]
    Documents,
    /// Prompts go to `/gemini_chat`; the panel shows the chat log.
    Chat,
}

impl PanelMode {
    pub fn toggle(self) -> Self {
        match self {
            PanelMode::Documents => PanelMode::Chat,
            PanelMode::Chat => PanelMode::Documents,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PanelMode::Documents => "Documents",
            PanelMode::Chat => "Chat",
        }
    }
}

pub struct App {
    pub controller: SessionController,
    pub status_message: String,
    pub is_loading: bool,
    pub notice: Option<Notice>,
    pub panel: PanelMode,
    pub auth_mode: AuthMode,
    /// Session generation. Requests carry the value they were started under;
    /// completions from an older generation are dropped.
    pub generation: u64,
}

impl App {
    pub fn new(backend: Arc<dyn StudyBackend>) -> Self {
        Self {
            controller: SessionController::new(backend),
            status_message: String::from("Welcome to StudyMate!"),
            is_loading: false,
            notice: None,
            panel: PanelMode::default(),
            auth_mode: AuthMode::default(),
            generation: 0,
        }
    }

    pub fn session(&self) -> &Session {
        self.controller.session()
    }

    /// Shows `text` as the current notice and mirrors it in the status line.
    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        let text = text.into();
        self.status_message = text.clone();
        self.notice = Some(Notice { level, text });
    }
}
