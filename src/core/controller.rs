//! # Session Controller
//!
//! The only legal way to mutate a [`Session`]. Each operation has two halves:
//!
//! - a **request** half (`request_*` free functions) that talks to the backend
//!   and returns an outcome, touching no state;
//! - an **apply** half (`apply_*` methods) that turns an outcome into exactly
//!   one state transition.
//!
//! The async methods on [`SessionController`] run both halves back to back.
//! The TUI runs the request half on a spawned task and feeds the outcome back
//! through `core::action::update`, which calls the same apply half. Either way,
//! one request is in flight at a time and each completion is one mutation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::backend::{AskRequest, ChatRequest, Credentials, StudyBackend, UploadFile};
use crate::core::error::{AskError, AuthError, ChatError, Precondition, UploadError};
use crate::core::session::{ChatTurn, DocumentTurn, Identity, SelectedTurn, Session};

/// Answer used when a 200 `/ask` body has no `answer` field.
pub const DEFAULT_ANSWER: &str = "No answer found.";
/// Reply used when a 200 `/gemini_chat` body has no `response` field.
pub const DEFAULT_CHAT_REPLY: &str = "No response.";

/// Everything a successful login hands to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginGrant {
    pub username: String,
    pub history: Vec<DocumentTurn>,
}

// ============================================================================
// Request halves (backend only, no state)
// ============================================================================

/// The username is sent exactly as typed; whitespace only counts as blank.
fn credentials(username: &str, password: &str) -> Result<Credentials, AuthError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Checks credentials, then fetches the persisted document history.
///
/// A failed history fetch does not fail the login; the session starts with an
/// empty document log instead.
pub async fn request_login(
    backend: &dyn StudyBackend,
    username: &str,
    password: &str,
) -> Result<LoginGrant, AuthError> {
    let credentials = credentials(username, password)?;
    backend
        .login(&credentials)
        .await
        .map_err(AuthError::from_backend)?;
    info!("Login accepted for {}", credentials.username);

    let history = match backend.fetch_history(&credentials.username).await {
        Ok(records) => records.into_iter().map(DocumentTurn::from).collect(),
        Err(e) => {
            warn!(
                "History fetch failed for {}: {}; starting with an empty log",
                credentials.username, e
            );
            Vec::new()
        }
    };

    Ok(LoginGrant {
        username: credentials.username,
        history,
    })
}

pub async fn request_signup(
    backend: &dyn StudyBackend,
    username: &str,
    password: &str,
) -> Result<(), AuthError> {
    let credentials = credentials(username, password)?;
    backend
        .signup(&credentials)
        .await
        .map_err(AuthError::from_backend)?;
    info!("Signup accepted for {}", credentials.username);
    Ok(())
}

/// Reads PDF files from disk for upload. Rejects anything without a `.pdf` extension.
pub async fn load_pdf_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>, UploadError> {
    if paths.is_empty() {
        return Err(UploadError::NoFiles);
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        if !is_pdf(path) {
            return Err(UploadError::NotPdf(path.clone()));
        }
        let bytes = tokio::fs::read(path).await.map_err(|e| UploadError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!("Loaded {} ({} bytes)", name, bytes.len());
        files.push(UploadFile { name, bytes });
    }
    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Sends all files in one request. Returns the number of files sent.
pub async fn request_upload(
    backend: &dyn StudyBackend,
    username: &str,
    files: &[UploadFile],
) -> Result<usize, UploadError> {
    if files.is_empty() {
        return Err(UploadError::NoFiles);
    }
    backend
        .upload(username, files)
        .await
        .map_err(UploadError::from_backend)?;
    info!("Uploaded {} files for {}", files.len(), username);
    Ok(files.len())
}

/// Asks a question against the user's documents and builds the resulting turn.
pub async fn request_answer(
    backend: &dyn StudyBackend,
    username: &str,
    question: &str,
) -> Result<DocumentTurn, AskError> {
    let request = AskRequest {
        question: question.to_string(),
        username: username.to_string(),
    };
    let response = backend
        .ask(&request)
        .await
        .map_err(AskError::from_backend)?;
    Ok(DocumentTurn {
        question: question.to_string(),
        answer: response
            .answer
            .unwrap_or_else(|| DEFAULT_ANSWER.to_string()),
        references: response.matched_paragraphs.unwrap_or_default(),
    })
}

/// Sends a chat prompt and returns the reply text.
pub async fn request_chat_reply(
    backend: &dyn StudyBackend,
    username: &str,
    prompt: &str,
) -> Result<String, ChatError> {
    let request = ChatRequest {
        message: prompt.to_string(),
        username: username.to_string(),
    };
    let response = backend
        .chat(&request)
        .await
        .map_err(ChatError::from_backend)?;
    Ok(response
        .response
        .unwrap_or_else(|| DEFAULT_CHAT_REPLY.to_string()))
}

// ============================================================================
// Controller
// ============================================================================

pub struct SessionController {
    backend: Arc<dyn StudyBackend>,
    session: Session,
}

impl SessionController {
    pub fn new(backend: Arc<dyn StudyBackend>) -> Self {
        Self {
            backend,
            session: Session::new(),
        }
    }

    pub fn backend(&self) -> Arc<dyn StudyBackend> {
        self.backend.clone()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The logged-in identity, or `NotAuthenticated`.
    pub fn require_login(&self) -> Result<&Identity, Precondition> {
        if self.session.is_authenticated() {
            Ok(self.session.identity())
        } else {
            Err(Precondition::NotAuthenticated)
        }
    }

    /// Validates a question or prompt before any request is made.
    /// Returns the logged-in username and the text as typed.
    pub fn prepare_input<'a>(&self, text: &'a str) -> Result<(String, &'a str), Precondition> {
        let identity = self.require_login()?;
        if text.trim().is_empty() {
            return Err(Precondition::EmptyInput);
        }
        Ok((identity.username.clone(), text))
    }

    // ------------------------------------------------------------------------
    // Apply halves
    // ------------------------------------------------------------------------

    /// On success the session becomes LoggedIn with the fetched history.
    /// On failure nothing changes.
    pub fn apply_login(
        &mut self,
        outcome: Result<LoginGrant, AuthError>,
    ) -> Result<&Identity, AuthError> {
        let grant = outcome?;
        debug!(
            "Session begins for {} with {} document turns",
            grant.username,
            grant.history.len()
        );
        self.session.begin(grant.username, grant.history);
        Ok(self.session.identity())
    }

    /// Appends and selects on success. `NoAnswer` and other failures leave history as it was.
    pub fn apply_answer(
        &mut self,
        outcome: Result<DocumentTurn, AskError>,
    ) -> Result<&DocumentTurn, AskError> {
        match outcome {
            Ok(turn) => {
                debug!("Document turn appended: {}", turn.question);
                Ok(self.session.push_document(turn))
            }
            Err(e) => {
                if e.is_no_answer() {
                    info!("No indexed documents answered the question");
                } else {
                    warn!("Question failed: {}", e);
                }
                Err(e)
            }
        }
    }

    /// Always appends. A failed call becomes a turn whose reply is the error text.
    pub fn apply_chat(&mut self, prompt: String, outcome: Result<String, ChatError>) -> &ChatTurn {
        let reply = outcome.unwrap_or_else(|e| {
            warn!("Chat failed: {:?}", e);
            e.to_string()
        });
        self.session.push_chat(ChatTurn { prompt, reply })
    }

    /// Unconditional reset to the initial, logged-out state.
    pub fn logout(&mut self) {
        if self.session.is_authenticated() {
            info!("Logging out {}", self.session.identity().username);
        }
        self.session.reset();
    }

    /// Selects a row of the combined history. Out-of-range is a no-op returning `None`.
    pub fn select_history_entry(&mut self, combined_index: usize) -> Option<&SelectedTurn> {
        self.session.select(combined_index)
    }

    // ------------------------------------------------------------------------
    // Full operations (request + apply)
    // ------------------------------------------------------------------------

    pub async fn login(&mut self, username: &str, password: &str) -> Result<&Identity, AuthError> {
        let outcome = request_login(self.backend.as_ref(), username, password).await;
        self.apply_login(outcome)
    }

    /// Does not log in; the caller must still call [`login`](Self::login).
    pub async fn signup(&self, username: &str, password: &str) -> Result<(), AuthError> {
        request_signup(self.backend.as_ref(), username, password).await
    }

    pub async fn upload_documents(&self, files: &[UploadFile]) -> Result<usize, UploadError> {
        let username = self
            .require_login()
            .map_err(UploadError::Precondition)?
            .username
            .clone();
        request_upload(self.backend.as_ref(), &username, files).await
    }

    pub async fn ask_document_question(
        &mut self,
        question: &str,
    ) -> Result<&DocumentTurn, AskError> {
        let (username, question) = self
            .prepare_input(question)
            .map_err(AskError::Precondition)?;
        let outcome = request_answer(self.backend.as_ref(), &username, question).await;
        self.apply_answer(outcome)
    }

    pub async fn ask_chat(&mut self, prompt: &str) -> Result<&ChatTurn, Precondition> {
        let (username, prompt) = self.prepare_input(prompt)?;
        let outcome = request_chat_reply(self.backend.as_ref(), &username, prompt).await;
        Ok(self.apply_chat(prompt.to_string(), outcome))
    }
}
