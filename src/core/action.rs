//! # Actions
//!
//! Everything that can happen in StudyMate becomes an `Action`.
//! User presses Enter in the input box? That's `Action::SubmitInput(text)`.
//! Backend answers? That's `Action::AnswerReceived { generation, outcome }`.
//!
//! `update()` takes the current state and an action, applies it, and returns
//! an `Effect` describing the I/O the adapter should start. No I/O here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Only one request may be in flight. While `is_loading` is set, every action
//! that would start another request is refused with a status message.
//! Logout is never refused. It bumps `App::generation`, and completions
//! started under an older generation are dropped when they arrive.

use std::path::PathBuf;

use log::debug;

use crate::core::controller::LoginGrant;
use crate::core::error::{AskError, AuthError, ChatError, Precondition, UploadError};
use crate::core::session::DocumentTurn;
use crate::core::state::{App, AuthMode, NoticeLevel, PanelMode};

const BUSY_MESSAGE: &str = "Request in progress\u{2026}";
const UPLOAD_USAGE: &str = "Usage: /upload <file.pdf> [<file.pdf> ...]";

#[derive(Debug)]
pub enum Action {
    /// Login form submitted; `App::auth_mode` decides login vs signup.
    SubmitCredentials { username: String, password: String },
    ToggleAuthMode,
    LoginFinished(Result<LoginGrant, AuthError>),
    SignupFinished(Result<(), AuthError>),
    Logout,
    /// Text from the input box: a command or a question/prompt.
    SubmitInput(String),
    UploadFinished {
        generation: u64,
        outcome: Result<usize, UploadError>,
    },
    AnswerReceived {
        generation: u64,
        outcome: Result<DocumentTurn, AskError>,
    },
    ChatReplied {
        generation: u64,
        prompt: String,
        outcome: Result<String, ChatError>,
    },
    SelectHistory(usize),
    TogglePanel,
    Quit,
}

/// I/O the adapter must start after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    Login { username: String, password: String },
    Signup { username: String, password: String },
    Upload {
        username: String,
        paths: Vec<PathBuf>,
        generation: u64,
    },
    Ask {
        username: String,
        question: String,
        generation: u64,
    },
    Chat {
        username: String,
        prompt: String,
        generation: u64,
    },
}

/// What a line typed into the input box means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload(Vec<PathBuf>),
    Logout,
    ToggleChat,
    Text(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        let mut words = trimmed.split_whitespace();
        match words.next() {
            Some("/upload") => Command::Upload(words.map(PathBuf::from).collect()),
            Some("/logout") => Command::Logout,
            Some("/chat") => Command::ToggleChat,
            // Sent as typed; only the emptiness check trims.
            _ => Command::Text(input.to_string()),
        }
    }
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {}", action_name(&action));
    match action {
        Action::Quit => Effect::Quit,

        Action::ToggleAuthMode => {
            app.auth_mode = app.auth_mode.toggle();
            app.status_message = format!("Mode: {}", app.auth_mode.label());
            Effect::None
        }

        Action::SubmitCredentials { username, password } => {
            if app.is_loading {
                app.status_message = BUSY_MESSAGE.to_string();
                return Effect::None;
            }
            if username.trim().is_empty() || password.is_empty() {
                app.notify(NoticeLevel::Warning, AuthError::MissingCredentials.to_string());
                return Effect::None;
            }
            app.is_loading = true;
            match app.auth_mode {
                AuthMode::Login => {
                    app.status_message = "Logging in...".to_string();
                    Effect::Login { username, password }
                }
                AuthMode::Signup => {
                    app.status_message = "Creating account...".to_string();
                    Effect::Signup { username, password }
                }
            }
        }

        Action::LoginFinished(outcome) => {
            app.is_loading = false;
            let result = app
                .controller
                .apply_login(outcome)
                .map(|identity| identity.username.clone());
            match result {
                Ok(username) => {
                    app.generation += 1;
                    app.panel = PanelMode::Documents;
                    app.notify(NoticeLevel::Success, format!("Welcome, {username}!"));
                }
                Err(e) => app.notify(NoticeLevel::Error, e.to_string()),
            }
            Effect::None
        }

        Action::SignupFinished(outcome) => {
            app.is_loading = false;
            match outcome {
                Ok(()) => {
                    app.auth_mode = AuthMode::Login;
                    app.notify(NoticeLevel::Success, "Account created. Log in to continue.");
                }
                Err(e) => app.notify(NoticeLevel::Error, e.to_string()),
            }
            Effect::None
        }

        Action::Logout => logout(app),

        Action::TogglePanel => {
            toggle_panel(app);
            Effect::None
        }

        Action::SubmitInput(text) => submit_input(app, &text),

        Action::UploadFinished {
            generation,
            outcome,
        } => {
            if is_stale(app, generation) {
                debug!("Dropping upload result from an earlier session");
                return Effect::None;
            }
            app.is_loading = false;
            match outcome {
                Ok(count) => app.notify(
                    NoticeLevel::Success,
                    format!("PDFs uploaded successfully! ({count} files)"),
                ),
                Err(e) => app.notify(NoticeLevel::Error, e.to_string()),
            }
            Effect::None
        }

        Action::AnswerReceived {
            generation,
            outcome,
        } => {
            if is_stale(app, generation) {
                debug!("Dropping answer from an earlier session");
                return Effect::None;
            }
            app.is_loading = false;
            match app.controller.apply_answer(outcome).map(|_| ()) {
                Ok(()) => {
                    app.notice = None;
                    app.status_message = "Answer received".to_string();
                }
                Err(e) if e.is_no_answer() => app.notify(NoticeLevel::Warning, e.to_string()),
                Err(e) => app.notify(NoticeLevel::Error, e.to_string()),
            }
            Effect::None
        }

        Action::ChatReplied {
            generation,
            prompt,
            outcome,
        } => {
            if is_stale(app, generation) {
                debug!("Dropping chat reply from an earlier session");
                return Effect::None;
            }
            app.is_loading = false;
            app.controller.apply_chat(prompt, outcome);
            app.notice = None;
            app.status_message = "Reply received".to_string();
            Effect::None
        }

        Action::SelectHistory(index) => {
            if app.controller.select_history_entry(index).is_some() {
                // The selected turn renders in the document panel.
                app.panel = PanelMode::Documents;
                app.notice = None;
            }
            Effect::None
        }
    }
}

/// A completion whose request started before the latest login or logout.
fn is_stale(app: &App, generation: u64) -> bool {
    generation != app.generation || !app.session().is_authenticated()
}

/// Always succeeds, even with a request in flight.
fn logout(app: &mut App) -> Effect {
    app.controller.logout();
    app.is_loading = false;
    app.generation += 1;
    app.panel = PanelMode::Documents;
    app.auth_mode = AuthMode::Login;
    app.notify(NoticeLevel::Info, "Logged out.");
    Effect::None
}

fn toggle_panel(app: &mut App) {
    app.panel = app.panel.toggle();
    app.status_message = format!("Mode: {}", app.panel.label());
}

fn submit_input(app: &mut App, text: &str) -> Effect {
    match Command::parse(text) {
        Command::Logout => logout(app),
        Command::ToggleChat => {
            toggle_panel(app);
            Effect::None
        }
        Command::Upload(_) | Command::Text(_) if app.is_loading => {
            app.status_message = BUSY_MESSAGE.to_string();
            Effect::None
        }
        Command::Upload(paths) => {
            let username = match app
                .controller
                .require_login()
                .map(|identity| identity.username.clone())
            {
                Ok(username) => username,
                Err(p) => {
                    app.notify(NoticeLevel::Warning, p.to_string());
                    return Effect::None;
                }
            };
            if paths.is_empty() {
                app.notify(NoticeLevel::Warning, UPLOAD_USAGE);
                return Effect::None;
            }
            app.is_loading = true;
            app.status_message = "Uploading PDFs...".to_string();
            Effect::Upload {
                username,
                paths,
                generation: app.generation,
            }
        }
        Command::Text(text) => {
            let (username, text) = match app.controller.prepare_input(&text) {
                Ok((username, text)) => (username, text.to_string()),
                Err(Precondition::EmptyInput) => return Effect::None,
                Err(p) => {
                    app.notify(NoticeLevel::Warning, p.to_string());
                    return Effect::None;
                }
            };
            app.is_loading = true;
            app.status_message = "Thinking...".to_string();
            match app.panel {
                PanelMode::Documents => Effect::Ask {
                    username,
                    question: text,
                    generation: app.generation,
                },
                PanelMode::Chat => Effect::Chat {
                    username,
                    prompt: text,
                    generation: app.generation,
                },
            }
        }
    }
}

/// Action name without its payload, so passwords never reach the log.
fn action_name(action: &Action) -> &'static str {
    match action {
        Action::SubmitCredentials { .. } => "SubmitCredentials",
        Action::ToggleAuthMode => "ToggleAuthMode",
        Action::LoginFinished(_) => "LoginFinished",
        Action::SignupFinished(_) => "SignupFinished",
        Action::Logout => "Logout",
        Action::SubmitInput(_) => "SubmitInput",
        Action::UploadFinished { .. } => "UploadFinished",
        Action::AnswerReceived { .. } => "AnswerReceived",
        Action::ChatReplied { .. } => "ChatReplied",
        Action::SelectHistory(_) => "SelectHistory",
        Action::TogglePanel => "TogglePanel",
        Action::Quit => "Quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::{DocumentTurn, SelectedTurn};
    use crate::test_support::test_app;

    fn logged_in_app(history: Vec<DocumentTurn>) -> App {
        let mut app = test_app();
        update(
            &mut app,
            Action::LoginFinished(Ok(LoginGrant {
                username: "alice".to_string(),
                history,
            })),
        );
        app
    }

    fn answered(app: &App, outcome: Result<DocumentTurn, AskError>) -> Action {
        Action::AnswerReceived {
            generation: app.generation,
            outcome,
        }
    }

    fn replied(app: &App, prompt: &str, outcome: Result<String, ChatError>) -> Action {
        Action::ChatReplied {
            generation: app.generation,
            prompt: prompt.to_string(),
            outcome,
        }
    }

    fn uploaded(app: &App, outcome: Result<usize, UploadError>) -> Action {
        Action::UploadFinished {
            generation: app.generation,
            outcome,
        }
    }

    fn turn(q: &str) -> DocumentTurn {
        DocumentTurn {
            question: q.to_string(),
            answer: format!("answer to {q}"),
            references: vec!["p1".to_string()],
        }
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(
            Command::parse("/upload a.pdf  b.pdf"),
            Command::Upload(vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")])
        );
        assert_eq!(Command::parse("  /logout "), Command::Logout);
        assert_eq!(Command::parse("/chat"), Command::ToggleChat);
        assert_eq!(
            Command::parse(" What is photosynthesis? "),
            Command::Text(" What is photosynthesis? ".to_string())
        );
    }

    #[test]
    fn test_submit_credentials_blank_is_rejected_locally() {
        let mut app = test_app();
        let effect = update(
            &mut app,
            Action::SubmitCredentials {
                username: "alice".to_string(),
                password: String::new(),
            },
        );
        assert_eq!(effect, Effect::None);
        assert!(!app.is_loading);
        assert_eq!(app.status_message, "Please enter username and password.");
    }

    #[test]
    fn test_submit_credentials_login_and_signup_modes() {
        let mut app = test_app();
        let effect = update(
            &mut app,
            Action::SubmitCredentials {
                username: " alice ".to_string(),
                password: "pw".to_string(),
            },
        );
        assert_eq!(
            effect,
            Effect::Login {
                username: " alice ".to_string(),
                password: "pw".to_string()
            }
        );
        assert!(app.is_loading);

        let mut app = test_app();
        update(&mut app, Action::ToggleAuthMode);
        let effect = update(
            &mut app,
            Action::SubmitCredentials {
                username: "bob".to_string(),
                password: "pw".to_string(),
            },
        );
        assert!(matches!(effect, Effect::Signup { .. }));
    }

    #[test]
    fn test_second_submit_while_loading_is_refused() {
        let mut app = logged_in_app(Vec::new());
        let first = update(&mut app, Action::SubmitInput("Q1".to_string()));
        assert!(matches!(first, Effect::Ask { .. }));

        let second = update(&mut app, Action::SubmitInput("Q2".to_string()));
        assert_eq!(second, Effect::None);
        assert_eq!(app.status_message, BUSY_MESSAGE);
    }

    #[test]
    fn test_login_finished_welcomes_user() {
        let app = logged_in_app(vec![turn("old")]);
        assert!(app.session().is_authenticated());
        assert_eq!(app.session().document_history().len(), 1);
        assert_eq!(app.status_message, "Welcome, alice!");
    }

    #[test]
    fn test_login_failure_shows_backend_message() {
        let mut app = test_app();
        update(
            &mut app,
            Action::LoginFinished(Err(AuthError::Rejected("Invalid credentials".to_string()))),
        );
        assert!(!app.session().is_authenticated());
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Error);
        assert_eq!(app.status_message, "Invalid credentials");
    }

    #[test]
    fn test_signup_success_returns_to_login_mode() {
        let mut app = test_app();
        app.auth_mode = AuthMode::Signup;
        update(&mut app, Action::SignupFinished(Ok(())));
        assert_eq!(app.auth_mode, AuthMode::Login);
        assert!(!app.session().is_authenticated());
    }

    #[test]
    fn test_text_routes_by_panel() {
        let mut app = logged_in_app(Vec::new());
        let effect = update(&mut app, Action::SubmitInput("Q?".to_string()));
        assert_eq!(
            effect,
            Effect::Ask {
                username: "alice".to_string(),
                question: "Q?".to_string(),
                generation: app.generation,
            }
        );

        let mut app = logged_in_app(Vec::new());
        update(&mut app, Action::TogglePanel);
        let effect = update(&mut app, Action::SubmitInput("2+2?".to_string()));
        assert_eq!(
            effect,
            Effect::Chat {
                username: "alice".to_string(),
                prompt: "2+2?".to_string(),
                generation: app.generation,
            }
        );
    }

    #[test]
    fn test_text_while_logged_out_is_refused() {
        let mut app = test_app();
        let effect = update(&mut app, Action::SubmitInput("Q?".to_string()));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.status_message, "Please log in first.");
    }

    #[test]
    fn test_upload_command() {
        let mut app = logged_in_app(Vec::new());
        let effect = update(&mut app, Action::SubmitInput("/upload notes.pdf".to_string()));
        assert_eq!(
            effect,
            Effect::Upload {
                username: "alice".to_string(),
                paths: vec![PathBuf::from("notes.pdf")],
                generation: app.generation,
            }
        );

        let action = uploaded(&app, Ok(1));
        update(&mut app, action);
        assert!(!app.is_loading);
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Success);
        assert!(!app.session().has_history());
    }

    #[test]
    fn test_upload_command_without_paths_shows_usage() {
        let mut app = logged_in_app(Vec::new());
        let effect = update(&mut app, Action::SubmitInput("/upload".to_string()));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.status_message, UPLOAD_USAGE);
    }

    #[test]
    fn test_answer_received_appends_and_selects() {
        let mut app = logged_in_app(Vec::new());
        app.is_loading = true;
        let action = answered(&app, Ok(turn("Q")));
        update(&mut app, action);
        assert!(!app.is_loading);
        assert_eq!(app.session().document_history().len(), 1);
        assert_eq!(
            app.session().selected(),
            Some(&SelectedTurn::from(&turn("Q")))
        );
    }

    #[test]
    fn test_no_answer_is_a_warning() {
        let mut app = logged_in_app(Vec::new());
        let action = answered(&app, Err(AskError::NoAnswer));
        update(&mut app, action);
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Warning);
        assert!(app.session().document_history().is_empty());
    }

    #[test]
    fn test_backend_error_is_an_error() {
        let mut app = logged_in_app(Vec::new());
        let action = answered(&app, Err(AskError::Backend { status: 500 }));
        update(&mut app, action);
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Error);
        assert_eq!(app.status_message, "Backend error.");
    }

    #[test]
    fn test_chat_failure_still_logged() {
        let mut app = logged_in_app(Vec::new());
        let action = replied(&app, "2+2?", Err(ChatError::Network("refused".to_string())));
        update(&mut app, action);
        let chats = app.session().chat_history();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].reply, "Error: refused");
    }

    #[test]
    fn test_reply_after_logout_is_dropped() {
        let mut app = logged_in_app(Vec::new());
        let late = replied(&app, "late", Ok("reply".to_string()));
        update(&mut app, Action::Logout);
        update(&mut app, late);
        assert!(app.session().chat_history().is_empty());
    }

    #[test]
    fn test_late_reply_after_relogin_is_dropped() {
        let mut app = logged_in_app(Vec::new());
        let effect = update(&mut app, Action::SubmitInput("Q from alice".to_string()));
        let Effect::Ask { generation, .. } = effect else {
            panic!("Expected Ask, got {effect:?}");
        };
        update(&mut app, Action::Logout);
        update(
            &mut app,
            Action::LoginFinished(Ok(LoginGrant {
                username: "bob".to_string(),
                history: Vec::new(),
            })),
        );
        update(&mut app, Action::SubmitInput("Q from bob".to_string()));
        assert!(app.is_loading);

        update(
            &mut app,
            Action::AnswerReceived {
                generation,
                outcome: Ok(turn("Q from alice")),
            },
        );
        assert!(app.session().document_history().is_empty());
        // Bob's own request is still in flight.
        assert!(app.is_loading);

        let action = answered(&app, Ok(turn("Q from bob")));
        update(&mut app, action);
        assert_eq!(app.session().document_history().len(), 1);
        assert_eq!(app.session().document_history()[0].question, "Q from bob");
        assert!(!app.is_loading);
    }

    #[test]
    fn test_late_upload_result_after_logout_is_dropped() {
        let mut app = logged_in_app(Vec::new());
        update(&mut app, Action::SubmitInput("/upload a.pdf".to_string()));
        let late = uploaded(&app, Ok(1));
        update(&mut app, Action::Logout);
        update(&mut app, late);
        assert_eq!(app.status_message, "Logged out.");
    }

    #[test]
    fn test_logout_command_resets_session() {
        let mut app = logged_in_app(vec![turn("old")]);
        update(&mut app, Action::TogglePanel);
        update(&mut app, Action::SubmitInput("/logout".to_string()));
        assert!(!app.session().is_authenticated());
        assert!(!app.session().has_history());
        assert_eq!(app.panel, PanelMode::Documents);
    }

    #[test]
    fn test_logout_while_loading_always_succeeds() {
        let mut app = logged_in_app(Vec::new());
        update(&mut app, Action::SubmitInput("slow question".to_string()));
        assert!(app.is_loading);
        let before = app.generation;

        update(&mut app, Action::Logout);

        assert!(!app.session().is_authenticated());
        assert!(!app.is_loading);
        assert_eq!(app.generation, before + 1);
        assert_eq!(app.status_message, "Logged out.");
    }

    #[test]
    fn test_logout_command_while_loading_succeeds() {
        let mut app = logged_in_app(Vec::new());
        app.is_loading = true;
        update(&mut app, Action::SubmitInput("/logout".to_string()));
        assert!(!app.session().is_authenticated());
    }

    #[test]
    fn test_question_is_sent_as_typed() {
        let mut app = logged_in_app(Vec::new());
        let effect = update(&mut app, Action::SubmitInput("  spaced question ".to_string()));
        assert!(matches!(
            effect,
            Effect::Ask { question, .. } if question == "  spaced question "
        ));
    }

    #[test]
    fn test_login_bumps_generation() {
        let app = logged_in_app(Vec::new());
        assert_eq!(app.generation, 1);
    }

    #[test]
    fn test_select_history_switches_to_document_panel() {
        let mut app = logged_in_app(vec![turn("old")]);
        update(&mut app, Action::TogglePanel);
        update(&mut app, Action::SelectHistory(0));
        assert_eq!(app.panel, PanelMode::Documents);
        assert_eq!(app.session().selected().unwrap().question, "old");
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
