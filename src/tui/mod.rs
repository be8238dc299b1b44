//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Flow
//!
//! ```text
//! crossterm event → TuiEvent → component → Action → update() → Effect
//!                                                                 │
//!           mpsc::Sender<Action> ← tokio task (request_* call) ←──┘
//! ```
//!
//! Effects that need the backend are run on a spawned tokio task. The task
//! sends exactly one completion action back over the channel, which the loop
//! drains between frames.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the title bar spinner animates.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tui_scrollview::ScrollViewState;

use crate::backend::{HttpBackend, StudyBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::controller::{
    load_pdf_files, request_answer, request_chat_reply, request_login, request_signup,
    request_upload,
};
use crate::core::state::{App, PanelMode};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    HistorySidebarState, InputBox, InputEvent, LoginEvent, LoginFormState, SidebarEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which part of the logged-in screen receives key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Sidebar,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub input_box: InputBox,
    pub login_form: LoginFormState,
    pub sidebar: HistorySidebarState,
    pub answer_scroll: ScrollViewState,
    pub chat_scroll: ScrollViewState,
    pub focus: Focus,
}

impl TuiState {
    pub fn new(prefill_username: Option<&str>) -> Self {
        Self {
            input_box: InputBox::new("Ask a question"),
            login_form: LoginFormState::new(prefill_username),
            sidebar: HistorySidebarState::new(),
            answer_scroll: ScrollViewState::default(),
            chat_scroll: ScrollViewState::default(),
            focus: Focus::Input,
        }
    }

    /// Fresh logged-in screen, used on login and logout.
    fn reset_workspace(&mut self) {
        self.input_box.clear();
        self.sidebar.reset();
        self.answer_scroll = ScrollViewState::default();
        self.chat_scroll = ScrollViewState::default();
        self.focus = Focus::Input;
        self.login_form.clear_password();
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Sidebar,
            Focus::Sidebar => Focus::Input,
        };
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is ignored by terminals that don't support it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    info!("Using backend {}", config.base_url);
    let backend: Arc<dyn StudyBackend> = Arc::new(HttpBackend::new(config.base_url.clone()));
    let mut app = App::new(backend);
    let mut tui = TuiState::new(config.username.as_deref());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for completion actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = app.is_loading;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = route_event(&app, &mut tui, event) {
                should_quit |= dispatch(&mut app, &mut tui, action, &tx);
            }
            if should_quit {
                break;
            }
        }

        if should_quit {
            break;
        }

        // Handle background task completions
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            if dispatch(&mut app, &mut tui, action, &tx) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    info!("Shutting down");
    ratatui::restore();
    Ok(())
}

/// Turns a terminal event into an action, updating component state on the way.
fn route_event(app: &App, tui: &mut TuiState, event: TuiEvent) -> Option<Action> {
    match event {
        // Resize just needs a redraw (already flagged)
        TuiEvent::Resize => return None,
        // Ctrl+C always quits
        TuiEvent::ForceQuit => return Some(Action::Quit),
        _ => {}
    }

    if !app.session().is_authenticated() {
        return match tui.login_form.handle_event(&event)? {
            LoginEvent::Submit { username, password } => {
                Some(Action::SubmitCredentials { username, password })
            }
            LoginEvent::ToggleMode => Some(Action::ToggleAuthMode),
        };
    }

    match event {
        TuiEvent::ToggleMode => Some(Action::TogglePanel),
        TuiEvent::Logout => Some(Action::Logout),
        TuiEvent::ScrollUp | TuiEvent::ScrollDown => {
            let scroll = match app.panel {
                PanelMode::Documents => &mut tui.answer_scroll,
                PanelMode::Chat => &mut tui.chat_scroll,
            };
            if event == TuiEvent::ScrollUp {
                scroll.scroll_up();
            } else {
                scroll.scroll_down();
            }
            None
        }
        TuiEvent::FocusNext => {
            tui.toggle_focus();
            None
        }
        TuiEvent::Escape => {
            tui.focus = Focus::Input;
            None
        }
        _ => match tui.focus {
            Focus::Sidebar => match event {
                // Typing goes back to the input box
                TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                    tui.focus = Focus::Input;
                    tui.input_box.handle_event(&event);
                    None
                }
                _ => match tui.sidebar.handle_event(&event)? {
                    SidebarEvent::Select(index) => Some(Action::SelectHistory(index)),
                },
            },
            // Keep the text while a request is in flight; the reducer reports
            // the busy state and still accepts /logout.
            Focus::Input if event == TuiEvent::Submit && app.is_loading => {
                let text = &tui.input_box.buffer;
                (!text.trim().is_empty()).then(|| Action::SubmitInput(text.clone()))
            }
            Focus::Input => match tui.input_box.handle_event(&event)? {
                InputEvent::Submit(text) => Some(Action::SubmitInput(text)),
                InputEvent::ContentChanged => None,
            },
        },
    }
}

/// Runs one action through `update()` and starts its effect.
/// Returns true when the app should quit.
fn dispatch(app: &mut App, tui: &mut TuiState, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    let was_authenticated = app.session().is_authenticated();
    let resets_answer_scroll = matches!(
        action,
        Action::AnswerReceived { .. } | Action::SelectHistory(_)
    );

    let effect = update(app, action);

    if was_authenticated != app.session().is_authenticated() {
        tui.reset_workspace();
    }
    if resets_answer_scroll {
        tui.answer_scroll.scroll_to_top();
    }

    match effect {
        Effect::Quit => true,
        Effect::None => false,
        effect => {
            spawn_effect(effect, app.controller.backend(), tx.clone());
            false
        }
    }
}

fn spawn_effect(effect: Effect, backend: Arc<dyn StudyBackend>, tx: mpsc::Sender<Action>) {
    debug!("Spawning backend request");
    tokio::spawn(async move {
        let backend = backend.as_ref();
        let action = match effect {
            Effect::Login { username, password } => {
                Action::LoginFinished(request_login(backend, &username, &password).await)
            }
            Effect::Signup { username, password } => {
                Action::SignupFinished(request_signup(backend, &username, &password).await)
            }
            Effect::Upload {
                username,
                paths,
                generation,
            } => {
                let outcome = match load_pdf_files(&paths).await {
                    Ok(files) => request_upload(backend, &username, &files).await,
                    Err(e) => Err(e),
                };
                Action::UploadFinished {
                    generation,
                    outcome,
                }
            }
            Effect::Ask {
                username,
                question,
                generation,
            } => Action::AnswerReceived {
                generation,
                outcome: request_answer(backend, &username, &question).await,
            },
            Effect::Chat {
                username,
                prompt,
                generation,
            } => {
                let outcome = request_chat_reply(backend, &username, &prompt).await;
                Action::ChatReplied {
                    generation,
                    prompt,
                    outcome,
                }
            }
            Effect::None | Effect::Quit => return,
        };
        if tx.send(action).is_err() {
            warn!("Failed to send request outcome: receiver dropped");
        }
    });
}
