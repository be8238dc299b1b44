//! # Login Form Component
//!
//! Full-screen form shown while the session is logged out. One form serves
//! both login and signup; the mode is a prop from `App::auth_mode`.
//!
//! Tab moves between the two fields, Enter on the username field advances to
//! the password, Enter on the password field submits.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::{AuthMode, Notice};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::input_box::InputBox;
use crate::tui::components::notice_style;
use crate::tui::event::TuiEvent;

const FORM_WIDTH: u16 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    Password,
}

/// High-level events emitted by the login form.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginEvent {
    Submit { username: String, password: String },
    ToggleMode,
}

/// Persistent state: the two fields and which one has focus.
pub struct LoginFormState {
    username: InputBox,
    password: InputBox,
    focus: Field,
}

impl LoginFormState {
    pub fn new(prefill_username: Option<&str>) -> Self {
        let mut username = InputBox::new("Username");
        let mut focus = Field::Username;
        if let Some(name) = prefill_username {
            username.set_text(name);
            focus = Field::Password;
        }
        let mut state = Self {
            username,
            password: InputBox::new("Password").masked(),
            focus,
        };
        state.sync_focus();
        state
    }

    /// Called on logout and after a successful signup or login.
    pub fn clear_password(&mut self) {
        self.password.clear();
        self.focus = Field::Password;
        self.sync_focus();
    }

    fn sync_focus(&mut self) {
        self.username.dimmed = self.focus != Field::Username;
        self.password.dimmed = self.focus != Field::Password;
    }

    fn switch_field(&mut self) {
        self.focus = match self.focus {
            Field::Username => Field::Password,
            Field::Password => Field::Username,
        };
        self.sync_focus();
    }

    fn submit(&self) -> LoginEvent {
        LoginEvent::Submit {
            username: self.username.buffer.clone(),
            password: self.password.buffer.clone(),
        }
    }
}

impl EventHandler for LoginFormState {
    type Event = LoginEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ToggleMode => Some(LoginEvent::ToggleMode),
            TuiEvent::FocusNext | TuiEvent::CursorUp | TuiEvent::CursorDown => {
                self.switch_field();
                None
            }
            // Enter never clears the fields; the reducer validates them.
            TuiEvent::Submit => match self.focus {
                Field::Username if self.password.buffer.is_empty() => {
                    self.switch_field();
                    None
                }
                _ => Some(self.submit()),
            },
            other => {
                let field = match self.focus {
                    Field::Username => &mut self.username,
                    Field::Password => &mut self.password,
                };
                field.handle_event(other);
                None
            }
        }
    }
}

/// Transient wrapper created each frame with borrowed state and props.
pub struct LoginForm<'a> {
    pub state: &'a mut LoginFormState,
    pub mode: AuthMode,
    pub notice: Option<&'a Notice>,
    pub is_loading: bool,
}

impl Component for LoginForm<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [column] = Layout::horizontal([Constraint::Length(FORM_WIDTH)])
            .flex(Flex::Center)
            .areas(area);
        let [header_area, username_area, password_area, hint_area, notice_area] =
            Layout::vertical([
                Constraint::Length(3),
                Constraint::Length(InputBox::height()),
                Constraint::Length(InputBox::height()),
                Constraint::Length(2),
                Constraint::Length(2),
            ])
            .flex(Flex::Center)
            .areas(column);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                "StudyMate",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Ask questions directly from your uploaded PDF notes",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                self.mode.label(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(header, header_area);

        self.state.username.render(frame, username_area);
        self.state.password.render(frame, password_area);

        let hint = if self.is_loading {
            match self.mode {
                AuthMode::Login => "Logging in...",
                AuthMode::Signup => "Creating account...",
            }
        } else {
            "Enter: continue   Tab: next field   Ctrl+T: login/signup   Ctrl+C: quit"
        };
        frame.render_widget(
            Paragraph::new(hint)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .wrap(ratatui::widgets::Wrap { trim: true }),
            hint_area,
        );

        if let Some(notice) = self.notice {
            frame.render_widget(
                Paragraph::new(notice.text.as_str())
                    .alignment(Alignment::Center)
                    .style(notice_style(notice.level)),
                notice_area,
            );
        }
    }
}
