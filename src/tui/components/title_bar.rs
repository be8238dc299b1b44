//! # TitleBar Component
//!
//! Top status bar: who is logged in, which panel is active, and the current
//! status message. A spinner runs in front of the status while a request is
//! in flight.
//!
//! Stateless. All fields are props, set fresh each frame:
//!
//! ```rust,ignore
//! TitleBar {
//!     username: "alice",
//!     panel: PanelMode::Chat,
//!     status_message: &app.status_message,
//!     spinner: app.is_loading.then_some(spinner_frame),
//! }
//! .render(frame, title_area);
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::state::PanelMode;
use crate::tui::component::Component;

const SPINNER: [char; 8] = ['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

pub struct TitleBar<'a> {
    pub username: &'a str,
    pub panel: PanelMode,
    pub status_message: &'a str,
    /// Spinner frame while loading, `None` when idle
    pub spinner: Option<usize>,
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dim = Style::default().fg(Color::DarkGray);
        let mut spans = vec![
            Span::styled(
                "StudyMate",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" | ", dim),
            Span::styled(self.username, Style::default().fg(Color::Cyan)),
            Span::styled(" | ", dim),
            Span::raw(self.panel.label()),
        ];

        if let Some(frame_idx) = self.spinner {
            spans.push(Span::styled(" | ", dim));
            spans.push(Span::styled(
                SPINNER[frame_idx % SPINNER.len()].to_string(),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::raw(" "));
        } else if !self.status_message.is_empty() {
            spans.push(Span::styled(" | ", dim));
        }
        if !self.status_message.is_empty() {
            spans.push(Span::styled(self.status_message, dim));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
