//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields each frame:
//! - `TitleBar`: user, active panel, status and spinner
//! - `AnswerPanel`: the selected turn with its references
//! - `ChatPanel`: the chat log
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state lives in `TuiState`; a transient wrapper borrows it for
//! rendering:
//! - `InputBox`: single-line text field
//! - `LoginFormState` / `LoginForm`: username and password fields
//! - `HistorySidebarState` / `HistorySidebar`: combined history list
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs              (this file)
//! ├── title_bar.rs        (top status bar)
//! ├── input_box.rs        (text field, optionally masked)
//! ├── login_form.rs       (logged-out screen)
//! ├── history_sidebar.rs  (combined history list)
//! ├── transcript.rs       (scrollable stack of text bubbles)
//! ├── answer_panel.rs     (selected document turn)
//! └── chat_panel.rs       (chat log)
//! ```

use ratatui::style::{Color, Style};

use crate::core::state::NoticeLevel;

pub mod answer_panel;
pub mod chat_panel;
pub mod history_sidebar;
pub mod input_box;
pub mod login_form;
pub mod title_bar;
pub mod transcript;

pub use answer_panel::AnswerPanel;
pub use chat_panel::ChatPanel;
pub use history_sidebar::{HistorySidebar, HistorySidebarState, SidebarEvent};
pub use input_box::{InputBox, InputEvent};
pub use login_form::{LoginEvent, LoginForm, LoginFormState};
pub use title_bar::TitleBar;

/// Text style for a notice line.
pub fn notice_style(level: NoticeLevel) -> Style {
    let color = match level {
        NoticeLevel::Info => Color::Cyan,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    };
    Style::default().fg(color)
}
