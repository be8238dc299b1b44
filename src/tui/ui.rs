use crate::core::state::{App, PanelMode};
use crate::tui::component::Component;
use crate::tui::components::{
    AnswerPanel, ChatPanel, HistorySidebar, LoginForm, TitleBar, notice_style,
};
use crate::tui::{Focus, TuiState};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

/// Share of the body width given to the history sidebar.
const SIDEBAR_PERCENT: u16 = 35;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    if !app.session().is_authenticated() {
        LoginForm {
            state: &mut tui.login_form,
            mode: app.auth_mode,
            notice: app.notice.as_ref(),
            is_loading: app.is_loading,
        }
        .render(frame, frame.area());
        return;
    }

    use Constraint::{Length, Min, Percentage};
    let layout = Layout::vertical([Length(1), Length(1), Min(0), Length(3)]);
    let [title_area, notice_area, body_area, input_area] = layout.areas(frame.area());

    TitleBar {
        username: &app.session().identity().username,
        panel: app.panel,
        status_message: &app.status_message,
        spinner: app.is_loading.then_some(spinner_frame),
    }
    .render(frame, title_area);

    if let Some(notice) = &app.notice {
        frame.render_widget(
            Paragraph::new(notice.text.as_str()).style(notice_style(notice.level)),
            notice_area,
        );
    }

    let [sidebar_area, main_area] =
        Layout::horizontal([Percentage(SIDEBAR_PERCENT), Min(0)]).areas(body_area);
    draw_body(frame, sidebar_area, main_area, app, tui);

    tui.input_box.title = match app.panel {
        PanelMode::Documents => "Ask a question".to_string(),
        PanelMode::Chat => "Ask the chatbot".to_string(),
    };
    tui.input_box.dimmed = tui.focus != Focus::Input;
    tui.input_box.render(frame, input_area);
}

fn draw_body(frame: &mut Frame, sidebar_area: Rect, main_area: Rect, app: &App, tui: &mut TuiState) {
    let entries = app.session().combined_history();
    HistorySidebar {
        state: &mut tui.sidebar,
        entries: &entries,
        focused: tui.focus == Focus::Sidebar,
    }
    .render(frame, sidebar_area);

    match app.panel {
        PanelMode::Documents => AnswerPanel {
            selected: app.session().selected(),
            scroll_state: &mut tui.answer_scroll,
        }
        .render(frame, main_area),
        PanelMode::Chat => ChatPanel {
            turns: app.session().chat_history(),
            scroll_state: &mut tui.chat_scroll,
        }
        .render(frame, main_area),
    }
}
