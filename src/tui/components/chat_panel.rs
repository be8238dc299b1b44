//! # Chat Panel
//!
//! The free-form chat log, newest exchange first. Failed exchanges are in the
//! log too; their reply is the error text.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tui_scrollview::ScrollViewState;

use crate::core::session::ChatTurn;
use crate::tui::component::Component;
use crate::tui::components::transcript::{Bubble, render_transcript};

const EMPTY_HINT: &str = "Ask the chatbot anything.\nCtrl+T switches back to your documents.";

pub struct ChatPanel<'a> {
    pub turns: &'a [ChatTurn],
    pub scroll_state: &'a mut ScrollViewState,
}

impl Component for ChatPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.turns.is_empty() {
            let hint = Paragraph::new(EMPTY_HINT)
                .block(Block::bordered().title("Chat"))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true });
            frame.render_widget(hint, area);
            return;
        }

        let bubbles: Vec<Bubble<'_>> = self
            .turns
            .iter()
            .rev()
            .flat_map(|turn| {
                [
                    Bubble {
                        title: "You",
                        text: &turn.prompt,
                        style: Style::default().fg(Color::Cyan),
                    },
                    Bubble {
                        title: "Assistant",
                        text: &turn.reply,
                        style: Style::default().fg(Color::Magenta),
                    },
                ]
            })
            .collect();
        render_transcript(frame, area, &bubbles, self.scroll_state);
    }
}
