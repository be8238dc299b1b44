//! # Answer Panel
//!
//! Shows the selected turn: the question, the answer, and its supporting
//! references. References go through `SelectedTurn::visible_references`, so a
//! fallback answer ("Sorry, ...") never shows stale paragraphs beside it.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tui_scrollview::ScrollViewState;

use crate::core::session::SelectedTurn;
use crate::tui::component::Component;
use crate::tui::components::transcript::{Bubble, render_transcript};

const EMPTY_HINT: &str = "Ask a question about your notes below.\n\
    Upload PDFs first with: /upload <file.pdf> [<file.pdf> ...]";

pub struct AnswerPanel<'a> {
    pub selected: Option<&'a SelectedTurn>,
    pub scroll_state: &'a mut ScrollViewState,
}

impl AnswerPanel<'_> {
    fn bubbles<'t>(turn: &'t SelectedTurn, bullets: &'t [String]) -> Vec<Bubble<'t>> {
        let mut bubbles = vec![
            Bubble {
                title: "You",
                text: &turn.question,
                style: Style::default().fg(Color::Cyan),
            },
            Bubble {
                title: "StudyMate",
                text: &turn.answer,
                style: Style::default().fg(Color::Green),
            },
        ];
        bubbles.extend(bullets.iter().map(|text| Bubble {
            title: "Reference",
            text,
            style: Style::default().fg(Color::Yellow),
        }));
        bubbles
    }
}

impl Component for AnswerPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let Some(turn) = self.selected else {
            let hint = Paragraph::new(EMPTY_HINT)
                .block(Block::bordered().title("Answer"))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true });
            frame.render_widget(hint, area);
            return;
        };

        let bullets: Vec<String> = turn
            .visible_references()
            .iter()
            .map(|r| format!("\u{2022} {r}"))
            .collect();
        let bubbles = Self::bubbles(turn, &bullets);
        render_transcript(frame, area, &bubbles, self.scroll_state);
    }
}
