//! # Transcript
//!
//! A vertical stack of bordered text bubbles inside a scroll view. Both the
//! answer panel and the chat panel render through here.
//!
//! Text is pre-wrapped with `textwrap` so the computed bubble height always
//! matches what is drawn.

use ratatui::Frame;
use ratatui::layout::{Rect, Size};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Padding, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Column reserved for the vertical scrollbar.
const SCROLLBAR_WIDTH: u16 = 1;

/// One bordered block of text.
#[derive(Debug, Clone, Copy)]
pub struct Bubble<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub style: Style,
}

impl Bubble<'_> {
    fn wrapped(&self, outer_width: u16) -> Vec<String> {
        let width = outer_width.saturating_sub(HORIZONTAL_OVERHEAD).max(1) as usize;
        let lines: Vec<String> = self
            .text
            .trim()
            .lines()
            .flat_map(|line| {
                let wrapped = textwrap::wrap(line, width);
                if wrapped.is_empty() {
                    vec![String::new()]
                } else {
                    wrapped.into_iter().map(|l| l.into_owned()).collect()
                }
            })
            .collect();
        if lines.is_empty() { vec![String::new()] } else { lines }
    }

    /// Rendered height at `outer_width`, borders included.
    pub fn height(&self, outer_width: u16) -> u16 {
        self.wrapped(outer_width).len() as u16 + VERTICAL_OVERHEAD
    }

    fn paragraph(&self, outer_width: u16) -> Paragraph<'static> {
        let lines: Vec<Line<'static>> = self.wrapped(outer_width).into_iter().map(Line::from).collect();
        Paragraph::new(lines).style(self.style).block(
            Block::bordered()
                .title(self.title.to_string())
                .border_style(self.style.add_modifier(Modifier::DIM))
                .padding(Padding::horizontal(CONTENT_PAD_H)),
        )
    }
}

/// Renders `bubbles` top to bottom in a scrollable view.
pub fn render_transcript(
    frame: &mut Frame,
    area: Rect,
    bubbles: &[Bubble<'_>],
    scroll_state: &mut ScrollViewState,
) {
    let content_width = area.width.saturating_sub(SCROLLBAR_WIDTH);
    let heights: Vec<u16> = bubbles.iter().map(|b| b.height(content_width)).collect();
    let total_height: u16 = heights.iter().copied().fold(0u16, u16::saturating_add);

    let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
        .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
        .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

    let mut y_offset: u16 = 0;
    for (bubble, height) in bubbles.iter().zip(&heights) {
        let rect = Rect::new(0, y_offset, content_width, *height);
        scroll_view.render_widget(bubble.paragraph(content_width), rect);
        y_offset = y_offset.saturating_add(*height);
    }

    frame.render_stateful_widget(scroll_view, area, scroll_state);
}
