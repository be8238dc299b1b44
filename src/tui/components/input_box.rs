//! # InputBox Component
//!
//! Single-line text field used for the question/prompt box and for both login
//! fields.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, backspace, delete)
//! - Move the cursor (left/right/home/end) on char boundaries
//! - Emit `Submit` on Enter with a non-blank buffer
//! - Scroll horizontally so the cursor is always visible
//! - Mask its content when used as a password field
//!
//! The buffer is internal state. `title`, `masked`, and `dimmed` are props.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Borders take one cell on each side.
const BORDER: u16 = 1;
const MASK_CHAR: char = '\u{2022}';

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Text content or cursor changed
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Block title (Prop)
    pub title: String,
    /// Render every char as a bullet (Prop)
    pub masked: bool,
    /// Unfocused: dim border, no terminal cursor (Prop)
    pub dimmed: bool,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pos: usize,
}

impl InputBox {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            title: title.into(),
            masked: false,
            dimmed: false,
            pos: 0,
        }
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    /// Replaces the buffer and moves the cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.pos = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.pos = 0;
    }

    /// Height including borders.
    pub fn height() -> u16 {
        1 + BORDER * 2
    }

    fn display_text(&self) -> String {
        if self.masked {
            std::iter::repeat_n(MASK_CHAR, self.buffer.chars().count()).collect()
        } else {
            self.buffer.clone()
        }
    }

    fn cursor_chars(&self) -> usize {
        self.buffer[..self.pos].chars().count()
    }
}

fn prev_char_boundary(s: &str, pos: usize) -> usize {
    s[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(s: &str, pos: usize) -> usize {
    s[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(s.len())
}

fn char_width(c: &char) -> usize {
    c.width().unwrap_or(0)
}

/// The slice of `display` that fits in `width` cells with the cursor visible,
/// plus the cursor's column within that slice.
fn visible_window(display: &str, cursor_chars: usize, width: u16) -> (String, u16) {
    let width = width as usize;
    if width == 0 {
        return (String::new(), 0);
    }
    let chars: Vec<char> = display.chars().collect();
    let cursor_chars = cursor_chars.min(chars.len());

    // Drop chars from the left until the cursor cell fits.
    let mut start = 0;
    while start < cursor_chars
        && chars[start..cursor_chars].iter().map(char_width).sum::<usize>() >= width
    {
        start += 1;
    }

    let mut visible = String::new();
    let mut used = 0;
    for c in &chars[start..] {
        let w = char_width(c);
        if used + w > width {
            break;
        }
        used += w;
        visible.push(*c);
    }

    let cursor_x = chars[start..cursor_chars].iter().map(char_width).sum::<usize>();
    (visible, cursor_x as u16)
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(BORDER * 2);
        let (visible, cursor_x) = visible_window(&self.display_text(), self.cursor_chars(), inner_width);

        let border_style = if self.dimmed {
            Style::default().fg(Color::Green).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::Green)
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title.as_str());

        let input = Paragraph::new(visible)
            .block(block)
            .style(Style::default().fg(Color::Green));
        frame.render_widget(input, area);

        if !self.dimmed && area.height > BORDER * 2 {
            frame.set_cursor_position((area.x + BORDER + cursor_x, area.y + BORDER));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.pos, *c);
                self.pos += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line field: newlines become spaces
                let text = text.replace(['\r', '\n'], " ");
                self.buffer.insert_str(self.pos, &text);
                self.pos += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.pos);
                    self.buffer.drain(prev..self.pos);
                    self.pos = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.pos);
                    self.buffer.drain(self.pos..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => (self.pos > 0).then(|| {
                self.pos = prev_char_boundary(&self.buffer, self.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.pos < self.buffer.len()).then(|| {
                self.pos = next_char_boundary(&self.buffer, self.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.pos != 0).then(|| {
                self.pos = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.pos != self.buffer.len()).then(|| {
                self.pos = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                if !self.buffer.trim().is_empty() {
                    let text = std::mem::take(&mut self.buffer);
                    self.pos = 0;
                    Some(InputEvent::Submit(text))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
