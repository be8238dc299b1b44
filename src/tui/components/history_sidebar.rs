//! # History Sidebar Component
//!
//! The combined history list: chat turns newest-first, then document turns
//! newest-first. Enter on a row selects that turn for the main panel.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `HistorySidebarState` lives in `TuiState`
//! - `HistorySidebar` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph, Wrap};
use unicode_width::UnicodeWidthChar;

use crate::core::session::{HistoryEntry, HistorySource};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const EMPTY_TEXT: &str = "No chats yet. Start by asking a question.";
const DOCUMENT_MARKER: &str = "\u{1F4C4} ";
const CHAT_MARKER: &str = "\u{1F9E0} ";
/// Marker glyph (2 cells) plus the trailing space.
const MARKER_WIDTH: usize = 3;

/// High-level events emitted by the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarEvent {
    /// Select the combined-history row at this index.
    Select(usize),
}

/// Persistent state for the sidebar.
#[derive(Default)]
pub struct HistorySidebarState {
    /// Number of combined-history rows (Prop, synced each frame)
    pub entry_count: usize,
    pub list_state: ListState,
    /// The highlighted turn as (log, position from that log's oldest turn).
    /// New turns are prepended, so rows shift but this does not.
    anchor: Option<(HistorySource, usize)>,
}

impl HistorySidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Re-selects the anchored turn after rows were added above it.
    fn follow(&mut self, entries: &[HistoryEntry<'_>]) {
        if let Some(row) = self.anchor.and_then(|anchor| row_of(entries, anchor)) {
            self.list_state.select(Some(row));
        }
    }

    fn pin(&mut self, entries: &[HistoryEntry<'_>]) {
        self.anchor = self
            .list_state
            .selected()
            .and_then(|row| anchor_of(entries, row));
    }

    fn clamp(&mut self) {
        match self.list_state.selected() {
            _ if self.entry_count == 0 => self.list_state.select(None),
            Some(i) if i >= self.entry_count => self.list_state.select(Some(self.entry_count - 1)),
            None => self.list_state.select(Some(0)),
            Some(_) => {}
        }
    }
}

impl EventHandler for HistorySidebarState {
    type Event = SidebarEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.entry_count == 0 {
            return None;
        }
        match event {
            TuiEvent::CursorUp => {
                self.anchor = None;
                let current = self.list_state.selected().unwrap_or(0);
                self.list_state.select(Some(current.saturating_sub(1)));
                None
            }
            TuiEvent::CursorDown => {
                self.anchor = None;
                let next = self
                    .list_state
                    .selected()
                    .map(|i| (i + 1).min(self.entry_count - 1))
                    .unwrap_or(0);
                self.list_state.select(Some(next));
                None
            }
            TuiEvent::Submit => {
                self.clamp();
                self.list_state.selected().map(SidebarEvent::Select)
            }
            _ => None,
        }
    }
}

fn anchor_of(entries: &[HistoryEntry<'_>], row: usize) -> Option<(HistorySource, usize)> {
    let source = entries.get(row)?.source;
    let total = entries.iter().filter(|e| e.source == source).count();
    let newer = entries[..row].iter().filter(|e| e.source == source).count();
    Some((source, total - 1 - newer))
}

fn row_of(entries: &[HistoryEntry<'_>], (source, from_oldest): (HistorySource, usize)) -> Option<usize> {
    let total = entries.iter().filter(|e| e.source == source).count();
    let newer = total.checked_sub(from_oldest + 1)?;
    entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.source == source)
        .nth(newer)
        .map(|(row, _)| row)
}

/// Cuts `text` to fit `max` cells, adding an ellipsis when it does not fit.
fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    let total: usize = flat.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return flat;
    }
    let mut out = String::new();
    let mut used = 0;
    for c in flat.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('\u{2026}');
    out
}

/// Transient wrapper created each frame.
pub struct HistorySidebar<'a> {
    pub state: &'a mut HistorySidebarState,
    pub entries: &'a [HistoryEntry<'a>],
    pub focused: bool,
}

impl Component for HistorySidebar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.entry_count = self.entries.len();
        self.state.follow(self.entries);
        if self.focused {
            self.state.clamp();
        }
        self.state.pin(self.entries);

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM)
        };
        let block = Block::bordered()
            .title("Chat History")
            .border_style(border_style);

        if self.entries.is_empty() {
            let empty = Paragraph::new(EMPTY_TEXT)
                .block(block)
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true });
            frame.render_widget(empty, area);
            return;
        }

        // Borders (2) + highlight symbol (2) + marker
        let label_width = (area.width as usize).saturating_sub(4 + MARKER_WIDTH);
        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                let (marker, color) = match entry.source {
                    HistorySource::Document => (DOCUMENT_MARKER, Color::Green),
                    HistorySource::Chat => (CHAT_MARKER, Color::Magenta),
                };
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(truncate(entry.question, label_width), Style::default().fg(color)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        if self.focused {
            frame.render_stateful_widget(list, area, &mut self.state.list_state);
        } else {
            // Keep the cursor position but don't draw the highlight while unfocused.
            let mut unfocused = ListState::default().with_offset(self.state.list_state.offset());
            frame.render_stateful_widget(list, area, &mut unfocused);
        }
    }
}
