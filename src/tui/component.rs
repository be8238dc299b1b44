//! Traits shared by every widget in `components/`.

use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::event::TuiEvent;

/// Something that draws itself into a `Rect`.
///
/// Transient wrappers (`LoginForm`, `HistorySidebar`, the panels) hold props
/// and borrowed state as fields, so the signature stays fixed. `&mut self`
/// lets a render pass write back list offsets and scroll positions.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Persistent component state that reacts to key events.
pub trait EventHandler {
    /// What the component reports upward (submit, select, toggle).
    type Event;

    /// Returns `None` when the event was consumed locally or ignored.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
