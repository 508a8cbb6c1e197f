//! TUI event types.

use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Application event produced by the input poll loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Keyboard input event.
    Input(KeyEvent),
    /// Terminal was resized; only a redraw is needed.
    Resize,
    /// Poll timeout elapsed without input.
    Tick,
}

impl AppEvent {
    /// Map a raw crossterm event, dropping the ones the dashboard ignores.
    pub fn from_crossterm(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Input(key)),
            CrosstermEvent::Resize(_, _) => Some(Self::Resize),
            _ => None,
        }
    }
}
