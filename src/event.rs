use crossterm::event::KeyEvent;

/// Events that can occur in the application
#[derive(Debug, Clone)]
pub enum Event {
    /// Terminal key press event
    Key(KeyEvent),
    /// Terminal resize event
    Resize(u16, u16),
    /// Tick event for periodic updates (pipeline polling, redraw)
    Tick,
    /// Request to quit the application
    Quit,
}

impl Event {
    /// Map a raw crossterm event; mouse, focus and paste events are ignored.
    pub fn from_terminal(event: crossterm::event::Event) -> Option<Self> {
        use crossterm::event::{Event as TermEvent, KeyEventKind};

        match event {
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
            TermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
            _ => None,
        }
    }
}

/// Result type for event handling
pub type EventResult<T> = anyhow::Result<T>;
