//! # TitleBar Component
//!
//! Top status bar: which server we talk to, the latest status message, and
//! a "reconnecting" marker while polls are failing.
//!
//! Purely presentational. It receives all data as props and renders a
//! single line:
//!
//! 1. **Degraded**: `"Jukebox @ http://host:8000 | Sent next track | ⟳ reconnecting"`
//! 2. **Status message**: `"Jukebox @ http://host:8000 | Sent next track"`
//! 3. **Default**: `"Jukebox @ http://host:8000"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

/// Top status bar component showing server, status, and connection health.
pub struct TitleBar {
    /// Backend name (its base URL)
    pub server: String,
    /// Status message (e.g., "Sent play/pause", "Could not load albums")
    pub status_message: String,
    /// Whether the last poll failed
    pub degraded: bool,
}

impl TitleBar {
    pub fn new(server: String, status_message: String, degraded: bool) -> Self {
        Self {
            server,
            status_message,
            degraded,
        }
    }

    fn text(&self) -> String {
        let mut text = format!("Jukebox @ {}", self.server);
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.status_message);
        }
        if self.degraded {
            text.push_str(" | ⟳ reconnecting");
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}
