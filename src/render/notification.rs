use std::time::{Duration, Instant};

/// Short-lived message shown over the terminal.
///
/// A renderer keeps at most one; newer messages retext and re-show it.
#[derive(Debug, Clone)]
pub struct Notification {
    message: String,
    duration: Duration,
    shown_at: Option<Instant>,
    shows: u32,
}

impl Notification {
    pub fn new(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            duration,
            shown_at: None,
            shows: 0,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_text(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// Restarts the display timer.
    pub fn show(&mut self, now: Instant) {
        self.shown_at = Some(now);
        self.shows += 1;
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.shown_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.duration)
    }

    /// Times this instance has been shown.
    pub fn shows(&self) -> u32 {
        self.shows
    }
}
