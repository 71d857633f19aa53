//! Double Ctrl-C to quit.

use std::time::{Duration, Instant};

/// Default window in which a second Ctrl-C on an empty line confirms the quit.
pub const EXIT_WINDOW: Duration = Duration::from_secs(2);

/// Whether the user has pressed Ctrl-C once on an empty line and might press it again.
#[derive(Debug, Clone)]
pub struct ExitIntent {
    last_interrupt: Option<Instant>,
    window: Duration,
}

impl Default for ExitIntent {
    fn default() -> Self {
        Self::new(EXIT_WINDOW)
    }
}

impl ExitIntent {
    pub fn new(window: Duration) -> Self {
        Self {
            last_interrupt: None,
            window,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.last_interrupt.is_some()
    }

    /// Ctrl-C on an empty line at `now`. Returns `true` when this confirms the quit.
    pub fn interrupt(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_interrupt
            && now.saturating_duration_since(last) < self.window
        {
            self.last_interrupt = None;
            return true;
        }
        self.last_interrupt = Some(now);
        false
    }

    /// Any other key forgets a pending first press.
    pub fn disarm(&mut self) {
        self.last_interrupt = None;
    }
}
