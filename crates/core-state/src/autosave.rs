//! Debounced auto-save bookkeeping.
//!
//! The editor never writes files itself. It only tracks when the last content
//! change happened so the caller can snapshot `content()` once edits settle.
//! Callers pass `Instant`s in so the clock stays under their control.

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(750);

#[derive(Debug, Clone)]
pub struct AutosaveTracker {
    debounce: Duration,
    last_change: Option<Instant>,
}

impl Default for AutosaveTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl AutosaveTracker {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            last_change: None,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Record a content change; restarts the debounce window.
    pub fn note_change(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_change.is_some()
    }

    /// True once the debounce window has elapsed since the last change.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_change {
            Some(at) => now.saturating_duration_since(at) >= self.debounce,
            None => false,
        }
    }

    pub fn mark_saved(&mut self) {
        self.last_change = None;
    }
}
