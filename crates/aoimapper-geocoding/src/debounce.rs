//! Trailing-edge debouncing for search-as-you-type.

use std::time::{Duration, Instant};

/// Holds back the latest query until no new input arrived for `delay`.
///
/// The caller drives time: [`push`](Self::push) on every keystroke,
/// [`poll`](Self::poll) from its event loop.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending query and restart the timer.
    pub fn push(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some((query.into(), now + self.delay));
    }

    /// Release the pending query once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(q, _)| q),
            _ => None,
        }
    }

    /// Release the pending query immediately, ignoring the deadline.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(q, _)| q)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}
