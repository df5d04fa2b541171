//! Quiet-interval debouncing.

use std::time::Duration;

use tokio::time::Instant;

/// Holds the latest value until no new value arrived for `interval`.
///
/// Time is passed in explicitly so the caller decides the clock; every
/// [`push`](Self::push) restarts the quiet interval.
#[derive(Debug, Clone)]
pub struct Debouncer<V> {
    interval: Duration,
    pending: Option<(V, Instant)>,
}

impl<V> Debouncer<V> {
    /// Create a debouncer with the given quiet interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    /// Record a new value, replacing any pending one and restarting the timer.
    pub fn push(&mut self, value: V, now: Instant) {
        self.pending = Some((value, now + self.interval));
    }

    /// When the pending value settles, if there is one.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Whether a value is waiting to settle.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if its quiet interval has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<V> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Take the pending value immediately, settled or not.
    pub fn flush(&mut self) -> Option<V> {
        self.pending.take().map(|(value, _)| value)
    }
}
