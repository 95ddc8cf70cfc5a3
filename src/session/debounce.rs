use std::time::{Duration, Instant};

/// Coalesces bursts of values into the last one, released once no new value
/// arrived for `quiet`.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The coalesced value, if the quiet period has elapsed.
    pub fn flush(&mut self, now: Instant) -> Option<T> {
        let (_, last) = self.pending.as_ref()?;
        if now.saturating_duration_since(*last) < self.quiet {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }
}
