use std::time::{Duration, Instant};

/// Quiet period before a typed search term is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingTerm {
    term: String,
    changed_at: Instant,
}

/// Holds the latest search input until it has been stable for the quiet period.
///
/// New input replaces the pending term and restarts the countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDebounce {
    pending: Option<PendingTerm>,
    quiet: Duration,
}

impl Default for SearchDebounce {
    fn default() -> Self {
        Self::with_quiet_period(SEARCH_DEBOUNCE)
    }
}

impl SearchDebounce {
    pub fn with_quiet_period(quiet: Duration) -> Self {
        Self {
            pending: None,
            quiet,
        }
    }

    pub fn input(&mut self, term: impl Into<String>, now: Instant) {
        self.pending = Some(PendingTerm {
            term: term.into(),
            changed_at: now,
        });
    }

    /// Releases the pending term once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|pending| now.saturating_duration_since(pending.changed_at) >= self.quiet);
        if ready {
            self.pending.take().map(|pending| pending.term)
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
