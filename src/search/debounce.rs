//! Cancellable debounce timer.
//!
//! The timer never sleeps on its own: callers poll it from their event loop
//! (or sleep until [`Debouncer::deadline`]). Time is read through a [`Clock`]
//! so tests can drive it with a [`ManualClock`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;

/// Default quiet window before a query is propagated.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Deadline used when `now + delay` is not representable. Roughly 30 years.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Tokio's clock. Honors `tokio::time::pause` in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Nanosecond resolution.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_ns: Arc<AtomicU64>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ns: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move forward by `by`. The total offset saturates at `u64::MAX` nanoseconds.
    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        // The closure never returns None, so the update cannot fail.
        let _ = self
            .offset_ns
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |ns| {
                Some(ns.saturating_add(by))
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_nanos(self.offset_ns.load(Ordering::SeqCst))
    }
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Holds at most one pending value and releases it once its window elapses.
#[derive(Debug)]
pub struct Debouncer<T, C: Clock = SystemClock> {
    clock: C,
    window: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T, SystemClock> {
    pub fn new(window: Duration) -> Self {
        Self::with_clock(window, SystemClock)
    }
}

impl<T, C: Clock> Debouncer<T, C> {
    pub fn with_clock(window: Duration, clock: C) -> Self {
        Self {
            clock,
            window,
            pending: None,
        }
    }

    /// Schedule `value` using the configured window, replacing anything pending.
    pub fn schedule(&mut self, value: T) {
        self.schedule_after(value, self.window);
    }

    /// Schedule `value` to be released after `delay`, replacing anything pending.
    /// Delays past the representable range are clamped to a far-future deadline.
    pub fn schedule_after(&mut self, value: T, delay: Duration) {
        let now = self.clock.now();
        let deadline = now
            .checked_add(delay)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        self.pending = Some(Pending { value, deadline });
    }

    /// Drop the pending value, if any. Returns whether something was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Release the pending value if its window has elapsed.
    pub fn poll(&mut self) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|p| self.clock.now() >= p.deadline);
        if due {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }
}
