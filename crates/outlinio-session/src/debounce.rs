// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-slot debouncer.
//
// Holds at most one pending value and the instant at which it becomes due.
// Every push overwrites the slot and restarts the quiet period, so only the
// latest value survives a burst. The debouncer never sleeps itself; the owner
// decides how to wait for `deadline()`, which keeps it independent of any
// async runtime.

use std::time::{Duration, Instant};

use tracing::trace;

#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    due: Instant,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Store `value`, replacing anything pending, due `window` after `now`.
    ///
    /// Returns `true` if a pending value was discarded.
    pub fn push(&mut self, value: T, now: Instant) -> bool {
        let superseded = self.pending.is_some();
        if superseded {
            trace!("pending value superseded, restarting quiet period");
        }
        self.pending = Some(Pending {
            value,
            due: now + self.window,
        });
        superseded
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drain the slot if its deadline has passed at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        if self.deadline().is_some_and(|due| due <= now) {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Drop any pending value without running it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    #[test]
    fn empty_debouncer_has_no_deadline() {
        let mut d: Debouncer<u32> = Debouncer::new(WINDOW);
        assert_eq!(d.deadline(), None);
        assert_eq!(d.take_due(Instant::now() + WINDOW * 10), None);
    }

    #[test]
    fn value_is_held_until_the_window_elapses() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        assert!(!d.push(7, t0));
        assert_eq!(d.deadline(), Some(t0 + WINDOW));
        assert_eq!(d.take_due(t0 + Duration::from_millis(99)), None);
        assert!(d.is_pending());
        assert_eq!(d.take_due(t0 + WINDOW), Some(7));
        assert!(!d.is_pending());
    }

    #[test]
    fn latest_push_wins_and_restarts_the_timer() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.push("first", t0);
        let t1 = t0 + Duration::from_millis(60);
        assert!(d.push("second", t1));
        // The original deadline no longer fires.
        assert_eq!(d.take_due(t0 + WINDOW), None);
        assert_eq!(d.take_due(t1 + WINDOW), Some("second"));
        assert_eq!(d.take_due(t1 + WINDOW * 2), None);
    }

    #[test]
    fn cancel_discards_the_pending_value() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.push(1, t0);
        assert_eq!(d.cancel(), Some(1));
        assert_eq!(d.take_due(t0 + WINDOW), None);
    }
}
