#![forbid(unsafe_code)]

//! Host-driven clock and deferred DOM mutations.
//!
//! The host never hands the controller a real timer. It reports monotonic
//! time instead (on every event and from its own `setTimeout` callbacks), and
//! the queue releases whatever became due. Tests drive the same clock by
//! hand, which keeps ripple and feedback lifetimes reproducible.
//!
//! # Invariants
//!
//! 1. Time never moves backwards; stale `set` calls are ignored.
//! 2. Tasks are released in due-time order, ties in scheduling order.
//! 3. A task is released exactly once.

use core::time::Duration;
use std::collections::BTreeMap;

use crate::dom::NodeId;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Move to `now`; returns `false` (and keeps the old time) if that would rewind.
    pub fn set(&mut self, now: Duration) -> bool {
        if now < self.now {
            return false;
        }
        self.now = now;
        true
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// Deferred mutation applied when its timer fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTask {
    /// Write one inline style property.
    SetStyle {
        node: NodeId,
        property: &'static str,
        value: String,
    },
    /// Detach a transient element.
    Remove { node: NodeId },
}

/// Pending tasks ordered by `(due, sequence)`.
#[derive(Debug, Default, Clone)]
pub struct TimerQueue {
    clock: DeterministicClock,
    pending: BTreeMap<(Duration, u64), TimerTask>,
    next_seq: u64,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Schedule `task` to fire `delay` after the current time. Tasks are
    /// never cancelled; they only leave the queue when released.
    pub fn schedule(&mut self, delay: Duration, task: TimerTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.clock.now().saturating_add(delay);
        self.pending.insert((due, seq), task);
    }

    /// Move the clock to `now` and release every task due at or before it.
    pub fn set_time(&mut self, now: Duration) -> Vec<TimerTask> {
        if !self.clock.set(now) {
            tracing::trace!(
                now_ms = now.as_millis() as u64,
                clock_ms = self.clock.now().as_millis() as u64,
                "ignoring clock rewind"
            );
        }
        self.drain_due()
    }

    /// Advance the clock by `dt` and release due tasks.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerTask> {
        self.clock.advance(dt);
        self.drain_due()
    }

    /// Earliest pending due time.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn drain_due(&mut self) -> Vec<TimerTask> {
        let now = self.clock.now();
        let still_pending = self.pending.split_off(&(now, u64::MAX));
        let due = std::mem::replace(&mut self.pending, still_pending);
        due.into_values().collect()
    }
}
