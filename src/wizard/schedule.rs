//! Time source and the single delayed advance the wizard can have in flight.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::state::ForwardGuard;

/// Abstraction over "now" so the delayed advance can be tested without
/// sleeping.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Real-time clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }
}

/// A scheduled move to the next panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAdvance {
    pub token: u64,
    pub due: Instant,
}

/// Outcome of asking the timer for a new advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Scheduled(u64),
    /// A previous advance was dropped in favour of this one.
    Replaced { cancelled: u64, token: u64 },
    /// An advance is already pending and the guard keeps it.
    AlreadyPending(u64),
}

/// Holds at most one pending advance, identified by a monotonically
/// increasing token.
#[derive(Debug, Default)]
pub struct AdvanceTimer {
    next_token: u64,
    pending: Option<PendingAdvance>,
}

impl AdvanceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, guard: ForwardGuard) -> ScheduleOutcome {
        let previous = self.pending.map(|pending| pending.token);
        if let (Some(token), ForwardGuard::Ignore) = (previous, guard) {
            return ScheduleOutcome::AlreadyPending(token);
        }

        self.next_token += 1;
        let token = self.next_token;
        self.pending = Some(PendingAdvance {
            token,
            due: now + delay,
        });

        match previous {
            Some(cancelled) => ScheduleOutcome::Replaced { cancelled, token },
            None => ScheduleOutcome::Scheduled(token),
        }
    }

    pub fn pending(&self) -> Option<PendingAdvance> {
        self.pending
    }

    /// Drops the pending advance, returning its token.
    pub fn cancel(&mut self) -> Option<u64> {
        self.pending.take().map(|pending| pending.token)
    }

    /// Removes and returns the pending advance once it is due.
    pub fn take_due(&mut self, now: Instant) -> Option<PendingAdvance> {
        match self.pending {
            Some(pending) if pending.due <= now => self.pending.take(),
            _ => None,
        }
    }

    /// Removes the pending advance regardless of its deadline.
    pub fn take(&mut self) -> Option<PendingAdvance> {
        self.pending.take()
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|pending| pending.due.saturating_duration_since(now))
    }
}
