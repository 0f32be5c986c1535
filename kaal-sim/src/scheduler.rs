//! Cooperative model-time timer queue.
//!
//! Every simulated delay (telemetry interval, fault phases, the mode
//! cross-fade) is a timer in a [`Scheduler`]. The owner drives it by popping
//! due timers one at a time and handling each to completion, which gives the
//! single-threaded, run-to-completion semantics of an event loop without
//! touching a real clock. The returned [`TimerId`] is the cancellation token.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Shortest period a repeating timer may have.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a scheduled timer, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<E> {
    event: E,
    period: Option<Duration>,
}

/// A queue of one-shot and repeating timers over model time.
///
/// Timers fire in deadline order; timers sharing a deadline fire in the
/// order they were scheduled.
#[derive(Debug)]
pub struct Scheduler<E> {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, TimerId), Entry<E>>,
    deadlines: HashMap<TimerId, Duration>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Current model time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `event` once, `delay` after now.
    pub fn schedule_after(&mut self, delay: Duration, event: E) -> TimerId {
        self.insert(self.now + delay, event, None)
    }

    /// Run `event` every `period`, first firing one period from now.
    pub fn schedule_every(&mut self, period: Duration, event: E) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.insert(self.now + period, event, Some(period))
    }

    fn insert(&mut self, deadline: Duration, event: E, period: Option<Duration>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.insert((deadline, id), Entry { event, period });
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.queue.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    /// Cancel every pending timer, returning how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        self.deadlines.clear();
        dropped
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Move the clock forward to `until` once no timer is due before it.
    ///
    /// The clock never runs backwards.
    pub fn advance_clock(&mut self, until: Duration) {
        if until > self.now {
            self.now = until;
        }
    }
}

impl<E: Clone> Scheduler<E> {
    /// Pop the earliest timer due at or before `until`.
    ///
    /// The clock moves to the timer's deadline, so anything the handler
    /// schedules is measured from the moment the timer fired. Repeating
    /// timers are re-armed one period later under the same id.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, E)> {
        let (&(deadline, id), _) = self.queue.iter().next()?;
        if deadline > until {
            return None;
        }

        let entry = self.queue.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        self.advance_clock(deadline);

        if let Some(period) = entry.period {
            let next = deadline + period;
            self.queue.insert(
                (next, id),
                Entry {
                    event: entry.event.clone(),
                    period: Some(period),
                },
            );
            self.deadlines.insert(id, next);
        }

        Some((id, entry.event))
    }
}
